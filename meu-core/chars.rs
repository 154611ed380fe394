//! Character classification and word bounds.
//!
//! Word expansion follows the usual editor rule: a position touching a word
//! character expands to the whole run of word characters around it, otherwise
//! it expands to the run of characters sharing the category of the character
//! under the position. Whitespace and line endings never expand.

use ropey::RopeSlice;

use crate::line_ending::LineEnding;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum CharCategory {
  Whitespace,
  Eol,
  Word,
  Punctuation,
  Unknown,
}

pub fn categorize_char(ch: char) -> CharCategory {
  match ch {
    c if char_is_line_ending(c) => CharCategory::Eol,
    c if c.is_whitespace() => CharCategory::Whitespace,
    c if char_is_word(c) => CharCategory::Word,
    c if char_is_punctuation(c) => CharCategory::Punctuation,
    _ => CharCategory::Unknown,
  }
}

#[inline]
pub fn char_is_line_ending(ch: char) -> bool {
  LineEnding::from_char(ch).is_some()
}

#[inline]
pub fn char_is_punctuation(ch: char) -> bool {
  use unicode_general_category::{
    GeneralCategory,
    get_general_category,
  };

  matches!(
    get_general_category(ch),
    GeneralCategory::OtherPunctuation
      | GeneralCategory::OpenPunctuation
      | GeneralCategory::ClosePunctuation
      | GeneralCategory::InitialPunctuation
      | GeneralCategory::FinalPunctuation
      | GeneralCategory::ConnectorPunctuation
      | GeneralCategory::DashPunctuation
      | GeneralCategory::MathSymbol
      | GeneralCategory::CurrencySymbol
      | GeneralCategory::ModifierSymbol
  )
}

#[inline]
pub fn char_is_word(ch: char) -> bool {
  ch.is_alphanumeric() || ch == '_'
}

/// Returns the `(start, end)` char bounds of the word around `pos`.
///
/// The returned bounds are empty (`start == end == pos`) when `pos` only
/// touches whitespace or line endings.
pub fn word_at(text: RopeSlice, pos: usize) -> (usize, usize) {
  let len = text.len_chars();
  let pos = pos.min(len);

  let after = (pos < len).then(|| categorize_char(text.char(pos)));
  let before = (pos > 0).then(|| categorize_char(text.char(pos - 1)));

  let category = match (before, after) {
    (_, Some(CharCategory::Word)) | (Some(CharCategory::Word), _) => CharCategory::Word,
    (_, Some(category @ (CharCategory::Punctuation | CharCategory::Unknown))) => category,
    (Some(category @ (CharCategory::Punctuation | CharCategory::Unknown)), _) => category,
    _ => return (pos, pos),
  };

  let mut start = pos;
  while start > 0 && categorize_char(text.char(start - 1)) == category {
    start -= 1;
  }
  let mut end = pos;
  while end < len && categorize_char(text.char(end)) == category {
    end += 1;
  }

  (start, end)
}

#[cfg(test)]
mod test {
  use ropey::Rope;

  use super::*;

  #[test]
  fn test_categorize() {
    assert_eq!(categorize_char('\n'), CharCategory::Eol);
    assert_eq!(categorize_char(' '), CharCategory::Whitespace);
    assert_eq!(categorize_char('a'), CharCategory::Word);
    assert_eq!(categorize_char('_'), CharCategory::Word);
    assert_eq!(categorize_char(','), CharCategory::Punctuation);
    assert_eq!(categorize_char('+'), CharCategory::Punctuation);
  }

  #[test]
  fn test_word_at() {
    let text = Rope::from("abc def - abc_1, x");
    let s = text.slice(..);

    // Inside, at the start and right after a word.
    assert_eq!(word_at(s, 1), (0, 3));
    assert_eq!(word_at(s, 0), (0, 3));
    assert_eq!(word_at(s, 3), (0, 3));
    assert_eq!(word_at(s, 4), (4, 7));

    // Underscores and digits belong to the word.
    assert_eq!(word_at(s, 12), (10, 15));

    // Punctuation runs expand on their own.
    assert_eq!(word_at(s, 8), (8, 9));

    // Pure whitespace does not expand.
    assert_eq!(word_at(s, 16), (15, 16));
    assert_eq!(word_at(Rope::from("a  b").slice(..), 2), (2, 2));

    // Past the end clamps.
    assert_eq!(word_at(s, 100), (17, 18));
  }
}
