//! Pattern search over a rope.
//!
//! Patterns are compiled with the `regex` crate; [`FindFlags::LITERAL`]
//! escapes the pattern first. All returned positions are char offsets into
//! the searched text.
//!
//! ```ignore
//! use meu_lib::search::{find_all, FindFlags};
//! use ropey::Rope;
//!
//! let text = Rope::from("Foo foo");
//! let found = find_all(text.slice(..), "foo", FindFlags::LITERAL | FindFlags::IGNORECASE).unwrap();
//! assert_eq!(found.len(), 2);
//! ```

use bitflags::bitflags;
use regex::{
  Regex,
  RegexBuilder,
};
use ropey::RopeSlice;
use thiserror::Error;

use crate::region::Region;

bitflags! {
  #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
  pub struct FindFlags: u8 {
    /// Match the pattern as plain text.
    const LITERAL    = 1 << 0;
    const IGNORECASE = 1 << 1;
  }
}

#[derive(Debug, Error)]
pub enum SearchError {
  #[error("invalid regular expression: {0}")]
  InvalidPattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, SearchError>;

pub fn build_regex(pattern: &str, flags: FindFlags) -> Result<Regex> {
  let pattern = if flags.contains(FindFlags::LITERAL) {
    regex::escape(pattern)
  } else {
    pattern.to_string()
  };
  Ok(
    RegexBuilder::new(&pattern)
      .case_insensitive(flags.contains(FindFlags::IGNORECASE))
      .multi_line(true)
      .build()?,
  )
}

/// Every non-overlapping match of `pattern` in `text`, in order.
pub fn find_all(text: RopeSlice, pattern: &str, flags: FindFlags) -> Result<Vec<Region>> {
  let regex = build_regex(pattern, flags)?;
  Ok(find_all_regex(text, &regex))
}

pub fn find_all_regex(text: RopeSlice, regex: &Regex) -> Vec<Region> {
  let haystack = text.to_string();
  regex
    .find_iter(&haystack)
    .map(|m| Region::new(text.byte_to_char(m.start()), text.byte_to_char(m.end())))
    .collect()
}

/// First match of `regex` inside `[from, to)`, in char offsets of `text`.
pub fn find_in(text: RopeSlice, regex: &Regex, from: usize, to: usize) -> Option<Region> {
  let len = text.len_chars();
  let (from, to) = (from.min(len), to.min(len));
  if from > to {
    return None;
  }
  let window = text.slice(from..to);
  let haystack = window.to_string();
  regex.find(&haystack).map(|m| {
    Region::new(
      from + window.byte_to_char(m.start()),
      from + window.byte_to_char(m.end()),
    )
  })
}

#[cfg(test)]
mod test {
  use ropey::Rope;

  use super::*;

  #[test]
  fn test_find_all_literal() {
    let text = Rope::from("a.b a.b axb");
    let found = find_all(text.slice(..), "a.b", FindFlags::LITERAL).unwrap();
    assert_eq!(found, vec![Region::new(0, 3), Region::new(4, 7)]);

    let found = find_all(text.slice(..), "a.b", FindFlags::empty()).unwrap();
    assert_eq!(found.len(), 3);
  }

  #[test]
  fn test_find_all_ignorecase_and_chars() {
    let text = Rope::from("ünï Foo foo");
    let found = find_all(
      text.slice(..),
      "foo",
      FindFlags::LITERAL | FindFlags::IGNORECASE,
    )
    .unwrap();
    assert_eq!(found, vec![Region::new(4, 7), Region::new(8, 11)]);
  }

  #[test]
  fn test_invalid_pattern() {
    let text = Rope::from("abc");
    assert!(matches!(
      find_all(text.slice(..), "(", FindFlags::empty()),
      Err(SearchError::InvalidPattern(_))
    ));
  }

  #[test]
  fn test_find_in_window() {
    let text = Rope::from("xx ab ab\nab");
    let regex = build_regex("ab", FindFlags::LITERAL).unwrap();
    assert_eq!(find_in(text.slice(..), &regex, 4, 8), Some(Region::new(6, 8)));
    assert_eq!(find_in(text.slice(..), &regex, 7, 8), None);
  }
}
