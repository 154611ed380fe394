use ropey::RopeSlice;

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum LineEnding {
  /// CarriageReturn followed by LineFeed.
  Crlf,

  /// U+000A -- LineFeed
  LF,

  #[cfg(feature = "unicode-lines")]
  /// U+000B -- VerticalTab
  VT,

  #[cfg(feature = "unicode-lines")]
  /// U+000C -- FormFeed
  FF,

  #[cfg(feature = "unicode-lines")]
  /// U+000D -- CarriageReturn
  CR,

  #[cfg(feature = "unicode-lines")]
  /// U+0085 -- NextLine
  Nel,

  /// U+2028 -- Line Separator
  #[cfg(feature = "unicode-lines")]
  LS,

  /// U+2029 -- ParagraphSeparator
  #[cfg(feature = "unicode-lines")]
  PS,
}

impl LineEnding {
  #[inline]
  pub const fn len_chars(&self) -> usize {
    match self {
      Self::Crlf => 2,
      _ => 1,
    }
  }

  #[inline]
  pub const fn from_char(ch: char) -> Option<LineEnding> {
    match ch {
      '\u{000A}' => Some(LineEnding::LF),
      #[cfg(feature = "unicode-lines")]
      '\u{000B}' => Some(LineEnding::VT),
      #[cfg(feature = "unicode-lines")]
      '\u{000C}' => Some(LineEnding::FF),
      #[cfg(feature = "unicode-lines")]
      '\u{000D}' => Some(LineEnding::CR),
      #[cfg(feature = "unicode-lines")]
      '\u{0085}' => Some(LineEnding::Nel),
      #[cfg(feature = "unicode-lines")]
      '\u{2028}' => Some(LineEnding::LS),
      #[cfg(feature = "unicode-lines")]
      '\u{2029}' => Some(LineEnding::PS),
      _ => None,
    }
  }

  #[allow(clippy::should_implement_trait)]
  #[inline]
  pub fn from_str(g: &str) -> Option<LineEnding> {
    match g {
      "\u{000D}\u{000A}" => Some(LineEnding::Crlf),
      "\u{000A}" => Some(LineEnding::LF),
      #[cfg(feature = "unicode-lines")]
      "\u{000B}" => Some(LineEnding::VT),
      #[cfg(feature = "unicode-lines")]
      "\u{000C}" => Some(LineEnding::FF),
      #[cfg(feature = "unicode-lines")]
      "\u{000D}" => Some(LineEnding::CR),
      #[cfg(feature = "unicode-lines")]
      "\u{0085}" => Some(LineEnding::Nel),
      #[cfg(feature = "unicode-lines")]
      "\u{2028}" => Some(LineEnding::LS),
      #[cfg(feature = "unicode-lines")]
      "\u{2029}" => Some(LineEnding::PS),
      _ => None,
    }
  }
}

/// Returns the passed line's line ending, if any.
pub fn get_line_ending(line: &RopeSlice) -> Option<LineEnding> {
  let len = line.len_chars();
  if len == 0 {
    return None;
  }

  // Ropey keeps CRLF contiguous, so a non-contiguous tail can't be one.
  let g2 = line.slice(len.saturating_sub(2)..).as_str().unwrap_or("");
  if let Some(ending) = LineEnding::from_str(g2) {
    return Some(ending);
  }
  LineEnding::from_char(line.char(len - 1))
}

/// Returns the char index of the end of the given line, not including its line
/// ending.
pub fn line_end_char_index(slice: &RopeSlice, line: usize) -> usize {
  slice.line_to_char(line + 1)
    - get_line_ending(&slice.line(line))
      .map(|le| le.len_chars())
      .unwrap_or(0)
}

/// Returns the `(start, end)` char bounds of the line containing `pos`, sans
/// its line ending.
pub fn line_bounds(slice: &RopeSlice, pos: usize) -> (usize, usize) {
  let line = slice.char_to_line(pos.min(slice.len_chars()));
  (slice.line_to_char(line), line_end_char_index(slice, line))
}

#[cfg(test)]
mod test {
  use ropey::Rope;

  use super::*;

  #[test]
  fn test_get_line_ending() {
    let text = Rope::from("a\r\nb\nc");
    let s = text.slice(..);
    assert_eq!(get_line_ending(&s.line(0)), Some(LineEnding::Crlf));
    assert_eq!(get_line_ending(&s.line(1)), Some(LineEnding::LF));
    assert_eq!(get_line_ending(&s.line(2)), None);
  }

  #[test]
  fn test_line_bounds() {
    let text = Rope::from("first line\r\nsecond\nthird");
    let s = text.slice(..);
    assert_eq!(line_bounds(&s, 0), (0, 10));
    assert_eq!(line_bounds(&s, 10), (0, 10));
    assert_eq!(line_bounds(&s, 12), (12, 18));
    assert_eq!(line_bounds(&s, 19), (19, 24));
    assert_eq!(line_bounds(&s, 24), (19, 24));
  }
}
