//! Scope classification of text positions.
//!
//! Commands only ask one question of the host's syntax layer: how well does
//! the position match a scope selector such as
//! `comment - punctuation.definition.comment`. A selector is a scope name,
//! optionally followed by `- <scope>` exclusions; a scope name matches
//! itself and every dotted child (`comment` matches `comment.line`).
//!
//! [`LineCommentScopes`] answers it from line comment tokens alone, which is
//! enough for excluding commented-out matches in most languages.

use std::fmt;

use ropey::RopeSlice;

use crate::Tendril;

pub const COMMENT_SCOPE: &str = "comment.line";
pub const COMMENT_PUNCTUATION_SCOPE: &str = "punctuation.definition.comment";

pub trait ScopeScorer: Send + Sync + fmt::Debug {
  /// Returns a score greater than zero when the scopes at `pos` match
  /// `selector`.
  fn score_selector(&self, text: RopeSlice, pos: usize, selector: &str) -> u32;
}

/// Plain text: no position has any scope.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainText;

impl ScopeScorer for PlainText {
  fn score_selector(&self, _text: RopeSlice, _pos: usize, _selector: &str) -> u32 {
    0
  }
}

#[derive(Debug, Clone)]
pub struct LineCommentScopes {
  tokens: Vec<Tendril>,
}

impl LineCommentScopes {
  pub fn new<S: AsRef<str>>(tokens: &[S]) -> Self {
    let mut tokens: Vec<Tendril> = tokens
      .iter()
      .map(AsRef::as_ref)
      .filter(|token| !token.is_empty())
      .map(Tendril::from)
      .collect();
    // Longest first, so `///` wins over `//`.
    tokens.sort_by_key(|token| std::cmp::Reverse(token.chars().count()));
    Self { tokens }
  }

  /// Scopes at `pos`, innermost last.
  pub fn scopes_at(&self, text: RopeSlice, pos: usize) -> Vec<&'static str> {
    let len = text.len_chars();
    if pos >= len {
      return Vec::new();
    }
    let line_idx = text.char_to_line(pos);
    let line_start = text.line_to_char(line_idx);
    let line: String = text.line(line_idx).chars().collect();
    let column = pos - line_start;

    let Some((start, token_len)) = self.comment_start(&line) else {
      return Vec::new();
    };
    if column < start {
      Vec::new()
    } else if column < start + token_len {
      vec![COMMENT_SCOPE, COMMENT_PUNCTUATION_SCOPE]
    } else {
      vec![COMMENT_SCOPE]
    }
  }

  /// Char column and char length of the first comment token on the line.
  fn comment_start(&self, line: &str) -> Option<(usize, usize)> {
    line
      .char_indices()
      .enumerate()
      .find_map(|(column, (byte, _))| {
        self
          .tokens
          .iter()
          .find(|token| line[byte..].starts_with(token.as_str()))
          .map(|token| (column, token.chars().count()))
      })
  }
}

impl ScopeScorer for LineCommentScopes {
  fn score_selector(&self, text: RopeSlice, pos: usize, selector: &str) -> u32 {
    let scopes = self.scopes_at(text, pos);
    selector_score(&scopes, selector)
  }
}

/// Scores `scopes` against `selector`: 0 when the selector does not match,
/// else one more than the depth of the innermost matching scope.
pub fn selector_score(scopes: &[&str], selector: &str) -> u32 {
  let mut parts = selector.split(" - ").map(str::trim);
  let include = parts.next().unwrap_or_default();

  if parts.any(|exclude| scopes.iter().any(|scope| scope_matches(scope, exclude))) {
    return 0;
  }
  if include.is_empty() {
    return 1;
  }
  scopes
    .iter()
    .rposition(|scope| scope_matches(scope, include))
    .map_or(0, |depth| depth as u32 + 1)
}

fn scope_matches(scope: &str, name: &str) -> bool {
  !name.is_empty()
    && scope
      .strip_prefix(name)
      .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}
