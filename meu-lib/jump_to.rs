//! Moving every region to the next occurrence of a target on its line.
//!
//! The target text selects the matcher:
//!
//! - `[chars]` matches `chars` literally (useful for text starting with `/`)
//! - `/regex/` matches a regular expression
//! - `{count}` moves the head by `count` chars, staying on its line
//! - anything else matches literally
//!
//! Each region searches from its head to the end of its line. Regions that
//! find nothing stay as they are.

use regex::Regex;
use tracing::debug;

use crate::{
  command::{
    CommandError,
    Result,
  },
  document::{
    Document,
    HighlightFlags,
  },
  editor::MultiEdit,
  prompt::{
    InputPanel,
    PromptHandler,
  },
  region::Region,
  search::{
    self,
    FindFlags,
  },
  selection::Selection,
};

pub const PREVIEW_KEY: &str = "JumpTo";
pub const PREVIEW_SCOPE: &str = "jumpto";
pub const PREVIEW_FLAGS: HighlightFlags = HighlightFlags::DRAW_EMPTY.union(HighlightFlags::DRAW_OUTLINED);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JumpToOptions {
  /// Keep the anchor and move only the head.
  pub extend:      bool,
  /// Add the new regions next to the current ones.
  pub create_new:  bool,
  /// Select the whole match instead of placing a caret at its start.
  pub whole_match: bool,
}

impl JumpToOptions {
  pub fn prompt_title(&self) -> String {
    let action = if self.extend {
      "Expand selection to"
    } else if self.create_new {
      "Create caret at"
    } else {
      "Jump to"
    };
    format!("{action} (chars or [chars] or {{count}} or /regex/):")
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
  Literal(String),
  Regex(String),
  Count(isize),
}

impl Matcher {
  pub fn parse(text: &str) -> Self {
    if let Some(inner) = enclosed(text, '[', ']') {
      return Matcher::Literal(inner.to_string());
    }
    if let Some(inner) = enclosed(text, '/', '/') {
      return Matcher::Regex(inner.to_string());
    }
    if let Some(count) = count_prefix(text) {
      return Matcher::Count(count);
    }
    Matcher::Literal(text.to_string())
  }
}

/// Text between `open` at the start and the last `close`, when not empty.
fn enclosed(text: &str, open: char, close: char) -> Option<&str> {
  let rest = text.strip_prefix(open)?;
  let end = rest.rfind(close)?;
  let inner = &rest[..end];
  (!inner.is_empty() && !inner.contains('\n')).then_some(inner)
}

/// `{n}` or `{-n}` at the start of `text`.
fn count_prefix(text: &str) -> Option<isize> {
  let rest = text.strip_prefix('{')?;
  let digits_start = usize::from(rest.starts_with('-'));
  let digits_len = rest[digits_start..]
    .bytes()
    .take_while(u8::is_ascii_digit)
    .count();
  if digits_len == 0 {
    return None;
  }
  let number_end = digits_start + digits_len;
  rest[number_end..]
    .starts_with('}')
    .then(|| rest[..number_end].parse().ok())
    .flatten()
}

/// Where each region of `regions` ends up.
pub fn new_regions(doc: &Document, regions: &[Region], text: &str, options: JumpToOptions) -> Result<Vec<Region>> {
  let matcher = Matcher::parse(text);
  let regex: Option<Regex> = match &matcher {
    Matcher::Literal(literal) => Some(search::build_regex(literal, FindFlags::LITERAL)?),
    Matcher::Regex(pattern) => {
      Some(search::build_regex(pattern, FindFlags::empty()).map_err(CommandError::InvalidJumpPattern)?)
    },
    Matcher::Count(_) => None,
  };
  let rope = doc.text().slice(..);

  let result = regions
    .iter()
    .map(|&region| {
      let line = doc.line(region.head);
      let found = match (&matcher, &regex) {
        (Matcher::Count(count), _) => {
          region
            .head
            .checked_add_signed(*count)
            .filter(|&pos| line.begin() <= pos && pos <= line.end())
            .map(Region::point)
        },
        (_, Some(regex)) => {
          search::find_in(rope, regex, region.head, line.end()).map(|found| {
            if options.whole_match {
              found
            } else {
              Region::point(found.begin())
            }
          })
        },
        (_, None) => None,
      };

      match found {
        Some(found) if options.extend => Region::new(region.anchor, found.head),
        Some(found) => found,
        None => region,
      }
    })
    .collect();
  Ok(result)
}

pub fn jump_to(doc: &mut Document, text: &str, options: JumpToOptions) -> Result<()> {
  let regions = new_regions(doc, doc.selection().regions(), text, options)?;
  debug!(target_text = text, regions = regions.len(), "jump to");

  if options.create_new {
    doc.add_regions(regions);
  } else {
    doc.set_selection(Selection::new(regions));
  }
  Ok(())
}

pub fn jump_to_prompt(initial: &str, options: JumpToOptions) -> InputPanel {
  InputPanel::new(options.prompt_title(), initial, Box::new(JumpToPrompt { options }))
    .with_initial_selected(false)
}

/// Outlines where the regions would go while the target is typed.
#[derive(Debug)]
pub struct JumpToPrompt {
  options: JumpToOptions,
}

impl PromptHandler for JumpToPrompt {
  fn on_change(&mut self, _editor: &mut MultiEdit, doc: &mut Document, text: &str) {
    let preview = match new_regions(doc, doc.selection().regions(), text, self.options) {
      Ok(mut regions) if !text.is_empty() => {
        if self.options.create_new {
          regions.extend(doc.selection().iter().copied());
        }
        regions
      },
      _ => Vec::new(),
    };

    if preview.is_empty() {
      doc.erase_highlight(PREVIEW_KEY);
    } else {
      doc.add_highlight(PREVIEW_KEY, preview, PREVIEW_SCOPE, PREVIEW_FLAGS);
    }
  }

  fn on_confirm(self: Box<Self>, editor: &mut MultiEdit, doc: &mut Document, text: &str) -> Result<()> {
    doc.erase_highlight(PREVIEW_KEY);
    editor.jump_to(doc, text, self.options)
  }

  fn on_cancel(self: Box<Self>, _editor: &mut MultiEdit, doc: &mut Document) {
    doc.erase_highlight(PREVIEW_KEY);
  }
}
