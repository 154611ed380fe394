//! Splitting selected regions by a separator.

use ropey::RopeSlice;

use crate::{
  command::Result,
  config::LiveSplitConfig,
  document::{
    Document,
    HighlightFlags,
  },
  editor::MultiEdit,
  prompt::PromptHandler,
  region::Region,
  selection::Selection,
};

pub const SPLIT_PREVIEW_KEY: &str = "meu_split_preview";
pub const SPLIT_PROMPT_TITLE: &str = "Separating character(s) for splitting the selection";

/// Splits the text of each region at every occurrence of `separator`, or into
/// single chars when `separator` is empty. Pieces may be empty.
pub fn split_regions(text: RopeSlice, regions: &[Region], separator: &str) -> Vec<Region> {
  let separator_len = separator.chars().count();
  let mut result = Vec::new();

  for region in regions {
    let mut pos = region.begin();
    let fragment = region.fragment(text);

    if separator.is_empty() {
      result.extend((pos..pos + fragment.chars().count()).map(|start| Region::new(start, start + 1)));
      continue;
    }

    for piece in fragment.split(separator) {
      let len = piece.chars().count();
      result.push(Region::new(pos, pos + len));
      pos += len + separator_len;
    }
  }

  result
}

/// Replaces the selection with the pieces of `regions`.
pub fn apply_split(doc: &mut Document, regions: &[Region], separator: &str) {
  let pieces = split_regions(doc.text().slice(..), regions, separator);
  doc.set_selection(Selection::new(pieces));
  doc.erase_highlight(SPLIT_PREVIEW_KEY);
}

#[derive(Debug)]
pub struct SplitPrompt {
  saved:   Vec<Region>,
  preview: bool,
  scope:   String,
}

impl SplitPrompt {
  pub fn new(saved: Vec<Region>, config: &LiveSplitConfig) -> Self {
    Self {
      saved,
      preview: config.enabled,
      scope: config.scope.clone(),
    }
  }
}

impl PromptHandler for SplitPrompt {
  fn on_change(&mut self, _editor: &mut MultiEdit, doc: &mut Document, text: &str) {
    if !self.preview {
      return;
    }
    let pieces = split_regions(doc.text().slice(..), &self.saved, text);
    doc.add_highlight(
      SPLIT_PREVIEW_KEY,
      pieces,
      &self.scope,
      HighlightFlags::DRAW_NO_FILL | HighlightFlags::PERSISTENT,
    );
  }

  fn on_confirm(self: Box<Self>, _editor: &mut MultiEdit, doc: &mut Document, text: &str) -> Result<()> {
    apply_split(doc, &self.saved, text);
    Ok(())
  }

  fn on_cancel(self: Box<Self>, _editor: &mut MultiEdit, doc: &mut Document) {
    doc.erase_highlight(SPLIT_PREVIEW_KEY);
  }
}
