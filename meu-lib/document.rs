//! Host document model.
//!
//! A [`Document`] plays the part of an editor view: it owns the text buffer,
//! the live selection, and the view-scoped annotations the commands in this
//! crate read and write:
//!
//! - named highlights (region lists with a scope and [`HighlightFlags`])
//! - named status entries
//! - per-view settings (JSON values)
//! - a viewport that commands scroll to show their result
//!
//! Every selection mutation records one pending selection-change event.
//! Hosts drain them with [`Document::take_selection_events`] and forward
//! them to the selection history.
//!
//! # Example
//!
//! ```no_run
//! use std::num::NonZeroUsize;
//!
//! use meu_lib::{
//!   document::{
//!     Document,
//!     DocumentId,
//!   },
//!   region::Region,
//! };
//! use ropey::Rope;
//!
//! let id = DocumentId::new(NonZeroUsize::new(1).unwrap());
//! let mut doc = Document::new(id, Rope::from("hello world"));
//! doc.add_region(Region::new(6, 11));
//! doc.replace(Region::new(6, 11), "there").unwrap();
//! ```

use std::{
  collections::BTreeMap,
  num::NonZeroUsize,
};

use bitflags::bitflags;
use meu_core::{
  chars::word_at,
  line_ending::line_bounds,
};
use ropey::Rope;
use serde_json::Value;
use thiserror::Error;
use tracing::trace;

use crate::{
  Tendril,
  region::Region,
  selection::Selection,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(NonZeroUsize);

impl DocumentId {
  pub const fn new(id: NonZeroUsize) -> Self {
    Self(id)
  }

  pub const fn get(self) -> NonZeroUsize {
    self.0
  }
}

impl From<NonZeroUsize> for DocumentId {
  fn from(value: NonZeroUsize) -> Self {
    Self::new(value)
  }
}

bitflags! {
  /// How a highlight is drawn.
  #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
  pub struct HighlightFlags: u8 {
    /// Draw empty regions as a caret-sized mark.
    const DRAW_EMPTY    = 1 << 0;
    const DRAW_NO_FILL  = 1 << 1;
    const DRAW_OUTLINED = 1 << 2;
    /// Keep the highlight when the view is saved and reopened.
    const PERSISTENT    = 1 << 3;
    const HIDDEN        = 1 << 4;
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
  pub regions: Vec<Region>,
  pub scope:   Tendril,
  pub flags:   HighlightFlags,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
  #[error("region {region} is out of bounds for a document of {len} chars")]
  OutOfBounds { region: Region, len: usize },
}

pub type Result<T> = std::result::Result<T, DocumentError>;

#[derive(Debug)]
pub struct Document {
  id:               DocumentId,
  text:             Rope,
  selection:        Selection,
  highlights:       BTreeMap<String, Highlight>,
  status:           BTreeMap<String, String>,
  settings:         serde_json::Map<String, Value>,
  viewport:         Region,
  selection_events: usize,
  version:          u64,
}

impl Document {
  pub fn new(id: DocumentId, text: Rope) -> Self {
    let viewport = Region::new(0, text.len_chars());
    Self {
      id,
      text,
      selection: Selection::point(0),
      highlights: BTreeMap::new(),
      status: BTreeMap::new(),
      settings: serde_json::Map::new(),
      viewport,
      selection_events: 0,
      version: 0,
    }
  }

  pub fn id(&self) -> DocumentId {
    self.id
  }

  pub fn text(&self) -> &Rope {
    &self.text
  }

  pub fn len_chars(&self) -> usize {
    self.text.len_chars()
  }

  pub fn version(&self) -> u64 {
    self.version
  }

  /// Text covered by `region`, clamped to the document.
  pub fn substr(&self, region: Region) -> String {
    region.fragment(self.text.slice(..))
  }

  /// Bounds of the line containing `pos`, without its line ending.
  pub fn line(&self, pos: usize) -> Region {
    let (start, end) = line_bounds(&self.text.slice(..), pos);
    Region::new(start, end)
  }

  /// Bounds of the word around `pos`; a caret when `pos` touches no word.
  pub fn word(&self, pos: usize) -> Region {
    let (start, end) = word_at(self.text.slice(..), pos);
    Region::new(start, end)
  }

  pub fn selection(&self) -> &Selection {
    &self.selection
  }

  pub fn set_selection(&mut self, selection: Selection) {
    self.selection = selection;
    self.selection_changed();
  }

  pub fn add_region(&mut self, region: Region) {
    self.selection.add(region);
    self.selection_changed();
  }

  pub fn add_regions(&mut self, regions: impl IntoIterator<Item = Region>) {
    self.selection.add_all(regions);
    self.selection_changed();
  }

  pub fn subtract_region(&mut self, region: Region) {
    self.selection.subtract(region);
    self.selection_changed();
  }

  pub fn clear_selection(&mut self) {
    self.selection.clear();
    self.selection_changed();
  }

  /// Number of selection changes since the last call, resetting the count.
  pub fn take_selection_events(&mut self) -> usize {
    std::mem::take(&mut self.selection_events)
  }

  pub fn pending_selection_events(&self) -> usize {
    self.selection_events
  }

  fn selection_changed(&mut self) {
    self.selection_events += 1;
    trace!(
      doc = self.id.get().get(),
      regions = self.selection.len(),
      "selection changed"
    );
  }

  /// Replaces the text covered by `region`.
  ///
  /// Selection positions after the replaced span shift by the length
  /// difference; positions inside it or at its end move to the end of the
  /// new text, so a region spanning exactly the old text spans the new one.
  pub fn replace(&mut self, region: Region, text: &str) -> Result<()> {
    let len = self.len_chars();
    if region.end() > len {
      return Err(DocumentError::OutOfBounds { region, len });
    }

    let (begin, end) = (region.begin(), region.end());
    let inserted = text.chars().count();
    self.text.remove(begin..end);
    self.text.insert(begin, text);
    self.version = self.version.saturating_add(1);

    let new_end = begin + inserted;
    let map = |pos: usize| {
      if pos <= begin {
        pos
      } else if pos <= end {
        new_end
      } else {
        pos - (end - begin) + inserted
      }
    };
    let selection = self
      .selection
      .clone()
      .transform(|sel| Region::new(map(sel.anchor), map(sel.head)));
    if selection != self.selection {
      self.set_selection(selection);
    }
    self.viewport = self.viewport.clamp(self.len_chars());
    Ok(())
  }

  pub fn add_highlight(
    &mut self,
    key: &str,
    regions: Vec<Region>,
    scope: &str,
    flags: HighlightFlags,
  ) {
    trace!(key, regions = regions.len(), "add highlight");
    self.highlights.insert(key.to_string(), Highlight {
      regions,
      scope: scope.into(),
      flags,
    });
  }

  pub fn highlight(&self, key: &str) -> Option<&Highlight> {
    self.highlights.get(key)
  }

  /// Regions of the highlight under `key`; empty when there is none.
  pub fn highlight_regions(&self, key: &str) -> Vec<Region> {
    self
      .highlights
      .get(key)
      .map(|highlight| highlight.regions.clone())
      .unwrap_or_default()
  }

  pub fn erase_highlight(&mut self, key: &str) -> Option<Highlight> {
    self.highlights.remove(key)
  }

  pub fn highlight_keys(&self) -> impl Iterator<Item = &str> {
    self.highlights.keys().map(String::as_str)
  }

  pub fn set_status(&mut self, key: &str, text: impl Into<String>) {
    self.status.insert(key.to_string(), text.into());
  }

  pub fn status(&self, key: &str) -> Option<&str> {
    self.status.get(key).map(String::as_str)
  }

  pub fn erase_status(&mut self, key: &str) {
    self.status.remove(key);
  }

  pub fn setting(&self, key: &str) -> Option<&Value> {
    self.settings.get(key)
  }

  pub fn set_setting(&mut self, key: &str, value: Value) {
    self.settings.insert(key.to_string(), value);
  }

  pub fn erase_setting(&mut self, key: &str) -> Option<Value> {
    self.settings.remove(key)
  }

  pub fn visible_region(&self) -> Region {
    self.viewport
  }

  pub fn set_visible_region(&mut self, region: Region) {
    self.viewport = region.clamp(self.len_chars());
  }

  /// Scrolls the viewport so it starts at `region` unless the region is
  /// already fully visible.
  pub fn show(&mut self, region: Region) {
    if self.viewport.contains_region(&region) {
      return;
    }
    let len = self.len_chars();
    let start = region.begin().min(len);
    let end = (start + self.viewport.len()).min(len);
    self.viewport = Region::new(start, end);
  }
}
