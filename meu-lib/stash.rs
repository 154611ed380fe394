//! Stashing the selection away and popping it back later.
//!
//! Stashed regions live in a hidden persistent highlight. The per-view setting
//! [`STASH_SETTINGS_KEY`] maps each stash key to a short description for
//! menus.

use chrono::Local;
use serde::Serialize;
use serde_json::{
  Map,
  Value,
};
use tracing::debug;
use uuid::Uuid;

use crate::{
  command::{
    CommandError,
    Result,
  },
  document::{
    Document,
    HighlightFlags,
  },
  region::Region,
  selection::Selection,
};

pub const STASH_SETTINGS_KEY: &str = "meu_pop_stashed_regions";
pub const PREVIEW_KEY: &str = "meu_pop_stashed_region_preview";
pub const PREVIEW_SCOPE: &str = "region.cyanish";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StashItem {
  pub key:        String,
  /// `Total of <strong>N</strong> selections`
  pub summary:    String,
  /// `Stashed at: <timestamp>`
  pub stashed_at: String,
}

fn highlight_key(key: &str) -> String {
  format!("{STASH_SETTINGS_KEY}_{key}")
}

fn entries(doc: &Document) -> Map<String, Value> {
  match doc.setting(STASH_SETTINGS_KEY) {
    Some(Value::Object(entries)) => entries.clone(),
    _ => Map::new(),
  }
}

/// Moves the selection into a new stash and returns its key. The selection
/// is cleared.
pub fn stash(doc: &mut Document) -> String {
  let key = Uuid::new_v4().to_string();
  let regions = doc.selection().to_vec();
  let description = format!(
    "Total of <strong>{}</strong> selections|Stashed at: {}",
    regions.len(),
    Local::now().format(TIMESTAMP_FORMAT)
  );

  let name = highlight_key(&key);
  doc.add_highlight(
    &name,
    regions,
    &name,
    HighlightFlags::HIDDEN | HighlightFlags::PERSISTENT,
  );

  let mut entries = entries(doc);
  entries.insert(key.clone(), Value::String(description));
  doc.set_setting(STASH_SETTINGS_KEY, Value::Object(entries));

  doc.clear_selection();
  debug!(doc = doc.id().get().get(), key = %key, "stashed selection");
  key
}

/// Replaces the selection with the stash under `key` and drops the stash.
pub fn pop(doc: &mut Document, key: &str) -> Result<()> {
  let name = highlight_key(key);
  let Some(highlight) = doc.erase_highlight(&name) else {
    return Err(CommandError::UnknownStash(key.to_string()));
  };

  let mut entries = entries(doc);
  entries.remove(key);
  doc.set_setting(STASH_SETTINGS_KEY, Value::Object(entries));
  doc.erase_highlight(PREVIEW_KEY);

  doc.set_selection(Selection::new(highlight.regions));
  debug!(doc = doc.id().get().get(), key, "popped selection");
  Ok(())
}

/// The stashes of `doc`, oldest first.
pub fn items(doc: &Document) -> Vec<StashItem> {
  let mut items: Vec<StashItem> = entries(doc)
    .into_iter()
    .filter_map(|(key, description)| {
      let description = description.as_str()?;
      let (summary, stashed_at) = description.split_once('|').unwrap_or((description, ""));
      Some(StashItem {
        key,
        summary: summary.to_string(),
        stashed_at: stashed_at.to_string(),
      })
    })
    .collect();
  items.sort_by(|a, b| a.stashed_at.cmp(&b.stashed_at));
  items
}

/// The regions stashed under `key`.
pub fn stashed_regions(doc: &Document, key: &str) -> Option<Vec<Region>> {
  doc
    .highlight(&highlight_key(key))
    .map(|highlight| highlight.regions.clone())
}

/// Outlines the stash under `key`, for menus that preview the highlighted
/// entry.
pub fn preview(doc: &mut Document, key: &str) {
  match stashed_regions(doc, key) {
    Some(regions) => doc.add_highlight(PREVIEW_KEY, regions, PREVIEW_SCOPE, HighlightFlags::DRAW_NO_FILL),
    None => {
      doc.erase_highlight(PREVIEW_KEY);
    },
  }
}

pub fn clear_preview(doc: &mut Document) {
  doc.erase_highlight(PREVIEW_KEY);
}

/// Drops every stash of `doc`.
pub fn clear(doc: &mut Document) {
  if let Some(Value::Object(entries)) = doc.erase_setting(STASH_SETTINGS_KEY) {
    for key in entries.keys() {
      doc.erase_highlight(&highlight_key(key));
    }
  }
  doc.erase_highlight(PREVIEW_KEY);
}

#[cfg(test)]
mod test {
  use std::num::NonZeroUsize;

  use ropey::Rope;

  use super::*;
  use crate::document::DocumentId;

  fn doc(text: &str) -> Document {
    Document::new(DocumentId::new(NonZeroUsize::new(1).unwrap()), Rope::from(text))
  }

  #[test]
  fn test_stash_and_pop() {
    let mut doc = doc("one two three");
    doc.set_selection(Selection::new([Region::new(0, 3), Region::new(4, 7)]));

    let key = stash(&mut doc);
    assert!(doc.selection().is_empty());
    let highlight = doc.highlight(&format!("meu_pop_stashed_regions_{key}")).unwrap();
    assert!(highlight.flags.contains(HighlightFlags::HIDDEN));

    let items = items(&doc);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].key, key);
    assert_eq!(items[0].summary, "Total of <strong>2</strong> selections");
    assert!(items[0].stashed_at.starts_with("Stashed at: "));

    pop(&mut doc, &key).unwrap();
    assert_eq!(doc.selection().to_vec(), vec![Region::new(0, 3), Region::new(4, 7)]);
    assert!(super::items(&doc).is_empty());
    assert!(stashed_regions(&doc, &key).is_none());
  }

  #[test]
  fn test_pop_unknown_key() {
    let mut doc = doc("abc");
    doc.set_selection(Selection::single(0, 1));
    assert!(matches!(pop(&mut doc, "nope"), Err(CommandError::UnknownStash(_))));
    assert_eq!(doc.selection().to_vec(), vec![Region::new(0, 1)]);
  }

  #[test]
  fn test_preview_and_clear() {
    let mut doc = doc("abc def");
    doc.set_selection(Selection::single(4, 7));
    let first = stash(&mut doc);
    doc.set_selection(Selection::single(0, 3));
    stash(&mut doc);
    assert_eq!(items(&doc).len(), 2);

    preview(&mut doc, &first);
    assert_eq!(doc.highlight_regions(PREVIEW_KEY), vec![Region::new(4, 7)]);
    clear_preview(&mut doc);
    assert!(doc.highlight(PREVIEW_KEY).is_none());

    clear(&mut doc);
    assert!(items(&doc).is_empty());
    assert!(doc.setting(STASH_SETTINGS_KEY).is_none());
    assert!(stashed_regions(&doc, &first).is_none());
  }
}
