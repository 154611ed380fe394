//! Whole-selection transformations that need no input from the user.

use tracing::debug;

use crate::{
  document::Document,
  region::Region,
  region_set,
  selection::{
    self,
    Selection,
  },
};

/// Trims leading and trailing whitespace from every region. Regions made of
/// whitespace only collapse to a caret at their head.
pub fn strip_selection(doc: &mut Document) {
  let text = doc.text().slice(..);
  let selection = doc.selection().clone().transform(|region| {
    let fragment = region.fragment(text);
    let trimmed = fragment.trim();
    if trimmed.is_empty() {
      return Region::point(region.head);
    }

    let leading = fragment.chars().take_while(|c| c.is_whitespace()).count();
    let trailing = fragment.chars().rev().take_while(|c| c.is_whitespace()).count();
    Region::new(region.begin() + leading, region.end() - trailing).with_direction(region.direction())
  });
  doc.set_selection(selection);
}

/// Drops carets from the selection. When nothing would be left and
/// `restore_if_all_empty` is set, the selection is kept as it was.
pub fn remove_empty_regions(doc: &mut Document, restore_if_all_empty: bool) {
  let mut selection = doc.selection().clone();
  selection.retain(|region| !region.is_empty());

  if selection.is_empty() && restore_if_all_empty {
    debug!("every region is empty, keeping the selection");
    return;
  }
  doc.set_selection(selection);
}

/// Puts every head at the same end: when all regions point forward they are
/// all flipped, otherwise only the backward ones are.
pub fn normalize_region_ends(doc: &mut Document) {
  let regions = doc.selection().to_vec();
  if regions.is_empty() {
    return;
  }

  let regions = if region_set::are_all_ascending(&regions) {
    region_set::invert(&regions)
  } else {
    region_set::ascending(&regions)
  };
  let visible = doc.visible_region();
  let shown = regions
    .iter()
    .find(|region| region.intersects(&visible))
    .copied();

  doc.set_selection(Selection::new(regions));
  if let Some(region) = shown {
    doc.show(Region::point(region.head));
  }
}

/// Moves to the head of the last region, keeping only it unless
/// `clear_selection` is unset.
pub fn jump_to_last_region(doc: &mut Document, clear_selection: bool) {
  let Some(last) = doc.selection().last() else {
    return;
  };
  let caret = Region::point(last.head);

  if clear_selection {
    doc.set_selection(Selection::from(caret));
  } else {
    doc.add_region(caret);
  }
  doc.show(caret);
}

/// Scrolls to the first region below the viewport, wrapping to the first
/// region.
pub fn cycle_through_regions(doc: &mut Document) {
  let visible = doc.visible_region();
  let selection = doc.selection();
  let Some(first) = selection.first() else {
    return;
  };
  let next = selection
    .iter()
    .find(|region| region.end() > visible.end())
    .copied()
    .unwrap_or(first);
  doc.show(next);
}

pub fn split_selection_into_lines(doc: &mut Document) {
  let selection = selection::split_into_lines(doc.text().slice(..), doc.selection());
  doc.set_selection(selection);
}
