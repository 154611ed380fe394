//! The live multi-region selection of a document.
//!
//! A [`Selection`] holds zero or more [`Region`]s and keeps them normalized
//! the way the host editor does:
//!
//! - Sorted by [`Region::begin`]
//! - Overlapping regions are merged (see [`Region::overlaps`]); regions that
//!   merely touch stay separate
//!
//! Unlike a cursor set, a selection may be empty for the duration of a
//! command that clears it and adds regions back one by one.
//!
//! ```ignore
//! use meu_lib::{region::Region, selection::Selection};
//!
//! let mut selection = Selection::new([Region::new(5, 9), Region::new(0, 4)]);
//! selection.add(Region::new(3, 6));
//! assert_eq!(selection.regions(), &[Region::new(0, 9)]);
//! ```

use std::iter;

use meu_core::line_ending::get_line_ending;
use ropey::RopeSlice;
use smallvec::SmallVec;

use crate::{
  region::Region,
  region_set,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Selection {
  regions: SmallVec<[Region; 1]>,
}

impl Selection {
  pub fn new(regions: impl IntoIterator<Item = Region>) -> Self {
    Self {
      regions: regions.into_iter().collect(),
    }
    .normalize()
  }

  pub fn empty() -> Self {
    Self::default()
  }

  /// Constructs a selection holding a single region.
  #[must_use]
  pub fn single(anchor: usize, head: usize) -> Self {
    Region::new(anchor, head).into()
  }

  pub fn point(pos: usize) -> Self {
    Region::point(pos).into()
  }

  pub fn regions(&self) -> &[Region] {
    &self.regions
  }

  pub fn to_vec(&self) -> Vec<Region> {
    self.regions.to_vec()
  }

  /// Number of regions.
  #[inline]
  pub fn len(&self) -> usize {
    self.regions.len()
  }

  /// `true` when there are no regions at all.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.regions.is_empty()
  }

  /// Total number of selected chars.
  pub fn size(&self) -> usize {
    self.regions.iter().map(Region::len).sum()
  }

  pub fn first(&self) -> Option<Region> {
    self.regions.first().copied()
  }

  pub fn last(&self) -> Option<Region> {
    self.regions.last().copied()
  }

  #[inline(always)]
  pub fn iter(&self) -> std::slice::Iter<'_, Region> {
    self.regions.iter()
  }

  /// Adds a region, merging it with any region it overlaps.
  pub fn add(&mut self, region: Region) {
    self.regions.push(region);
    *self = std::mem::take(self).normalize();
  }

  pub fn add_all(&mut self, regions: impl IntoIterator<Item = Region>) {
    self.regions.extend(regions);
    *self = std::mem::take(self).normalize();
  }

  /// Cuts `region` out of every selected region.
  ///
  /// Carets inside or at the edges of `region` are removed as well.
  pub fn subtract(&mut self, region: Region) {
    let regions: SmallVec<[Region; 1]> = self
      .regions
      .iter()
      .flat_map(|sel| {
        if sel.is_empty() {
          let inside = region.begin() <= sel.begin() && sel.begin() <= region.end();
          return if inside { Vec::new() } else { vec![*sel] };
        }
        region_set::subtract(&[*sel], &[region])
          .into_iter()
          .map(|piece| piece.with_direction(sel.direction()))
          .collect()
      })
      .collect();
    self.regions = regions;
  }

  pub fn clear(&mut self) {
    self.regions.clear();
  }

  /// `true` when some selected region contains `region`.
  pub fn contains(&self, region: &Region) -> bool {
    region_set::contains(&self.regions, region)
  }

  /// `true` when every region of `other` is contained in this selection.
  pub fn contains_all(&self, other: &[Region]) -> bool {
    region_set::is_subset(&self.regions, other)
  }

  /// Apply a transformation to all regions and return a new Selection.
  pub fn transform<F>(mut self, mut f: F) -> Self
  where
    F: FnMut(Region) -> Region,
  {
    for region in self.regions.iter_mut() {
      *region = f(*region)
    }

    self.normalize()
  }

  /// Keeps the regions matching `keep`.
  pub fn retain<F>(&mut self, mut keep: F)
  where
    F: FnMut(&Region) -> bool,
  {
    self.regions.retain(|region| keep(region));
  }

  pub fn fragments<'a>(
    &'a self,
    slice: RopeSlice<'a>,
  ) -> impl DoubleEndedIterator<Item = String> + ExactSizeIterator<Item = String> + 'a {
    self.regions.iter().map(move |region| region.fragment(slice))
  }

  /// Sorts by [`Region::begin`] and merges overlapping regions.
  fn normalize(mut self) -> Self {
    if self.regions.len() < 2 {
      return self;
    }
    self.regions.sort_by_key(Region::begin);

    let mut regions: SmallVec<[Region; 1]> = SmallVec::with_capacity(self.regions.len());
    for region in self.regions.drain(..) {
      if let Some(prev) = regions.last_mut() {
        if prev.overlaps(&region) {
          *prev = prev.merge(region);
          continue;
        }
      }
      regions.push(region);
    }

    self.regions = regions;
    self
  }
}

impl<'a> IntoIterator for &'a Selection {
  type Item = &'a Region;
  type IntoIter = std::slice::Iter<'a, Region>;

  fn into_iter(self) -> std::slice::Iter<'a, Region> {
    self.regions.iter()
  }
}

impl IntoIterator for Selection {
  type Item = Region;
  type IntoIter = smallvec::IntoIter<[Region; 1]>;

  fn into_iter(self) -> smallvec::IntoIter<[Region; 1]> {
    self.regions.into_iter()
  }
}

impl From<Region> for Selection {
  fn from(region: Region) -> Self {
    Self {
      regions: iter::once(region).collect(),
    }
  }
}

impl FromIterator<Region> for Selection {
  fn from_iter<T: IntoIterator<Item = Region>>(iter: T) -> Self {
    Self::new(iter)
  }
}

/// Splits every region at its line endings, dropping the line endings.
///
/// Carets are kept as they are.
pub fn split_into_lines(text: RopeSlice, selection: &Selection) -> Selection {
  let mut regions = Vec::with_capacity(selection.len());

  for sel in selection {
    if sel.is_empty() {
      regions.push(*sel);
      continue;
    }

    let sel_end = sel.end();
    let mut start = sel.begin();

    for line in sel.slice(text).lines() {
      let Some(line_ending) = get_line_ending(&line) else {
        break;
      };
      let line_end = start + line.len_chars();
      regions.push(Region::new(start, line_end - line_ending.len_chars()).with_direction(sel.direction()));
      start = line_end;
    }

    if start < sel_end {
      regions.push(Region::new(start, sel_end).with_direction(sel.direction()));
    }
  }

  Selection::new(regions)
}

#[cfg(test)]
mod test {
  use ropey::Rope;

  use super::*;

  fn spans(selection: &Selection) -> String {
    selection
      .iter()
      .map(|region| format!("{}/{}", region.anchor, region.head))
      .collect::<Vec<String>>()
      .join(",")
  }

  #[test]
  fn test_create_normalizes_and_merges() {
    let sel = Selection::new([
      Region::new(10, 12),
      Region::new(6, 7),
      Region::new(4, 5),
      Region::new(3, 4),
      Region::new(0, 6),
      Region::new(7, 8),
      Region::new(9, 13),
      Region::new(13, 14),
    ]);

    assert_eq!(spans(&sel), "0/6,6/7,7/8,9/13,13/14");
  }

  #[test]
  fn test_keeps_direction_and_order() {
    let sel = Selection::new([Region::new(60, 60), Region::new(32, 30), Region::new(12, 14)]);
    assert_eq!(spans(&sel), "12/14,32/30,60/60");
  }

  #[test]
  fn test_add_merges() {
    let mut sel = Selection::new([Region::new(0, 4), Region::new(5, 9)]);
    sel.add(Region::new(5, 9));
    assert_eq!(sel.len(), 2);
    sel.add(Region::new(3, 6));
    assert_eq!(spans(&sel), "0/9");
  }

  #[test]
  fn test_subtract() {
    let mut sel = Selection::new([Region::new(0, 10), Region::point(12), Region::new(20, 14)]);
    sel.subtract(Region::new(3, 5));
    sel.subtract(Region::new(12, 16));
    assert_eq!(spans(&sel), "0/3,5/10,20/16");

    let mut sel = Selection::new([Region::new(0, 3), Region::new(4, 7)]);
    sel.subtract(Region::new(4, 7));
    assert_eq!(spans(&sel), "0/3");
  }

  #[test]
  fn test_contains() {
    let sel = Selection::new([Region::new(1, 4), Region::new(7, 10)]);
    assert!(sel.contains(&Region::new(2, 3)));
    assert!(!sel.contains(&Region::new(3, 8)));
    assert!(sel.contains_all(&[Region::new(1, 2), Region::new(9, 7)]));
  }

  #[test]
  fn test_split_into_lines() {
    let text = Rope::from("a\nb\n\nc");
    let sel = split_into_lines(text.slice(..), &Selection::single(0, 6));
    assert_eq!(spans(&sel), "0/1,2/3,4/4,5/6");
  }
}
