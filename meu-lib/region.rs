//! A directed interval over the document text.
//!
//! A [`Region`] has two positions: `anchor` and `head`. The `head` is where the
//! caret sits, the `anchor` is the other end. When `anchor == head` the region
//! is a caret with no extent.
//!
//! ```text
//! anchor=2, head=7: "he[llo w]orld"  (forward)
//! anchor=7, head=2: "he]llo w[orld"  (backward)
//! anchor=5, head=5: "hello|world"    (caret)
//! ```
//!
//! [`Region::begin`] and [`Region::end`] return the bounds regardless of
//! direction. Set-like comparisons (containment, subset tests, duplicate
//! suppression) go through [`Region::same_span`] and ignore direction; the
//! derived `PartialEq` compares anchor and head and is what exact selection
//! restoration relies on.
//!
//! Positions are char offsets. A region is only meaningful against the text it
//! was taken from; edits are not mapped into stored regions.

use std::fmt;

use ropey::RopeSlice;

use crate::movement::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
  pub anchor: usize,
  pub head:   usize,
}

impl Region {
  #[inline]
  pub const fn new(anchor: usize, head: usize) -> Self {
    Self { anchor, head }
  }

  #[inline]
  pub const fn point(pos: usize) -> Self {
    Self::new(pos, pos)
  }

  /// Start of the region.
  #[inline]
  #[must_use]
  pub fn begin(&self) -> usize {
    std::cmp::min(self.anchor, self.head)
  }

  /// End of the region.
  #[inline]
  #[must_use]
  pub fn end(&self) -> usize {
    std::cmp::max(self.anchor, self.head)
  }

  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    self.end() - self.begin()
  }

  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.anchor == self.head
  }

  /// `true` when the anchor is strictly before the head.
  #[inline]
  pub fn is_ascending(&self) -> bool {
    self.anchor < self.head
  }

  #[inline]
  pub fn contains_region(&self, other: &Self) -> bool {
    self.begin() <= other.begin() && self.end() >= other.end()
  }

  #[inline]
  pub fn contains(&self, pos: usize) -> bool {
    self.begin() <= pos && pos < self.end()
  }

  /// Same bounds, ignoring direction.
  #[inline]
  pub fn same_span(&self, other: &Self) -> bool {
    self.begin() == other.begin() && self.end() == other.end()
  }

  /// Overlap test used when cutting fields: touching endpoints count.
  #[inline]
  pub fn touches(&self, other: &Self) -> bool {
    other.begin() <= self.end() && self.begin() <= other.end()
  }

  /// Overlap test used when merging selection regions.
  pub fn overlaps(&self, other: &Self) -> bool {
    self.begin() == other.begin() || (self.end() > other.begin() && other.end() > self.begin())
  }

  /// Non-empty intersection, or a caret strictly inside the other region.
  pub fn intersects(&self, other: &Self) -> bool {
    (self.begin() < other.end() && other.begin() < self.end())
      || (self.is_empty() && other.contains(self.begin()))
      || (other.is_empty() && self.contains(other.begin()))
  }

  #[inline]
  #[must_use]
  pub fn direction(&self) -> Direction {
    if self.head < self.anchor {
      Direction::Backward
    } else {
      Direction::Forward
    }
  }

  /// Swaps anchor and head.
  #[inline]
  #[must_use]
  pub fn flip(&self) -> Self {
    Self {
      anchor: self.head,
      head:   self.anchor,
    }
  }

  #[inline]
  #[must_use]
  pub fn with_direction(self, direction: Direction) -> Self {
    if self.direction() == direction {
      self
    } else {
      self.flip()
    }
  }

  /// Returns a `Region` that encompasses both input regions, keeping a
  /// backward direction only when both inputs are backward.
  #[must_use]
  pub fn merge(&self, other: Self) -> Self {
    if self.anchor > self.head && other.anchor > other.head {
      Self {
        anchor: self.anchor.max(other.anchor),
        head:   self.head.min(other.head),
      }
    } else {
      Self {
        anchor: self.begin().min(other.begin()),
        head:   self.end().max(other.end()),
      }
    }
  }

  /// Clamps both ends to `len`, keeping the direction.
  #[must_use]
  pub fn clamp(&self, len: usize) -> Self {
    Self::new(self.anchor.min(len), self.head.min(len))
  }

  /// Returns the covered text as a slice of `text`, clamped to its length.
  #[inline]
  pub fn slice<'a>(&self, text: RopeSlice<'a>) -> RopeSlice<'a> {
    let len = text.len_chars();
    text.slice(self.begin().min(len)..self.end().min(len))
  }

  /// Returns the covered text.
  #[inline]
  pub fn fragment(&self, text: RopeSlice) -> String {
    self.slice(text).to_string()
  }
}

impl From<(usize, usize)> for Region {
  fn from(value: (usize, usize)) -> Self {
    Self::new(value.0, value.1)
  }
}

impl From<usize> for Region {
  fn from(pos: usize) -> Self {
    Self::point(pos)
  }
}

impl From<Region> for (usize, usize) {
  fn from(region: Region) -> Self {
    (region.anchor, region.head)
  }
}

impl fmt::Display for Region {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({}, {})", self.anchor, self.head)
  }
}

#[cfg(test)]
mod test {
  use ropey::Rope;

  use super::*;

  #[test]
  fn test_bounds_ignore_direction() {
    let region = Region::new(32, 30);
    assert_eq!(region.begin(), 30);
    assert_eq!(region.end(), 32);
    assert_eq!(region.len(), 2);
    assert_eq!(region.direction(), Direction::Backward);
    assert!(!region.is_ascending());
    assert!(region.same_span(&Region::new(30, 32)));
    assert_ne!(region, Region::new(30, 32));
  }

  #[test]
  fn test_contains() {
    let region = Region::new(10, 12);

    assert!(!region.contains(9));
    assert!(region.contains(10));
    assert!(region.contains(11));
    assert!(!region.contains(12));

    assert!(region.contains_region(&Region::point(12)));
    assert!(region.contains_region(&Region::new(11, 10)));
    assert!(!region.contains_region(&Region::new(9, 12)));
  }

  #[test]
  fn test_touches() {
    fn touches(a: (usize, usize), b: (usize, usize)) -> bool {
      Region::from(a).touches(&Region::from(b))
    }

    assert!(touches((0, 3), (3, 6)));
    assert!(touches((3, 6), (0, 3)));
    assert!(touches((54, 54), (54, 54)));
    assert!(touches((6, 3), (4, 5)));
    assert!(!touches((0, 3), (4, 6)));
    assert!(!touches((16, 35), (2, 10)));
  }

  #[test]
  fn test_overlaps() {
    fn overlaps(a: (usize, usize), b: (usize, usize)) -> bool {
      Region::from(a).overlaps(&Region::from(b))
    }

    // Touching non-empty regions stay apart.
    assert!(!overlaps((0, 3), (3, 6)));
    assert!(!overlaps((6, 3), (3, 0)));
    assert!(overlaps((0, 4), (3, 6)));
    assert!(overlaps((4, 0), (6, 3)));

    // A caret at the start of a region merges into it, at the end it does not.
    assert!(overlaps((1, 4), (1, 1)));
    assert!(!overlaps((0, 3), (3, 3)));
    assert!(overlaps((1, 4), (3, 3)));

    assert!(!overlaps((0, 0), (1, 1)));
    assert!(overlaps((1, 1), (1, 1)));
  }

  #[test]
  fn test_intersects() {
    assert!(Region::new(0, 4).intersects(&Region::new(3, 8)));
    assert!(!Region::new(0, 4).intersects(&Region::new(4, 8)));
    assert!(Region::point(2).intersects(&Region::new(0, 4)));
    assert!(!Region::point(4).intersects(&Region::new(0, 4)));
  }

  #[test]
  fn test_merge_keeps_backward() {
    assert_eq!(Region::new(8, 4).merge(Region::new(6, 2)), Region::new(8, 2));
    assert_eq!(Region::new(4, 8).merge(Region::new(6, 2)), Region::new(2, 8));
  }

  #[test]
  fn test_fragment_clamps() {
    let text = Rope::from("this is a test");
    assert_eq!(Region::new(9, 5).fragment(text.slice(..)), "is a");
    assert_eq!(Region::new(10, 40).fragment(text.slice(..)), "test");
  }
}
