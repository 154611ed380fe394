//! Set algebra over lists of [`Region`]s.
//!
//! These are pure functions over slices. They never merge regions on their
//! own; callers that need a position-sorted, merged list go through
//! [`Selection`](crate::selection::Selection).

use tracing::trace;

use crate::region::Region;

/// Removes from every region of `base` the parts touched by any region of
/// `cut`.
///
/// Each base region is walked against the cuts in order. A cut that touches
/// the remaining part emits the piece before the cut (if any) and leaves the
/// piece after it as the new remainder. A remainder that is no longer strictly
/// ascending is dropped and ends the walk, so a cut touching a base region at a
/// single point can still consume it. A base region no cut touches survives
/// unchanged, direction included.
pub fn subtract(base: &[Region], cut: &[Region]) -> Vec<Region> {
  let mut result = Vec::with_capacity(base.len());

  'base: for &region in base {
    let mut rest = region;
    for sel in cut {
      if !rest.touches(sel) {
        continue;
      }
      if rest.begin() < sel.begin() {
        result.push(Region::new(rest.begin(), sel.begin()));
      }
      rest = Region::new(sel.end(), rest.end());
      if !rest.is_ascending() {
        continue 'base;
      }
    }
    result.push(rest);
  }

  trace!(
    base = base.len(),
    cut = cut.len(),
    result = result.len(),
    "subtracted regions"
  );
  result
}

/// `true` when every region of `b` is contained in some region of `a`.
pub fn is_subset(a: &[Region], b: &[Region]) -> bool {
  b.iter()
    .all(|inner| a.iter().any(|outer| outer.contains_region(inner)))
}

/// `true` when some region of `regions` contains `region`.
pub fn contains(regions: &[Region], region: &Region) -> bool {
  regions.iter().any(|outer| outer.contains_region(region))
}

/// Flips every region for which `flip_if` holds.
pub fn normalize<F>(regions: &[Region], mut flip_if: F) -> Vec<Region>
where
  F: FnMut(&Region) -> bool,
{
  regions
    .iter()
    .map(|region| {
      if flip_if(region) {
        region.flip()
      } else {
        *region
      }
    })
    .collect()
}

/// Flips every region.
pub fn invert(regions: &[Region]) -> Vec<Region> {
  normalize(regions, |_| true)
}

/// Flips every backward region so anchors come first.
pub fn ascending(regions: &[Region]) -> Vec<Region> {
  normalize(regions, |region| region.anchor > region.head)
}

pub fn are_all_ascending(regions: &[Region]) -> bool {
  regions.iter().all(Region::is_ascending)
}

/// Stable sort by [`Region::begin`].
pub fn sort_by_position(mut regions: Vec<Region>) -> Vec<Region> {
  regions.sort_by_key(Region::begin);
  regions
}

/// Drops regions whose span already appeared earlier in the list.
pub fn dedup(regions: impl IntoIterator<Item = Region>) -> Vec<Region> {
  let mut result: Vec<Region> = Vec::new();
  for region in regions {
    if !result.iter().any(|seen| seen.same_span(&region)) {
      result.push(region);
    }
  }
  result
}

/// Drops regions whose span appears in `other`.
pub fn without(regions: Vec<Region>, other: &[Region]) -> Vec<Region> {
  regions
    .into_iter()
    .filter(|region| !other.iter().any(|o| o.same_span(region)))
    .collect()
}

#[cfg(test)]
mod test {
  use quickcheck::quickcheck;

  use super::*;

  fn regions(list: &[(usize, usize)]) -> Vec<Region> {
    list.iter().copied().map(Region::from).collect()
  }

  fn sorted(list: Vec<(u8, u8)>) -> Vec<Region> {
    sort_by_position(
      list
        .into_iter()
        .map(|(a, b)| Region::new(a as usize, b as usize))
        .collect(),
    )
  }

  #[test]
  fn test_subtract_fields() {
    let stored = regions(&[(16, 35), (54, 54), (60, 60), (100, 103)]);
    let live = regions(&[(2, 10), (14, 20), (54, 54), (99, 120)]);

    assert_eq!(subtract(&stored, &live), regions(&[(20, 35), (60, 60)]));
  }

  #[test]
  fn test_subtract_splits() {
    let base = regions(&[(0, 20)]);
    let cut = regions(&[(3, 5), (8, 10)]);

    assert_eq!(subtract(&base, &cut), regions(&[(0, 3), (5, 8), (10, 20)]));
  }

  #[test]
  fn test_subtract_touching_end_keeps_left() {
    // The right remainder (5, 5) is not ascending and is dropped.
    assert_eq!(
      subtract(&regions(&[(0, 5)]), &regions(&[(5, 8)])),
      regions(&[(0, 5)])
    );
    // Nothing precedes the cut, the remainder is the whole region.
    assert_eq!(
      subtract(&regions(&[(5, 10)]), &regions(&[(0, 5)])),
      regions(&[(5, 10)])
    );
  }

  #[test]
  fn test_subtract_keeps_untouched_direction() {
    let base = regions(&[(32, 30), (12, 14)]);
    assert_eq!(subtract(&base, &regions(&[(50, 60)])), base);
  }

  #[test]
  fn test_is_subset() {
    let a = regions(&[(1, 4), (7, 10)]);
    assert!(is_subset(&a, &regions(&[(1, 2), (3, 4), (9, 7)])));
    assert!(!is_subset(&a, &regions(&[(1, 6)])));
    assert!(is_subset(&a, &[]));
    assert!(!is_subset(&[], &regions(&[(1, 1)])));
  }

  #[test]
  fn test_normalize_and_invert() {
    let list = regions(&[(0, 4), (9, 5), (7, 7)]);
    assert!(!are_all_ascending(&list));
    assert_eq!(ascending(&list), regions(&[(0, 4), (5, 9), (7, 7)]));
    assert_eq!(invert(&list), regions(&[(4, 0), (5, 9), (7, 7)]));
    assert!(are_all_ascending(&regions(&[(0, 4), (5, 9)])));
  }

  #[test]
  fn test_dedup_ignores_direction() {
    let list = regions(&[(0, 4), (4, 0), (5, 5), (5, 5), (6, 7)]);
    assert_eq!(dedup(list), regions(&[(0, 4), (5, 5), (6, 7)]));
  }

  quickcheck! {
    fn subtract_nothing_is_identity(list: Vec<(u8, u8)>) -> bool {
      let list = sorted(list);
      subtract(&list, &[]) == list
    }

    fn subtract_self_is_empty(list: Vec<(u8, u8)>) -> bool {
      let list = sorted(list);
      subtract(&list, &list).is_empty()
    }

    fn subtract_stays_inside_base(base: Vec<(u8, u8)>, cut: Vec<(u8, u8)>) -> bool {
      let base = sorted(base);
      let cut = sorted(cut);
      subtract(&base, &cut).iter().all(|region| contains(&base, region))
    }

    fn subset_is_reflexive(list: Vec<(u8, u8)>) -> bool {
      let list = sorted(list);
      is_subset(&list, &list)
    }

    fn invert_twice_is_identity(list: Vec<(u8, u8)>) -> bool {
      let list = sorted(list);
      invert(&invert(&list)) == list
    }
  }
}
