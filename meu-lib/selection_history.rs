//! Per-document history of complex selections.
//!
//! Every selection-change notification is offered to
//! [`SelectionHistory::on_selection_modified`]. A selection with more than one
//! region, or with a single non-empty region, is recorded; a selection that
//! only grew from the last snapshot replaces it instead of adding a step.
//!
//! Changes made while restoring a snapshot must not be recorded. Callers
//! register one suppression per notification they are about to cause with
//! [`SelectionHistory::suppress_next`].

use std::collections::VecDeque;

use tracing::trace;

use crate::{
  region::Region,
  region_set,
  selection::Selection,
};

pub const DEFAULT_LIMIT: usize = 256;

#[derive(Debug, Clone)]
pub struct SelectionHistory {
  snapshots: VecDeque<Vec<Region>>,
  suppress:  usize,
  limit:     usize,
}

impl Default for SelectionHistory {
  fn default() -> Self {
    Self::with_limit(DEFAULT_LIMIT)
  }
}

impl SelectionHistory {
  pub fn with_limit(limit: usize) -> Self {
    Self {
      snapshots: VecDeque::new(),
      suppress:  0,
      limit:     limit.max(1),
    }
  }

  pub fn len(&self) -> usize {
    self.snapshots.len()
  }

  pub fn is_empty(&self) -> bool {
    self.snapshots.is_empty()
  }

  pub fn last(&self) -> Option<&[Region]> {
    self.snapshots.back().map(Vec::as_slice)
  }

  /// Ignore the next selection-change notification.
  pub fn suppress_next(&mut self) {
    self.suppress += 1;
  }

  pub fn pending_suppressions(&self) -> usize {
    self.suppress
  }

  pub fn pop(&mut self) -> Option<Vec<Region>> {
    self.snapshots.pop_back()
  }

  pub fn on_selection_modified(&mut self, selection: &Selection) {
    if self.suppress > 0 {
      self.suppress -= 1;
      return;
    }
    if !is_complex(selection) {
      return;
    }

    let current = selection.to_vec();
    match self.snapshots.back_mut() {
      Some(last) if region_set::is_subset(&current, last) => *last = current,
      _ => {
        self.snapshots.push_back(current);
        while self.snapshots.len() > self.limit {
          self.snapshots.pop_front();
        }
      },
    }
    trace!(snapshots = self.snapshots.len(), "recorded selection");
  }
}

/// More than one region, or a single non-empty region.
pub fn is_complex(selection: &Selection) -> bool {
  selection.len() > 1 || selection.first().is_some_and(|region| !region.is_empty())
}

#[cfg(test)]
mod test {
  use super::*;

  fn sel(list: &[(usize, usize)]) -> Selection {
    Selection::new(list.iter().copied().map(Region::from))
  }

  #[test]
  fn test_records_only_complex() {
    let mut history = SelectionHistory::default();
    history.on_selection_modified(&sel(&[(3, 3)]));
    history.on_selection_modified(&Selection::empty());
    assert!(history.is_empty());

    history.on_selection_modified(&sel(&[(1, 1), (3, 3)]));
    history.on_selection_modified(&sel(&[(5, 9)]));
    assert_eq!(history.len(), 2);
  }

  #[test]
  fn test_growth_replaces_last() {
    let mut history = SelectionHistory::default();
    history.on_selection_modified(&sel(&[(2, 4)]));
    history.on_selection_modified(&sel(&[(0, 6)]));
    history.on_selection_modified(&sel(&[(0, 6), (9, 12)]));
    assert_eq!(history.len(), 1);
    assert_eq!(history.last().unwrap(), &[Region::new(0, 6), Region::new(9, 12)]);

    history.on_selection_modified(&sel(&[(20, 22)]));
    assert_eq!(history.len(), 2);
  }

  #[test]
  fn test_suppression_is_counted() {
    let mut history = SelectionHistory::default();
    history.suppress_next();
    history.suppress_next();
    history.on_selection_modified(&sel(&[(0, 1)]));
    history.on_selection_modified(&sel(&[(5, 6)]));
    assert!(history.is_empty());
    assert_eq!(history.pending_suppressions(), 0);

    history.on_selection_modified(&sel(&[(5, 6)]));
    assert_eq!(history.len(), 1);
  }

  #[test]
  fn test_limit_evicts_oldest() {
    let mut history = SelectionHistory::with_limit(2);
    history.on_selection_modified(&sel(&[(0, 1)]));
    history.on_selection_modified(&sel(&[(2, 3)]));
    history.on_selection_modified(&sel(&[(4, 5)]));
    assert_eq!(history.len(), 2);
    assert_eq!(history.pop(), Some(vec![Region::new(4, 5)]));
    assert_eq!(history.pop(), Some(vec![Region::new(2, 3)]));
    assert_eq!(history.pop(), None);
  }
}
