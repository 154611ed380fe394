//! Per-document command state, keyed by [`DocumentId`].

use std::collections::HashMap;

use tracing::trace;

use crate::{
  document::DocumentId,
  fields::FieldStore,
  selection_history::SelectionHistory,
};

#[derive(Debug, Clone, Default)]
pub struct DocumentState {
  pub fields:  FieldStore,
  pub history: SelectionHistory,
}

#[derive(Debug, Default)]
pub struct DocumentStates {
  states:        HashMap<DocumentId, DocumentState>,
  history_limit: usize,
}

impl DocumentStates {
  pub fn new(history_limit: usize) -> Self {
    Self {
      states: HashMap::new(),
      history_limit,
    }
  }

  pub fn get(&self, id: DocumentId) -> Option<&DocumentState> {
    self.states.get(&id)
  }

  pub fn get_or_create(&mut self, id: DocumentId) -> &mut DocumentState {
    let limit = self.history_limit;
    self.states.entry(id).or_insert_with(|| {
      trace!(doc = id.get().get(), "created document state");
      DocumentState {
        fields:  FieldStore::new(),
        history: SelectionHistory::with_limit(limit),
      }
    })
  }

  /// Drops the state of a closed document.
  pub fn remove(&mut self, id: DocumentId) -> Option<DocumentState> {
    self.states.remove(&id)
  }

  pub fn len(&self) -> usize {
    self.states.len()
  }

  pub fn is_empty(&self) -> bool {
    self.states.is_empty()
  }
}
