//! Selection fields: tab-stop navigation over stashed regions.
//!
//! A document's [`FieldStore`] holds two region lists, the *stored* fields
//! left behind by a push or jump and the *added* fields collected with
//! [`FieldMode::Add`]. The user perceives `stored ++ added` as the fields.
//!
//! Every invocation goes through [`navigate`], a pure function from the
//! mode, the store, and the live selection to a [`Transition`] describing
//! the next store contents, the next selection, and the status to show.
//! [`apply`] then writes the transition back to the store and document.
//!
//! ```text
//! EMPTY --push / smart / cycle / toggle--> CYCLING
//! CYCLING --smart / cycle jump-----------> CYCLING
//! CYCLING --pop / toggle / remove--------> EMPTY
//! CYCLING --smart past either end--------> EMPTY
//! ```
//!
//! `add` and `subtract` edit the fields in place.

use std::{
  fmt,
  str::FromStr,
};

use thiserror::Error;
use tracing::debug;

use crate::{
  config::{
    Config,
    SelectionFieldsConfig,
  },
  document::{
    Document,
    HighlightFlags,
  },
  region::Region,
  region_set,
  selection::Selection,
};

pub const STORED_FIELDS_KEY: &str = "meu_sf_stored_selections";
pub const ADDED_FIELDS_KEY: &str = "meu_sf_added_selections";
pub const STATUS_KEY: &str = "meu_field_message";

pub const FIELD_FLAGS: HighlightFlags = HighlightFlags::DRAW_EMPTY.union(HighlightFlags::DRAW_NO_FILL);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldsError {
  #[error(
    "'{0}' is an invalid mode for 'selection_fields'.\nValid modes are: [{modes}]",
    modes = FieldMode::names().join(", ")
  )]
  InvalidMode(String),
  #[error("Invalid Operator '{0}'.")]
  InvalidOperator(String),
}

pub type Result<T> = std::result::Result<T, FieldsError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldMode {
  /// Push the selection as fields, overwriting existing fields.
  Push,
  /// Restore the fields into the selection.
  Pop,
  /// Drop the fields, keeping the selection.
  Remove,
  Add,
  Subtract,
  /// Push, jump to the next field, or restore past the last one.
  #[default]
  Smart,
  /// Pop when fields exist, else push.
  Toggle,
  /// Push or jump, wrapping around. Never pops.
  Cycle,
}

impl FieldMode {
  pub const ALL: [FieldMode; 8] = [
    FieldMode::Push,
    FieldMode::Pop,
    FieldMode::Remove,
    FieldMode::Add,
    FieldMode::Subtract,
    FieldMode::Smart,
    FieldMode::Toggle,
    FieldMode::Cycle,
  ];

  pub const fn as_str(self) -> &'static str {
    match self {
      FieldMode::Push => "push",
      FieldMode::Pop => "pop",
      FieldMode::Remove => "remove",
      FieldMode::Add => "add",
      FieldMode::Subtract => "subtract",
      FieldMode::Smart => "smart",
      FieldMode::Toggle => "toggle",
      FieldMode::Cycle => "cycle",
    }
  }

  pub fn names() -> Vec<&'static str> {
    Self::ALL.iter().map(|mode| mode.as_str()).collect()
  }

  /// Whether this invocation starts a new set of fields.
  pub const fn do_push(self, has_fields: bool) -> bool {
    match self {
      FieldMode::Push => true,
      FieldMode::Pop | FieldMode::Remove | FieldMode::Subtract | FieldMode::Add => false,
      FieldMode::Smart | FieldMode::Toggle | FieldMode::Cycle => !has_fields,
    }
  }
}

impl fmt::Display for FieldMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for FieldMode {
  type Err = FieldsError;

  fn from_str(s: &str) -> Result<Self> {
    Self::ALL
      .into_iter()
      .find(|mode| mode.as_str() == s)
      .ok_or_else(|| FieldsError::InvalidMode(s.to_string()))
  }
}

/// Per-document field lists. The two lists are disjoint as sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldStore {
  stored: Vec<Region>,
  added:  Vec<Region>,
}

impl FieldStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn stored(&self) -> &[Region] {
    &self.stored
  }

  pub fn added(&self) -> &[Region] {
    &self.added
  }

  /// `stored`, followed by `added` when `include_added` is set.
  pub fn fields(&self, include_added: bool) -> Vec<Region> {
    let mut fields = self.stored.clone();
    if include_added {
      fields.extend_from_slice(&self.added);
    }
    fields
  }

  pub fn is_empty(&self) -> bool {
    self.stored.is_empty() && self.added.is_empty()
  }

  pub fn set_stored(&mut self, doc: &mut Document, config: &SelectionFieldsConfig, regions: Vec<Region>) {
    render(doc, STORED_FIELDS_KEY, &regions, &config.fields_scope);
    self.stored = regions;
  }

  pub fn set_added(&mut self, doc: &mut Document, config: &SelectionFieldsConfig, regions: Vec<Region>) {
    render(doc, ADDED_FIELDS_KEY, &regions, &config.added_fields_scope);
    self.added = regions;
  }

  /// Empties both lists and removes their highlights and the status.
  pub fn clear(&mut self, doc: &mut Document) {
    self.stored.clear();
    self.added.clear();
    doc.erase_highlight(STORED_FIELDS_KEY);
    doc.erase_highlight(ADDED_FIELDS_KEY);
    doc.erase_status(STATUS_KEY);
  }

  /// Shows "Selection-Field i of n" for the field at `position` with
  /// `remaining` other fields; erases the status when none remain.
  pub fn update_status(doc: &mut Document, position: usize, remaining: usize) {
    if remaining == 0 {
      doc.erase_status(STATUS_KEY);
    } else {
      doc.set_status(
        STATUS_KEY,
        format!("Selection-Field {} of {}", position + 1, remaining + 1),
      );
    }
  }
}

fn render(doc: &mut Document, key: &str, regions: &[Region], scope: &str) {
  if regions.is_empty() {
    doc.erase_highlight(key);
  } else {
    doc.add_highlight(key, regions.to_vec(), scope, FIELD_FLAGS);
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpOptions {
  pub jump_forward:  bool,
  /// Leave the live selection out of the fields.
  pub only_other:    bool,
  pub add_separated: bool,
}

impl Default for JumpOptions {
  fn default() -> Self {
    Self {
      jump_forward:  true,
      only_other:    false,
      add_separated: true,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStatus {
  Keep,
  Show { position: usize, remaining: usize },
  Erase,
}

/// The outcome of one selection-fields invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
  pub stored:    Vec<Region>,
  pub added:     Vec<Region>,
  pub status:    FieldStatus,
  /// Regions to select; empty leaves the selection as it is.
  pub selection: Vec<Region>,
}

impl Transition {
  /// `true` when the store ends up empty.
  pub fn is_restore(&self) -> bool {
    self.stored.is_empty() && self.added.is_empty()
  }
}

pub fn navigate(mode: FieldMode, store: &FieldStore, live: &[Region], options: JumpOptions) -> Transition {
  let has_fields = !store.is_empty();
  let has_only_added = store.stored.is_empty() && options.add_separated;

  if mode.do_push(has_fields) {
    let mut regions = live.to_vec();
    if regions.is_empty() {
      return Transition {
        stored:    store.stored.clone(),
        added:     store.added.clone(),
        status:    FieldStatus::Keep,
        selection: Vec::new(),
      };
    }
    let border = if options.jump_forward { 0 } else { regions.len() - 1 };
    let mut transition = change_selection(&mut regions, border);
    // A push only replaces the stored fields.
    let taken: Vec<Region> = transition.stored.iter().chain(&transition.selection).copied().collect();
    transition.added = region_set::without(store.added.clone(), &taken);
    return transition;
  }

  match mode {
    FieldMode::Subtract => {
      let stored = region_set::subtract(&store.fields(true), live);
      Transition {
        stored,
        added: Vec::new(),
        status: FieldStatus::Keep,
        selection: live.to_vec(),
      }
    },
    FieldMode::Add => {
      let pending = live.iter().chain(&store.added).copied();
      let (stored, added) = if options.add_separated {
        let added = region_set::without(region_set::dedup(pending), &store.stored);
        (store.stored.clone(), added)
      } else {
        let stored = region_set::dedup(live.iter().chain(&store.stored).chain(&store.added).copied());
        (stored, Vec::new())
      };
      Transition {
        stored,
        added,
        status: FieldStatus::Keep,
        selection: live.to_vec(),
      }
    },
    FieldMode::Remove => {
      let mut transition = restore(store, live, options.only_other);
      if !options.only_other {
        transition.selection = live.to_vec();
      }
      transition
    },
    FieldMode::Push | FieldMode::Pop | FieldMode::Toggle => restore(store, live, options.only_other),
    FieldMode::Smart if has_only_added => restore(store, live, options.only_other),
    FieldMode::Smart | FieldMode::Cycle => jump(mode, store, live, options),
  }
}

/// Fields plus (unless `only_other`) the live selection; the store empties.
fn restore(store: &FieldStore, live: &[Region], only_other: bool) -> Transition {
  let mut selection = store.fields(true);
  if !only_other {
    selection.extend_from_slice(live);
  }
  Transition {
    stored: Vec::new(),
    added: Vec::new(),
    status: FieldStatus::Erase,
    selection,
  }
}

/// Selects the region at `pos`; the others become the stored fields.
fn change_selection(regions: &mut Vec<Region>, pos: usize) -> Transition {
  let selected = regions.remove(pos);
  let remaining = regions.len();
  Transition {
    stored:    std::mem::take(regions),
    added:     Vec::new(),
    status:    if remaining == 0 {
      FieldStatus::Erase
    } else {
      FieldStatus::Show {
        position: pos,
        remaining,
      }
    },
    selection: vec![selected],
  }
}

fn jump(mode: FieldMode, store: &FieldStore, live: &[Region], options: JumpOptions) -> Transition {
  let mut fields = region_set::sort_by_position(store.fields(true));

  // The first field behind the last live region.
  let end = live.iter().map(Region::end).max();
  let pos = end
    .and_then(|end| fields.iter().position(|field| field.begin() > end))
    .unwrap_or(fields.len());

  let sel_count = if options.only_other {
    0
  } else {
    fields.splice(pos..pos, live.iter().copied());
    live.len()
  };

  // A forward jump skips over every live region just merged in.
  let pos = if options.jump_forward {
    pos as isize + sel_count as isize
  } else {
    pos as isize - 1
  };

  let len = fields.len() as isize;
  if len == 0 {
    return restore(store, live, options.only_other);
  }
  let pos = if mode == FieldMode::Cycle {
    pos.rem_euclid(len)
  } else {
    pos
  };

  if (0..len).contains(&pos) {
    change_selection(&mut fields, pos as usize)
  } else {
    restore(store, live, options.only_other)
  }
}

/// Writes `transition` to `store` and `doc`.
pub fn apply(
  doc: &mut Document,
  store: &mut FieldStore,
  config: &SelectionFieldsConfig,
  mode: FieldMode,
  transition: Transition,
) {
  debug!(
    doc = doc.id().get().get(),
    %mode,
    stored = transition.stored.len(),
    added = transition.added.len(),
    selection = transition.selection.len(),
    "selection fields"
  );

  if transition.is_restore() {
    store.clear(doc);
  } else {
    store.set_stored(doc, config, transition.stored);
    store.set_added(doc, config, transition.added);
    match transition.status {
      FieldStatus::Keep => {},
      FieldStatus::Show {
        position,
        remaining,
      } => FieldStore::update_status(doc, position, remaining),
      FieldStatus::Erase => doc.erase_status(STATUS_KEY),
    }
  }

  if let Some(&first) = transition.selection.first() {
    doc.set_selection(Selection::new(transition.selection));
    doc.show(first);
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextOperator {
  Equal,
  NotEqual,
}

impl FromStr for ContextOperator {
  type Err = FieldsError;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "equal" => Ok(ContextOperator::Equal),
      "not_equal" => Ok(ContextOperator::NotEqual),
      other => Err(FieldsError::InvalidOperator(other.to_string())),
    }
  }
}

/// Answers a key binding context query.
///
/// Returns `Ok(None)` for keys this module does not own.
pub fn query_context(
  store: &FieldStore,
  config: &Config,
  key: &str,
  operator: &str,
  operand: bool,
) -> Result<Option<bool>> {
  let value = match key {
    "is_selection_field" => !store.stored.is_empty(),
    "is_selection_field.added_fields" => !store.is_empty(),
    "selection_fields_tab_enabled" => config.selection_fields.tab_enabled,
    "selection_fields_escape_enabled" => config.selection_fields.escape_enabled,
    _ => return Ok(None),
  };

  Ok(Some(match operator.parse()? {
    ContextOperator::Equal => value == operand,
    ContextOperator::NotEqual => value != operand,
  }))
}
