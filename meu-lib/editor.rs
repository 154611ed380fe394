//! Command surface shared by every document.
//!
//! [`MultiEdit`] owns what outlives a single command: the configuration, the
//! per-document field stores and selection histories, the scope scorer and
//! the message center. Documents are passed in by the host on every call.

use std::sync::Arc;

use tracing::warn;

use crate::{
  command::Result,
  config::Config,
  document::{
    Document,
    DocumentId,
  },
  fields::{
    self,
    FieldMode,
    FieldStore,
    JumpOptions,
  },
  find::{
    self,
    FindAllOptions,
    MultiFindPreset,
    RegexPrompt,
  },
  jump_to::{
    self,
    JumpToOptions,
  },
  messages::MessageCenter,
  preserve_case,
  prompt::InputPanel,
  region::Region,
  scope::{
    PlainText,
    ScopeScorer,
  },
  split::{
    self,
    SPLIT_PROMPT_TITLE,
    SplitPrompt,
  },
  stash::{
    self,
    StashItem,
  },
  state::{
    DocumentState,
    DocumentStates,
  },
  transform,
};

#[derive(Debug)]
pub struct MultiEdit {
  config:   Config,
  states:   DocumentStates,
  scopes:   Arc<dyn ScopeScorer>,
  messages: MessageCenter,
}

impl MultiEdit {
  pub fn new(config: Config) -> Self {
    Self {
      states: DocumentStates::new(config.history.limit),
      config,
      scopes: Arc::new(PlainText),
      messages: MessageCenter::default(),
    }
  }

  #[must_use]
  pub fn with_scopes(mut self, scopes: Arc<dyn ScopeScorer>) -> Self {
    self.scopes = scopes;
    self
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn messages(&self) -> &MessageCenter {
    &self.messages
  }

  pub fn messages_mut(&mut self) -> &mut MessageCenter {
    &mut self.messages
  }

  pub fn state(&self, id: DocumentId) -> Option<&DocumentState> {
    self.states.get(id)
  }

  /// Forgets the field store and selection history of a closed document.
  pub fn close_document(&mut self, id: DocumentId) {
    self.states.remove(id);
  }

  /// Feeds the pending selection-change notifications of `doc` to its
  /// selection history. Hosts call this after every selection change.
  pub fn process_selection_events(&mut self, doc: &mut Document) {
    let events = doc.take_selection_events();
    if events == 0 {
      return;
    }
    let history = &mut self.states.get_or_create(doc.id()).history;
    for _ in 0..events {
      history.on_selection_modified(doc.selection());
    }
  }

  /// Publishes the error of a failed command.
  pub fn report<T>(&mut self, source: &str, result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
      warn!(source, error = %err, "command failed");
      self.messages.error(Some(source.to_string()), err.to_string());
    }
    result
  }

  /// Answers a key binding context query for `doc`.
  pub fn query_context(&self, doc: DocumentId, key: &str, operator: &str, operand: bool) -> Result<Option<bool>> {
    let empty = FieldStore::new();
    let store = self.states.get(doc).map_or(&empty, |state| &state.fields);
    Ok(fields::query_context(store, &self.config, key, operator, operand)?)
  }

  pub fn selection_fields(&mut self, doc: &mut Document, mode: &str, jump_forward: bool, only_other: bool) -> Result<()> {
    let mode: FieldMode = mode.parse()?;
    let live = doc.selection().to_vec();
    let options = JumpOptions {
      jump_forward,
      only_other,
      add_separated: self.config.selection_fields.add_separated,
    };
    let state = self.states.get_or_create(doc.id());

    if live.is_empty() && mode.do_push(!state.fields.is_empty()) {
      self
        .messages
        .info(Some("selection_fields".into()), "Selection Fields: nothing selected");
      return Ok(());
    }

    let transition = fields::navigate(mode, &state.fields, &live, options);
    fields::apply(
      doc,
      &mut state.fields,
      &self.config.selection_fields,
      mode,
      transition,
    );
    Ok(())
  }

  pub fn multi_find_all(&mut self, doc: &mut Document, options: FindAllOptions) -> Result<()> {
    find::multi_find_all(doc, self.scopes.as_ref(), &mut self.messages, options)
  }

  /// Runs [`Self::multi_find_all`] with the preset at `index` of
  /// [`MultiFindPreset::ALL`].
  pub fn multi_find_menu(&mut self, doc: &mut Document, index: usize) -> Result<()> {
    let preset = MultiFindPreset::from_index(index)?;
    self.multi_find_all(doc, preset.options())
  }

  pub fn multi_find_regex(
    &mut self,
    doc: &mut Document,
    subtractive: bool,
    expression: Option<&str>,
    case: bool,
  ) -> Result<Option<InputPanel>> {
    if let Some(expression) = expression {
      find::multi_find_regex(doc, subtractive, expression, case)?;
      return Ok(None);
    }

    let prompt = RegexPrompt::new(subtractive, case, &self.config.find.regex);
    Ok(Some(InputPanel::new(prompt.title(), "", Box::new(prompt))))
  }

  pub fn split_selection(&mut self, doc: &mut Document, separator: Option<&str>) -> Result<Option<InputPanel>> {
    let saved = doc.selection().to_vec();
    if saved.iter().map(Region::len).sum::<usize>() == 0 {
      self
        .messages
        .info(Some("split_selection".into()), "Cannot split an empty selection.");
      return Ok(None);
    }

    match separator {
      Some(separator) => {
        split::apply_split(doc, &saved, separator);
        Ok(None)
      },
      None => {
        let prompt = SplitPrompt::new(saved, &self.config.live_split);
        Ok(Some(InputPanel::new(SPLIT_PROMPT_TITLE, " ", Box::new(prompt))))
      },
    }
  }

  pub fn preserve_case(
    &mut self,
    doc: &mut Document,
    new_string: Option<&str>,
    selections: Option<Vec<Region>>,
  ) -> Result<Option<InputPanel>> {
    preserve_case::preserve_case_command(doc, &mut self.messages, new_string, selections)
  }

  pub fn strip_selection(&mut self, doc: &mut Document) {
    transform::strip_selection(doc);
  }

  pub fn remove_empty_regions(&mut self, doc: &mut Document, restore_if_all_empty: bool) {
    transform::remove_empty_regions(doc, restore_if_all_empty);
  }

  pub fn normalize_region_ends(&mut self, doc: &mut Document) {
    transform::normalize_region_ends(doc);
  }

  pub fn jump_to_last_region(&mut self, doc: &mut Document, clear_selection: bool) {
    transform::jump_to_last_region(doc, clear_selection);
  }

  pub fn cycle_through_regions(&mut self, doc: &mut Document) {
    transform::cycle_through_regions(doc);
  }

  pub fn split_selection_into_lines(&mut self, doc: &mut Document) {
    transform::split_selection_into_lines(doc);
  }

  /// Adds the regions of the most recent recorded selection that still
  /// changes the current one.
  pub fn add_last_selection(&mut self, doc: &mut Document) {
    self.process_selection_events(doc);

    let history = &mut self.states.get_or_create(doc.id()).history;
    while let Some(snapshot) = history.pop() {
      let before = doc.selection().clone();
      for region in snapshot {
        history.suppress_next();
        doc.add_region(region);
      }
      if doc.selection() != &before {
        break;
      }
    }

    self.process_selection_events(doc);
  }

  pub fn jump_to(&mut self, doc: &mut Document, text: &str, options: JumpToOptions) -> Result<()> {
    jump_to::jump_to(doc, text, options)
  }

  pub fn jump_to_interactive(&self, initial: &str, options: JumpToOptions) -> InputPanel {
    jump_to::jump_to_prompt(initial, options)
  }

  /// Stashes the selection and returns the key to pop it with.
  pub fn stash_region_selections(&mut self, doc: &mut Document) -> String {
    stash::stash(doc)
  }

  pub fn pop_region_selections(&mut self, doc: &mut Document, key: &str) -> Result<()> {
    stash::pop(doc, key)
  }

  pub fn stash_items(&self, doc: &Document) -> Vec<StashItem> {
    stash::items(doc)
  }

  pub fn clear_stashed_selections(&mut self, doc: &mut Document) {
    stash::clear(doc);
  }

  /// Outlines the stash under `key` while a host menu highlights it.
  pub fn preview_stash(&mut self, doc: &mut Document, key: &str) {
    stash::preview(doc, key);
  }

  pub fn clear_stash_preview(&mut self, doc: &mut Document) {
    stash::clear_preview(doc);
  }
}

#[cfg(test)]
mod test {
  use std::num::NonZeroUsize;

  use ropey::Rope;

  use super::*;
  use crate::{
    command::CommandError,
    fields::STATUS_KEY,
    find::EXPRESSION_PREVIEW_KEY,
    messages::MessageLevel,
    scope::LineCommentScopes,
    selection::Selection,
    split::SPLIT_PREVIEW_KEY,
  };

  fn setup(text: &str) -> (MultiEdit, Document) {
    let doc = Document::new(DocumentId::new(NonZeroUsize::new(1).unwrap()), Rope::from(text));
    (MultiEdit::new(Config::default()), doc)
  }

  fn regions(list: &[(usize, usize)]) -> Vec<Region> {
    list.iter().copied().map(Region::from).collect()
  }

  fn stored(editor: &MultiEdit, doc: &Document) -> Vec<Region> {
    editor
      .state(doc.id())
      .map(|state| state.fields.stored().to_vec())
      .unwrap_or_default()
  }

  #[test]
  fn smart_fields_push_jump_restore() {
    let (mut editor, mut doc) = setup("this is a test");
    doc.set_selection(Selection::new(regions(&[(0, 4), (5, 9)])));

    editor.selection_fields(&mut doc, "smart", true, false).unwrap();
    assert_eq!(doc.selection().to_vec(), regions(&[(0, 4)]));
    assert_eq!(stored(&editor, &doc), regions(&[(5, 9)]));
    assert!(doc.status(STATUS_KEY).is_some());

    editor.selection_fields(&mut doc, "smart", true, false).unwrap();
    assert_eq!(doc.selection().to_vec(), regions(&[(5, 9)]));
    assert_eq!(stored(&editor, &doc), regions(&[(0, 4)]));

    editor.selection_fields(&mut doc, "smart", true, false).unwrap();
    assert_eq!(doc.selection().to_vec(), regions(&[(0, 4), (5, 9)]));
    assert!(stored(&editor, &doc).is_empty());
    assert!(doc.status(STATUS_KEY).is_none());
  }

  #[test]
  fn invalid_mode_lists_valid_modes() {
    let (mut editor, mut doc) = setup("abc");
    let result = editor.selection_fields(&mut doc, "jump", true, false);
    let err = editor.report("selection_fields", result).unwrap_err();
    assert!(matches!(err, CommandError::Fields(_)));

    let active = editor.messages().active().unwrap();
    assert_eq!(active.level, MessageLevel::Error);
    assert!(active.text.contains("Valid modes are: [push, pop, remove"));
  }

  #[test]
  fn push_with_nothing_selected_is_a_no_op() {
    let (mut editor, mut doc) = setup("abc");
    doc.set_selection(Selection::empty());
    editor.selection_fields(&mut doc, "push", true, false).unwrap();
    assert_eq!(
      editor.messages().last().unwrap().text,
      "Selection Fields: nothing selected"
    );
    assert!(stored(&editor, &doc).is_empty());
  }

  #[test]
  fn add_last_selection_restores_previous_selection() {
    let (mut editor, mut doc) = setup("one two three");
    doc.set_selection(Selection::new(regions(&[(0, 3), (4, 7)])));
    editor.process_selection_events(&mut doc);
    doc.set_selection(Selection::point(0));
    editor.process_selection_events(&mut doc);

    editor.add_last_selection(&mut doc);
    assert_eq!(doc.selection().to_vec(), regions(&[(0, 3), (4, 7)]));

    let history = &editor.state(doc.id()).unwrap().history;
    assert!(history.is_empty());
    assert_eq!(history.pending_suppressions(), 0);
  }

  #[test]
  fn add_last_selection_skips_snapshots_already_selected() {
    let (mut editor, mut doc) = setup("one two three");
    doc.set_selection(Selection::new(regions(&[(0, 3), (4, 7)])));
    editor.process_selection_events(&mut doc);
    doc.set_selection(Selection::single(8, 13));
    editor.process_selection_events(&mut doc);

    editor.add_last_selection(&mut doc);
    assert_eq!(doc.selection().to_vec(), regions(&[(0, 3), (4, 7), (8, 13)]));
  }

  #[test]
  fn add_last_selection_without_history() {
    let (mut editor, mut doc) = setup("abc");
    editor.add_last_selection(&mut doc);
    assert_eq!(doc.selection().to_vec(), regions(&[(0, 0)]));
  }

  #[test]
  fn split_prompt_previews_and_confirms() {
    let (mut editor, mut doc) = setup("a b c");
    doc.set_selection(Selection::single(0, 5));

    let mut panel = editor.split_selection(&mut doc, None).unwrap().unwrap();
    assert_eq!(panel.initial(), " ");
    panel.change(&mut editor, &mut doc, " ");
    assert_eq!(doc.highlight_regions(SPLIT_PREVIEW_KEY).len(), 3);

    panel.confirm(&mut editor, &mut doc, " ").unwrap();
    assert_eq!(doc.selection().to_vec(), regions(&[(0, 1), (2, 3), (4, 5)]));
    assert!(doc.highlight(SPLIT_PREVIEW_KEY).is_none());
  }

  #[test]
  fn split_empty_selection() {
    let (mut editor, mut doc) = setup("a b c");
    assert!(editor.split_selection(&mut doc, Some(" ")).unwrap().is_none());
    assert_eq!(
      editor.messages().last().unwrap().text,
      "Cannot split an empty selection."
    );
    assert_eq!(doc.selection().to_vec(), regions(&[(0, 0)]));
  }

  #[test]
  fn regex_prompt_cancel_keeps_selection() {
    let (mut editor, mut doc) = setup("a1 b2");
    let mut panel = editor
      .multi_find_regex(&mut doc, false, None, true)
      .unwrap()
      .unwrap();
    assert_eq!(panel.title(), "Additive Expression");

    panel.change(&mut editor, &mut doc, r"\d");
    assert_eq!(doc.highlight_regions(EXPRESSION_PREVIEW_KEY), regions(&[(1, 2), (4, 5)]));

    panel.cancel(&mut editor, &mut doc);
    assert!(doc.highlight(EXPRESSION_PREVIEW_KEY).is_none());
    assert_eq!(doc.selection().to_vec(), regions(&[(0, 0)]));
  }

  #[test]
  fn jump_to_prompt_outlines_targets() {
    let (mut editor, mut doc) = setup("ab;cd;");
    let mut panel = editor.jump_to_interactive("", JumpToOptions::default());

    panel.change(&mut editor, &mut doc, ";");
    assert_eq!(doc.highlight_regions(jump_to::PREVIEW_KEY), regions(&[(2, 2)]));
    panel.change(&mut editor, &mut doc, "");
    assert!(doc.highlight(jump_to::PREVIEW_KEY).is_none());

    panel.confirm(&mut editor, &mut doc, ";").unwrap();
    assert_eq!(doc.selection().to_vec(), regions(&[(2, 2)]));
    assert!(doc.highlight(jump_to::PREVIEW_KEY).is_none());
  }

  #[test]
  fn failed_prompt_confirm_is_reported() {
    let (mut editor, mut doc) = setup("abc");
    let panel = editor.jump_to_interactive("", JumpToOptions::default());
    assert!(panel.confirm(&mut editor, &mut doc, "/(/").is_err());
    assert_eq!(
      editor.messages().active().unwrap().text,
      "JumpTo: Error in regular expression!"
    );
  }

  #[test]
  fn multi_find_menu_ignores_comments() {
    let (editor, mut doc) = setup("x = 1\n# x\ny = x");
    let mut editor = editor.with_scopes(Arc::new(LineCommentScopes::new(&["#"])));
    doc.set_selection(Selection::single(0, 1));
    editor.multi_find_menu(&mut doc, 4).unwrap();
    assert_eq!(doc.selection().to_vec(), regions(&[(0, 1), (14, 15)]));
    assert!(editor.multi_find_menu(&mut doc, 9).is_err());
  }

  #[test]
  fn context_queries() {
    let (mut editor, mut doc) = setup("this is a test");
    let id = doc.id();
    assert_eq!(
      editor.query_context(id, "is_selection_field", "equal", true).unwrap(),
      Some(false)
    );

    doc.set_selection(Selection::new(regions(&[(0, 4), (5, 9)])));
    editor.selection_fields(&mut doc, "push", true, false).unwrap();
    assert_eq!(
      editor.query_context(id, "is_selection_field", "equal", true).unwrap(),
      Some(true)
    );
    assert_eq!(
      editor.query_context(id, "selection_fields_tab_enabled", "not_equal", true).unwrap(),
      Some(true)
    );
    assert_eq!(editor.query_context(id, "other_key", "equal", true).unwrap(), None);
    assert!(editor.query_context(id, "is_selection_field", "regex_match", true).is_err());

    editor.close_document(id);
    assert!(editor.state(id).is_none());
  }

  #[test]
  fn stash_round_trip() {
    let (mut editor, mut doc) = setup("one two");
    doc.set_selection(Selection::single(4, 7));
    let key = editor.stash_region_selections(&mut doc);
    assert!(doc.selection().is_empty());
    assert_eq!(editor.stash_items(&doc).len(), 1);

    editor.preview_stash(&mut doc, &key);
    assert_eq!(doc.highlight_regions(stash::PREVIEW_KEY), regions(&[(4, 7)]));
    editor.clear_stash_preview(&mut doc);
    assert!(doc.highlight(stash::PREVIEW_KEY).is_none());

    editor.preview_stash(&mut doc, &key);
    editor.pop_region_selections(&mut doc, &key).unwrap();
    assert_eq!(doc.selection().to_vec(), regions(&[(4, 7)]));
    assert!(doc.highlight(stash::PREVIEW_KEY).is_none());
    editor.clear_stashed_selections(&mut doc);
    assert!(editor.stash_items(&doc).is_empty());
  }
}
