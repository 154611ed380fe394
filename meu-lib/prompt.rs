//! Interactive prompts.
//!
//! Commands that need a line of text from the user return an [`InputPanel`]
//! instead of finishing right away. The host shows the panel and forwards
//! the user's edits:
//!
//! - [`InputPanel::change`] on every edit (live previews)
//! - [`InputPanel::confirm`] when the user accepts the text
//! - [`InputPanel::cancel`] when the user dismisses the panel
//!
//! Handlers capture whatever they need from before the prompt opened, such
//! as the selection to operate on. Cancelling only removes previews; the
//! selection and the selection fields stay as they were.

use std::fmt;

use crate::{
  command::Result,
  document::Document,
  editor::MultiEdit,
};

pub trait PromptHandler: fmt::Debug {
  fn on_change(&mut self, editor: &mut MultiEdit, doc: &mut Document, text: &str);

  fn on_confirm(self: Box<Self>, editor: &mut MultiEdit, doc: &mut Document, text: &str) -> Result<()>;

  fn on_cancel(self: Box<Self>, editor: &mut MultiEdit, doc: &mut Document);
}

pub struct InputPanel {
  title:   String,
  initial: String,
  /// Whether the host should select the initial text.
  select:  bool,
  handler: Box<dyn PromptHandler>,
}

impl InputPanel {
  pub fn new(title: impl Into<String>, initial: impl Into<String>, handler: Box<dyn PromptHandler>) -> Self {
    Self {
      title: title.into(),
      initial: initial.into(),
      select: true,
      handler,
    }
  }

  #[must_use]
  pub fn with_initial_selected(mut self, select: bool) -> Self {
    self.select = select;
    self
  }

  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn initial(&self) -> &str {
    &self.initial
  }

  pub fn select_initial(&self) -> bool {
    self.select
  }

  pub fn change(&mut self, editor: &mut MultiEdit, doc: &mut Document, text: &str) {
    self.handler.on_change(editor, doc, text);
  }

  /// Runs the command with `text`. Errors are also published to the
  /// message center.
  pub fn confirm(self, editor: &mut MultiEdit, doc: &mut Document, text: &str) -> Result<()> {
    let result = self.handler.on_confirm(editor, doc, text);
    editor.report(&self.title, result)
  }

  pub fn cancel(self, editor: &mut MultiEdit, doc: &mut Document) {
    self.handler.on_cancel(editor, doc);
  }
}

impl fmt::Debug for InputPanel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("InputPanel")
      .field("title", &self.title)
      .field("initial", &self.initial)
      .field("handler", &self.handler)
      .finish()
  }
}
