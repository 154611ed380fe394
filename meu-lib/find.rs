//! Multi-find: select every occurrence of the selected text or of a pattern.

use serde::Deserialize;
use tracing::debug;

use crate::{
  command::{
    CommandError,
    Result,
  },
  config::RegexFindConfig,
  document::{
    Document,
    HighlightFlags,
  },
  editor::MultiEdit,
  messages::MessageCenter,
  prompt::PromptHandler,
  region::Region,
  scope::ScopeScorer,
  search::{
    self,
    FindFlags,
  },
  selection::Selection,
};

pub const COMMENT_SELECTOR: &str = "comment - punctuation.definition.comment";
pub const EXPRESSION_PREVIEW_KEY: &str = "meu_expression_preview";

const SOURCE: &str = "multi_find_all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FindAllOptions {
  /// Match case.
  pub case:            bool,
  /// Only keep matches that form one of the selected words.
  pub word:            bool,
  pub ignore_comments: bool,
  /// Expand carets to the word around them.
  pub expand:          bool,
}

impl Default for FindAllOptions {
  fn default() -> Self {
    Self {
      case:            true,
      word:            false,
      ignore_comments: false,
      expand:          true,
    }
  }
}

/// Text of the words the region touches at either end.
fn word_text(doc: &Document, region: Region) -> String {
  let start = doc.word(region.begin()).begin();
  let end = doc.word(region.end()).end();
  doc.substr(Region::new(start.min(region.begin()), end.max(region.end())))
}

pub fn multi_find_all(
  doc: &mut Document,
  scopes: &dyn ScopeScorer,
  messages: &mut MessageCenter,
  options: FindAllOptions,
) -> Result<()> {
  // Searching once per distinct text keeps dozens of identical selections
  // from multiplying the work.
  let mut regions = Vec::new();
  let mut substrings: Vec<String> = Vec::new();
  for &region in doc.selection() {
    let region = if options.expand && region.is_empty() {
      doc.word(region.anchor)
    } else {
      region
    };
    let substr = doc.substr(region);
    if !substr.is_empty() && !substrings.contains(&substr) {
      regions.push(region);
      substrings.push(substr);
    }
  }

  if regions.is_empty() {
    messages.info(Some(SOURCE.into()), "Multi Find All: nothing selected");
    return Ok(());
  }

  let mut selection = Selection::new(regions);
  let selected_words: Vec<String> = selection
    .iter()
    .map(|&sel| word_text(doc, sel).to_lowercase())
    .collect();

  let mut flags = FindFlags::LITERAL;
  if !options.case {
    flags |= FindFlags::IGNORECASE;
  }

  let text = doc.text().slice(..);
  let mut found = Vec::new();
  for substr in selection.fragments(text) {
    found.extend(search::find_all(text, &substr, flags)?);
  }

  if options.word {
    found.retain(|&region| selected_words.contains(&word_text(doc, region).to_lowercase()));
  }
  if options.ignore_comments {
    found.retain(|region| scopes.score_selector(text, region.anchor, COMMENT_SELECTOR) == 0);
  }

  debug!(
    selected = selection.len(),
    found = found.len(),
    "multi find all"
  );
  selection.add_all(found);
  doc.set_selection(selection);
  Ok(())
}

/// The presets offered by the multi find menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiFindPreset {
  CaseWord,
  Case,
  Word,
  Plain,
  CaseWordNoComments,
}

impl MultiFindPreset {
  pub const ALL: [MultiFindPreset; 5] = [
    MultiFindPreset::CaseWord,
    MultiFindPreset::Case,
    MultiFindPreset::Word,
    MultiFindPreset::Plain,
    MultiFindPreset::CaseWordNoComments,
  ];

  pub fn from_index(index: usize) -> Result<Self> {
    Self::ALL
      .get(index)
      .copied()
      .ok_or(CommandError::UnknownPreset(index))
  }

  pub const fn label(self) -> &'static str {
    match self {
      MultiFindPreset::CaseWord => "Case +    Word +",
      MultiFindPreset::Case => "Case +    Word -",
      MultiFindPreset::Word => "Case -    Word +",
      MultiFindPreset::Plain => "Case -    Word -",
      MultiFindPreset::CaseWordNoComments => "Case +    Word +  Comments -",
    }
  }

  pub const fn details(self) -> &'static str {
    match self {
      MultiFindPreset::CaseWord => "Matches: case, word",
      MultiFindPreset::Case => "Matches: case  Ignores: word",
      MultiFindPreset::Word => "Matches: word  Ignores: case",
      MultiFindPreset::Plain => "Ignores: case, word",
      MultiFindPreset::CaseWordNoComments => "Matches: case, word  Ignores: matches inside comments",
    }
  }

  pub fn options(self) -> FindAllOptions {
    let (case, word, ignore_comments) = match self {
      MultiFindPreset::CaseWord => (true, true, false),
      MultiFindPreset::Case => (true, false, false),
      MultiFindPreset::Word => (false, true, false),
      MultiFindPreset::Plain => (false, false, false),
      MultiFindPreset::CaseWordNoComments => (true, true, true),
    };
    FindAllOptions {
      case,
      word,
      ignore_comments,
      ..Default::default()
    }
  }
}

fn find_flags(case: bool) -> FindFlags {
  if case {
    FindFlags::empty()
  } else {
    FindFlags::IGNORECASE
  }
}

/// Adds every match of `expression` to the selection, or cuts every match out
/// of it. Carets left over afterwards are dropped.
pub fn multi_find_regex(doc: &mut Document, subtractive: bool, expression: &str, case: bool) -> Result<()> {
  let found = search::find_all(doc.text().slice(..), expression, find_flags(case))?;

  let mut selection = doc.selection().clone();
  if subtractive {
    for region in found {
      selection.subtract(region);
    }
  } else {
    selection.add_all(found);
  }
  selection.retain(|region| !region.is_empty());

  doc.set_selection(selection);
  Ok(())
}

/// Live preview of [`multi_find_regex`]: the matches that would be added or
/// removed.
#[derive(Debug)]
pub struct RegexPrompt {
  subtractive: bool,
  case:        bool,
  scope:       String,
}

impl RegexPrompt {
  pub fn new(subtractive: bool, case: bool, config: &RegexFindConfig) -> Self {
    let scope = if subtractive {
      &config.subtractive_scope
    } else {
      &config.additive_scope
    };
    Self {
      subtractive,
      case,
      scope: scope.clone(),
    }
  }

  pub fn title(&self) -> &'static str {
    if self.subtractive {
      "Subtractive Expression"
    } else {
      "Additive Expression"
    }
  }
}

impl PromptHandler for RegexPrompt {
  fn on_change(&mut self, _editor: &mut MultiEdit, doc: &mut Document, text: &str) {
    if text.is_empty() {
      doc.erase_highlight(EXPRESSION_PREVIEW_KEY);
      return;
    }
    let Ok(found) = search::find_all(doc.text().slice(..), text, find_flags(self.case)) else {
      doc.erase_highlight(EXPRESSION_PREVIEW_KEY);
      return;
    };

    let selection = doc.selection();
    let preview: Vec<Region> = found
      .into_iter()
      .filter(|region| selection.contains(region) == self.subtractive)
      .collect();
    doc.add_highlight(
      EXPRESSION_PREVIEW_KEY,
      preview,
      &self.scope,
      HighlightFlags::DRAW_NO_FILL | HighlightFlags::PERSISTENT,
    );
  }

  fn on_confirm(self: Box<Self>, editor: &mut MultiEdit, doc: &mut Document, text: &str) -> Result<()> {
    doc.erase_highlight(EXPRESSION_PREVIEW_KEY);
    editor
      .multi_find_regex(doc, self.subtractive, Some(text), self.case)
      .map(|_| ())
  }

  fn on_cancel(self: Box<Self>, _editor: &mut MultiEdit, doc: &mut Document) {
    doc.erase_highlight(EXPRESSION_PREVIEW_KEY);
  }
}
