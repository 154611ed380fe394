//! Command names, arguments and dispatch.
//!
//! Hosts that bind commands by name call [`MultiEdit::run_command`] with the
//! command name and its JSON arguments. Every argument is optional unless
//! noted and takes the same default as the corresponding method.

use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::{
  document::{
    Document,
    DocumentError,
  },
  editor::MultiEdit,
  fields::FieldsError,
  find::FindAllOptions,
  jump_to::JumpToOptions,
  prompt::InputPanel,
  region::Region,
  search::SearchError,
  stash::StashItem,
};

#[derive(Debug, Error)]
pub enum CommandError {
  #[error(transparent)]
  Fields(#[from] FieldsError),
  #[error(transparent)]
  Search(#[from] SearchError),
  #[error(transparent)]
  Document(#[from] DocumentError),
  #[error("unknown command '{0}'")]
  UnknownCommand(String),
  #[error("invalid arguments for '{command}': {source}")]
  InvalidArgs {
    command: &'static str,
    #[source]
    source:  serde_json::Error,
  },
  #[error("'{0}' is not a multi find preset")]
  UnknownPreset(usize),
  #[error("no selections are stashed under '{0}'")]
  UnknownStash(String),
  #[error("JumpTo: Error in regular expression!")]
  InvalidJumpPattern(#[source] SearchError),
}

pub type Result<T> = std::result::Result<T, CommandError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
  SelectionFields,
  MultiFindAll,
  MultiFindMenu,
  MultiFindRegex,
  SplitSelection,
  PreserveCase,
  StripSelection,
  RemoveEmptyRegions,
  NormalizeRegionEnds,
  JumpToLastRegion,
  AddLastSelection,
  CycleThroughRegions,
  JumpTo,
  JumpToInteractive,
  StashRegionSelections,
  PopRegionSelections,
  StashItems,
  ClearStashedSelections,
  SplitSelectionIntoLines,
}

impl Command {
  pub const ALL: [Command; 19] = [
    Command::SelectionFields,
    Command::MultiFindAll,
    Command::MultiFindMenu,
    Command::MultiFindRegex,
    Command::SplitSelection,
    Command::PreserveCase,
    Command::StripSelection,
    Command::RemoveEmptyRegions,
    Command::NormalizeRegionEnds,
    Command::JumpToLastRegion,
    Command::AddLastSelection,
    Command::CycleThroughRegions,
    Command::JumpTo,
    Command::JumpToInteractive,
    Command::StashRegionSelections,
    Command::PopRegionSelections,
    Command::StashItems,
    Command::ClearStashedSelections,
    Command::SplitSelectionIntoLines,
  ];

  pub const fn name(self) -> &'static str {
    match self {
      Command::SelectionFields => "selection_fields",
      Command::MultiFindAll => "multi_find_all",
      Command::MultiFindMenu => "multi_find_menu",
      Command::MultiFindRegex => "multi_find_regex",
      Command::SplitSelection => "split_selection",
      Command::PreserveCase => "preserve_case",
      Command::StripSelection => "strip_selection",
      Command::RemoveEmptyRegions => "remove_empty_regions",
      Command::NormalizeRegionEnds => "normalize_region_ends",
      Command::JumpToLastRegion => "jump_to_last_region",
      Command::AddLastSelection => "add_last_selection",
      Command::CycleThroughRegions => "cycle_through_regions",
      Command::JumpTo => "jump_to",
      Command::JumpToInteractive => "jump_to_interactive",
      Command::StashRegionSelections => "stash_region_selections",
      Command::PopRegionSelections => "pop_region_selections",
      Command::StashItems => "stash_items",
      Command::ClearStashedSelections => "clear_stashed_selections",
      Command::SplitSelectionIntoLines => "split_selection_into_lines",
    }
  }
}

impl FromStr for Command {
  type Err = CommandError;

  fn from_str(s: &str) -> Result<Self> {
    Self::ALL
      .into_iter()
      .find(|command| command.name() == s)
      .ok_or_else(|| CommandError::UnknownCommand(s.to_string()))
  }
}

/// What a command hands back to the host.
#[derive(Debug)]
pub enum CommandOutput {
  Done,
  /// The command waits for text from the user.
  Prompt(InputPanel),
  StashKey(String),
  StashItems(Vec<StashItem>),
}

impl From<Option<InputPanel>> for CommandOutput {
  fn from(panel: Option<InputPanel>) -> Self {
    panel.map_or(CommandOutput::Done, CommandOutput::Prompt)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionFieldsArgs {
  pub mode:         String,
  pub jump_forward: bool,
  pub only_other:   bool,
}

impl Default for SelectionFieldsArgs {
  fn default() -> Self {
    Self {
      mode:         "smart".to_string(),
      jump_forward: true,
      only_other:   false,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MultiFindMenuArgs {
  pub operation: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MultiFindRegexArgs {
  pub subtractive: bool,
  pub expression:  Option<String>,
  pub case:        bool,
}

impl Default for MultiFindRegexArgs {
  fn default() -> Self {
    Self {
      subtractive: false,
      expression:  None,
      case:        true,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplitSelectionArgs {
  pub separator: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreserveCaseArgs {
  #[serde(rename = "newString", alias = "new_string")]
  pub new_string: Option<String>,
  pub selections: Option<Vec<(usize, usize)>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemoveEmptyRegionsArgs {
  pub restore_if_all_empty: bool,
}

impl Default for RemoveEmptyRegionsArgs {
  fn default() -> Self {
    Self {
      restore_if_all_empty: true,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JumpToLastRegionArgs {
  pub clear_selection: bool,
}

impl Default for JumpToLastRegionArgs {
  fn default() -> Self {
    Self {
      clear_selection: true,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JumpToArgs {
  pub text:        String,
  pub extend:      bool,
  pub create_new:  bool,
  pub whole_match: bool,
}

impl JumpToArgs {
  pub fn options(&self) -> JumpToOptions {
    JumpToOptions {
      extend:      self.extend,
      create_new:  self.create_new,
      whole_match: self.whole_match,
    }
  }
}

/// A stash key, or `-1` for "nothing picked".
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StashIndex {
  Key(String),
  Index(i64),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PopRegionSelectionsArgs {
  pub index: StashIndex,
}

fn parse_args<T>(command: Command, args: Value) -> Result<T>
where
  T: for<'de> Deserialize<'de>,
{
  let args = if args.is_null() {
    Value::Object(Default::default())
  } else {
    args
  };
  serde_json::from_value(args).map_err(|source| {
    CommandError::InvalidArgs {
      command: command.name(),
      source,
    }
  })
}

impl MultiEdit {
  /// Runs the command called `name` with JSON `args` (`null` for none).
  ///
  /// Errors are also published to the message center.
  pub fn run_command(&mut self, doc: &mut Document, name: &str, args: Value) -> Result<CommandOutput> {
    let result = self.dispatch(doc, name, args);
    debug!(
      doc = doc.id().get().get(),
      command = name,
      ok = result.is_ok(),
      "run command"
    );
    self.report(name, result)
  }

  fn dispatch(&mut self, doc: &mut Document, name: &str, args: Value) -> Result<CommandOutput> {
    let command: Command = name.parse()?;
    let output = match command {
      Command::SelectionFields => {
        let args: SelectionFieldsArgs = parse_args(command, args)?;
        self.selection_fields(doc, &args.mode, args.jump_forward, args.only_other)?;
        CommandOutput::Done
      },
      Command::MultiFindAll => {
        let options: FindAllOptions = parse_args(command, args)?;
        self.multi_find_all(doc, options)?;
        CommandOutput::Done
      },
      Command::MultiFindMenu => {
        let args: MultiFindMenuArgs = parse_args(command, args)?;
        self.multi_find_menu(doc, args.operation)?;
        CommandOutput::Done
      },
      Command::MultiFindRegex => {
        let args: MultiFindRegexArgs = parse_args(command, args)?;
        self
          .multi_find_regex(doc, args.subtractive, args.expression.as_deref(), args.case)?
          .into()
      },
      Command::SplitSelection => {
        let args: SplitSelectionArgs = parse_args(command, args)?;
        self.split_selection(doc, args.separator.as_deref())?.into()
      },
      Command::PreserveCase => {
        let args: PreserveCaseArgs = parse_args(command, args)?;
        let selections = args
          .selections
          .map(|list| list.into_iter().map(Region::from).collect());
        self
          .preserve_case(doc, args.new_string.as_deref(), selections)?
          .into()
      },
      Command::StripSelection => {
        self.strip_selection(doc);
        CommandOutput::Done
      },
      Command::RemoveEmptyRegions => {
        let args: RemoveEmptyRegionsArgs = parse_args(command, args)?;
        self.remove_empty_regions(doc, args.restore_if_all_empty);
        CommandOutput::Done
      },
      Command::NormalizeRegionEnds => {
        self.normalize_region_ends(doc);
        CommandOutput::Done
      },
      Command::JumpToLastRegion => {
        let args: JumpToLastRegionArgs = parse_args(command, args)?;
        self.jump_to_last_region(doc, args.clear_selection);
        CommandOutput::Done
      },
      Command::AddLastSelection => {
        self.add_last_selection(doc);
        CommandOutput::Done
      },
      Command::CycleThroughRegions => {
        self.cycle_through_regions(doc);
        CommandOutput::Done
      },
      Command::JumpTo => {
        let args: JumpToArgs = parse_args(command, args)?;
        self.jump_to(doc, &args.text, args.options())?;
        CommandOutput::Done
      },
      Command::JumpToInteractive => {
        let args: JumpToArgs = parse_args(command, args)?;
        CommandOutput::Prompt(self.jump_to_interactive(&args.text, args.options()))
      },
      Command::StashRegionSelections => CommandOutput::StashKey(self.stash_region_selections(doc)),
      Command::PopRegionSelections => {
        let args: PopRegionSelectionsArgs = parse_args(command, args)?;
        match args.index {
          StashIndex::Index(-1) => {},
          StashIndex::Index(index) => return Err(CommandError::UnknownStash(index.to_string())),
          StashIndex::Key(key) => self.pop_region_selections(doc, &key)?,
        }
        CommandOutput::Done
      },
      Command::StashItems => CommandOutput::StashItems(self.stash_items(doc)),
      Command::ClearStashedSelections => {
        self.clear_stashed_selections(doc);
        CommandOutput::Done
      },
      Command::SplitSelectionIntoLines => {
        self.split_selection_into_lines(doc);
        CommandOutput::Done
      },
    };
    Ok(output)
  }
}
