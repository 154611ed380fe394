//! Case-preserving replacement.
//!
//! Both the old and the new text are cut into groups, either at the most
//! frequent of `-_/. ` or, when none occurs, where the case changes
//! (`fooBar` → `foo`, `Bar`). Each new group takes the case of the old group
//! at the same index; surplus new groups repeat the last old case. Groups of
//! mixed case keep the new text as typed.
//!
//! ```ignore
//! use meu_lib::preserve_case::replace_with_case;
//!
//! assert_eq!(replace_with_case("Old_Name", "new name"), "New_Name");
//! assert_eq!(replace_with_case("oldName", "new-value"), "newValue");
//! ```

use tracing::debug;

use crate::{
  Tendril,
  command::Result,
  document::{
    Document,
    DocumentError,
  },
  editor::MultiEdit,
  messages::MessageCenter,
  prompt::{
    InputPanel,
    PromptHandler,
  },
  region::Region,
  region_set,
};

pub const SEPARATORS: [char; 5] = ['-', '_', '/', '.', ' '];
pub const PROMPT_TITLE: &str = "New string for preserving case";

const SOURCE: &str = "preserve_case";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
  Lower,
  Upper,
  /// Upper case first char, no other upper case char.
  Capitalized,
  Mixed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
  /// Empty when the groups were split by case.
  pub separator: Tendril,
  pub groups:    Vec<String>,
  pub cases:     Vec<Case>,
}

pub fn analyze(text: &str) -> Analysis {
  let counts = SEPARATORS.map(|sep| text.chars().filter(|&c| c == sep).count());
  let max = counts.iter().copied().max().unwrap_or(0);

  let (separator, groups) = match SEPARATORS.iter().zip(counts).find(|&(_, count)| count == max) {
    Some((&sep, _)) if max > 0 => (Tendril::from(sep.to_string()), text.split(sep).map(String::from).collect()),
    _ => (Tendril::new(), split_by_case(text)),
  };
  let cases = groups.iter().map(|group: &String| case_of(group)).collect();

  Analysis {
    separator,
    groups,
    cases,
  }
}

/// Splits between every pair of chars `c1 c2` (not at the very start) where
/// `c1` is not upper case and `c2` not lower case, or `c1` is not lower case
/// and `c2` not upper case. Pairs do not overlap.
pub fn split_by_case(text: &str) -> Vec<String> {
  let chars: Vec<char> = text.chars().collect();
  let mut groups = Vec::new();
  let mut start = 0;
  let mut i = 1;

  while i + 1 < chars.len() {
    let (c1, c2) = (chars[i], chars[i + 1]);
    let boundary = (!c1.is_ascii_uppercase() && !c2.is_ascii_lowercase())
      || (!c1.is_ascii_lowercase() && !c2.is_ascii_uppercase());
    if boundary {
      groups.push(chars[start..=i].iter().collect());
      start = i + 1;
      i += 2;
    } else {
      i += 1;
    }
  }
  groups.push(chars[start..].iter().collect());
  groups
}

pub fn case_of(group: &str) -> Case {
  if !group.chars().any(|c| c.is_ascii_uppercase()) {
    Case::Lower
  } else if !group.chars().any(|c| c.is_ascii_lowercase()) {
    Case::Upper
  } else {
    let mut chars = group.chars();
    let first_upper = chars.next().is_some_and(|c| c.is_ascii_uppercase());
    if first_upper && !chars.any(|c| c.is_ascii_uppercase()) {
      Case::Capitalized
    } else {
      Case::Mixed
    }
  }
}

pub fn to_upper_case_with(text: impl Iterator<Item = char>, buf: &mut Tendril) {
  text.for_each(|c| buf.extend(c.to_uppercase()));
}

pub fn to_lower_case_with(text: impl Iterator<Item = char>, buf: &mut Tendril) {
  text.for_each(|c| buf.extend(c.to_lowercase()));
}

/// First char upper case, the rest lower case.
pub fn to_capitalized_with(text: impl Iterator<Item = char>, buf: &mut Tendril) {
  text.fold(true, |first, c| {
    if first {
      buf.extend(c.to_uppercase());
    } else {
      buf.extend(c.to_lowercase());
    }
    false
  });
}

fn apply_case(group: &str, case: Case, buf: &mut Tendril) {
  match case {
    Case::Lower => to_lower_case_with(group.chars(), buf),
    Case::Upper => to_upper_case_with(group.chars(), buf),
    Case::Capitalized => to_capitalized_with(group.chars(), buf),
    Case::Mixed => buf.push_str(group),
  }
}

/// Re-cases the groups of `new_groups` after the groups of `old`, joined with
/// the separator of `old`.
pub fn recase(old: &str, new_groups: &[String]) -> Tendril {
  let old = analyze(old);
  let mut result = Tendril::new();

  for (index, group) in new_groups.iter().enumerate() {
    if index > 0 {
      result.push_str(&old.separator);
    }
    let case = old.cases[index.min(old.cases.len() - 1)];
    apply_case(group, case, &mut result);
  }

  result
}

pub fn replace_with_case(old: &str, new: &str) -> Tendril {
  recase(old, &analyze(new).groups)
}

/// Fails with [`DocumentError::OutOfBounds`] when a region reaches past the
/// end of `doc`.
fn check_bounds(doc: &Document, regions: &[Region]) -> Result<()> {
  let len = doc.len_chars();
  match regions.iter().find(|region| region.end() > len) {
    Some(&region) => Err(DocumentError::OutOfBounds { region, len }.into()),
    None => Ok(()),
  }
}

/// Replaces the text of every region with `new`, preserving case. Nothing is
/// written unless every region fits in `doc`.
pub fn preserve_case(doc: &mut Document, regions: &[Region], new: &str) -> Result<()> {
  check_bounds(doc, regions)?;

  let new_groups = analyze(new).groups;
  let mut offset: isize = 0;
  let edits: Vec<(Region, Tendril)> = region_set::sort_by_position(regions.to_vec())
    .into_iter()
    .map(|region| {
      let old = doc.substr(region);
      let replacement = recase(&old, &new_groups);
      let shift = |pos: usize| pos.saturating_add_signed(offset);
      let shifted = Region::new(shift(region.begin()), shift(region.end()));
      offset += replacement.chars().count() as isize - old.chars().count() as isize;
      (shifted, replacement)
    })
    .collect();

  for (region, replacement) in edits {
    doc.replace(region, &replacement)?;
  }

  debug!(regions = regions.len(), "preserve case");
  Ok(())
}

/// Runs [`preserve_case`] with `new` or, without it, opens a prompt
/// pre-filled with the text of the first region.
pub fn preserve_case_command(
  doc: &mut Document,
  messages: &mut MessageCenter,
  new: Option<&str>,
  selections: Option<Vec<Region>>,
) -> Result<Option<InputPanel>> {
  let saved = selections.unwrap_or_else(|| doc.selection().to_vec());
  check_bounds(doc, &saved)?;

  if saved.iter().map(Region::len).sum::<usize>() == 0 {
    messages.info(Some(SOURCE.into()), "Cannot run preserve case on an empty selection.");
    return Ok(None);
  }

  match new {
    Some(new) => {
      preserve_case(doc, &saved, new)?;
      Ok(None)
    },
    None => {
      let initial = saved.first().map(|&region| doc.substr(region)).unwrap_or_default();
      Ok(Some(InputPanel::new(
        PROMPT_TITLE,
        initial,
        Box::new(PreserveCasePrompt { saved }),
      )))
    },
  }
}

#[derive(Debug)]
pub struct PreserveCasePrompt {
  saved: Vec<Region>,
}

impl PromptHandler for PreserveCasePrompt {
  fn on_change(&mut self, _editor: &mut MultiEdit, _doc: &mut Document, _text: &str) {}

  fn on_confirm(self: Box<Self>, editor: &mut MultiEdit, doc: &mut Document, text: &str) -> Result<()> {
    editor
      .preserve_case(doc, Some(text), Some(self.saved))
      .map(|_| ())
  }

  fn on_cancel(self: Box<Self>, _editor: &mut MultiEdit, _doc: &mut Document) {}
}
