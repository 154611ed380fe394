//! User configuration.
//!
//! Read from TOML with kebab-case keys. Every key is optional and unknown
//! keys are rejected:
//!
//! ```toml
//! [selection-fields]
//! add-separated = true
//! fields-scope = "comment"
//!
//! [find.regex]
//! additive-scope = "region.greenish"
//!
//! [live-split]
//! enabled = true
//!
//! [history]
//! limit = 256
//! ```

use std::{
  fs,
  io::Error as IOError,
  path::Path,
};

use serde::{
  Deserialize,
  Serialize,
};
use thiserror::Error;
use toml::de::Error as TomlError;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to parse config: {0}")]
  BadConfig(#[from] TomlError),
  #[error("failed to read config: {0}")]
  Io(#[from] IOError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
  pub selection_fields: SelectionFieldsConfig,
  pub find:             FindConfig,
  pub live_split:       LiveSplitConfig,
  pub history:          HistoryConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct SelectionFieldsConfig {
  /// Keep added fields in their own list instead of merging them into the
  /// stored fields.
  pub add_separated:      bool,
  pub tab_enabled:        bool,
  pub escape_enabled:     bool,
  pub fields_scope:       String,
  pub added_fields_scope: String,
}

impl Default for SelectionFieldsConfig {
  fn default() -> Self {
    Self {
      add_separated:      true,
      tab_enabled:        false,
      escape_enabled:     false,
      fields_scope:       "comment".to_string(),
      added_fields_scope: "comment".to_string(),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct FindConfig {
  pub regex: RegexFindConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct RegexFindConfig {
  pub additive_scope:    String,
  pub subtractive_scope: String,
}

impl Default for RegexFindConfig {
  fn default() -> Self {
    Self {
      additive_scope:    "region.greenish".to_string(),
      subtractive_scope: "region.redish".to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct LiveSplitConfig {
  pub enabled: bool,
  pub scope:   String,
}

impl Default for LiveSplitConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      scope:   "region.cyanish".to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct HistoryConfig {
  /// Maximum number of selection snapshots kept per document.
  pub limit: usize,
}

impl Default for HistoryConfig {
  fn default() -> Self {
    Self { limit: 256 }
  }
}

impl Config {
  pub fn from_toml_str(source: &str) -> Result<Self> {
    Ok(toml::from_str(source)?)
  }

  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let source = fs::read_to_string(path)?;
    Self::from_toml_str(&source)
  }
}
