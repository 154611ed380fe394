use smartstring::{LazyCompact, SmartString};

pub mod command;
pub mod config;
pub mod document;
pub mod editor;
pub mod fields;
pub mod find;
pub mod jump_to;
pub mod messages;
pub mod movement;
pub mod preserve_case;
pub mod prompt;
pub mod region;
pub mod region_set;
pub mod scope;
pub mod search;
pub mod selection;
pub mod selection_history;
pub mod split;
pub mod stash;
pub mod state;
pub mod transform;

pub type Tendril = SmartString<LazyCompact>;
