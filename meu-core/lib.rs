//! Text primitives shared by the `meu` crates: character classes, word bounds
//! and line bounds over a [`ropey::RopeSlice`].

pub mod chars;
pub mod line_ending;
