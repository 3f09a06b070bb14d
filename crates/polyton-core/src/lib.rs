//! Polytonic Greek transliteration: a fixed key table and the incremental
//! longest-match engine that applies it to a keystroke stream.

pub mod matcher;
pub mod settings;
pub mod table;

pub use matcher::{translate, Matcher, OutputEvent};
pub use table::{KeySymbol, Rule, RuleTable, RuleTableError, TrieLookupResult};
