//! Semantic highlighting scope resolution for Vesper.
//!
//! The highlighter works in terms of abstract semantic categories
//! (`"keyword"`, `"lifetime"`, `"variable.mut"`, ...) that are independent of
//! any concrete theme. This crate owns the mapping from a category to its
//! **fallback chain**: an ordered list of concrete rule-scope identifiers
//! tried in priority order until one resolves to an actual highlighting rule.
//!
//! A built-in table covers every category the highlighter emits. Users may
//! override individual categories with either a single scope name or an array
//! of scope names; anything else is dropped and the built-in entry kept, so a
//! bad override can degrade highlighting but never break it.

pub mod scopes;

pub use scopes::{OverrideRejection, ScopeMappings};
