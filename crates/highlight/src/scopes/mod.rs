//! The effective category → rule-scope mapping table.
//!
//! [`ScopeMappings`] is a plain value owned by the host. [`ScopeMappings::load`]
//! builds a fresh table from the built-in defaults plus the user's validated
//! overrides and returns it; nothing in this module touches shared state, so
//! successive reload cycles cannot leak overrides into each other.

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;


/// Built-in fallback chains, one entry per semantic category the highlighter
/// emits. Order within a chain is priority order.
const BUILTIN_MAPPINGS: &[(&str, &[&str])] = &[
	(
		"comment",
		&["comment", "comment.block", "comment.line", "comment.block.documentation"],
	),
	("string", &["string"]),
	("keyword", &["keyword"]),
	("keyword.control", &["keyword.control", "keyword", "keyword.other"]),
	(
		"keyword.unsafe",
		&["storage.modifier", "keyword.other", "keyword.control", "keyword"],
	),
	("function", &["entity.name.function"]),
	("parameter", &["variable.parameter"]),
	("constant", &["constant", "variable"]),
	("type", &["entity.name.type"]),
	("type.param", &["storage.type.generic", "support.type"]),
	("builtin", &["variable.language", "support.type"]),
	("text", &["string", "string.quoted", "string.regexp"]),
	("attribute", &["meta.attribute", "keyword"]),
	("literal", &["string", "string.quoted", "string.regexp"]),
	(
		"lifetime",
		&["entity.name.lifetime.rust", "storage.modifier.lifetime.rust", "support.type"],
	),
	("macro", &["support.macro.rust", "support.other"]),
	("variable", &["variable"]),
	("variable.mut", &["variable.mut.rust", "variable", "storage.modifier"]),
	(
		"field",
		&[
			"variable.object.property",
			"meta.field.declaration",
			"meta.definition.property",
			"variable.other",
		],
	),
	("module", &["entity.name.section", "entity.other"]),
];

/// Reason an override entry was dropped during [`ScopeMappings::load`].
///
/// Rejections are never fatal; they are recorded on the table (and logged) so
/// tooling and tests can see what was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OverrideRejection {
	/// The value is neither a string nor an array.
	#[error("expected a scope name or an array of scope names, found {found}")]
	UnsupportedShape {
		/// JSON type name of the offending value.
		found: &'static str,
	},
	/// The value is an array with at least one non-string element.
	#[error("array element {index} is not a string")]
	NonStringElement {
		/// Index of the first offending element.
		index: usize,
	},
}

/// The effective mapping from semantic category to fallback chain.
///
/// Always contains every built-in category; user overrides can replace a
/// chain or introduce new categories, but the table never shrinks below the
/// built-in set.
#[derive(Debug, Clone)]
pub struct ScopeMappings {
	table: HashMap<String, Vec<String>>,
	rejected: Vec<(String, OverrideRejection)>,
}

impl Default for ScopeMappings {
	fn default() -> Self {
		Self::builtin()
	}
}

impl ScopeMappings {
	/// Creates the built-in table with no overrides applied.
	pub fn builtin() -> Self {
		let table = BUILTIN_MAPPINGS
			.iter()
			.map(|(category, chain)| {
				(category.to_string(), chain.iter().map(|s| s.to_string()).collect())
			})
			.collect();
		Self { table, rejected: Vec::new() }
	}

	/// Builds a new effective table from the raw user override record.
	///
	/// Each entry must be a single scope name (promoted to a one-element
	/// chain) or an array of scope names. Entries of any other shape are
	/// dropped: the built-in chain for that category is kept and the
	/// rejection is recorded on the returned table.
	///
	/// Every call starts from a fresh copy of the built-in defaults, so an
	/// override removed from the source reverts its category on the next
	/// reload.
	pub fn load(overrides: &serde_json::Map<String, Value>) -> Self {
		let mut mappings = Self::builtin();
		for (category, value) in overrides {
			match parse_chain(value) {
				Ok(chain) => {
					mappings.table.insert(category.clone(), chain);
				}
				Err(rejection) => {
					tracing::warn!(
						domain = "scopes",
						category = %category,
						reason = %rejection,
						"ignoring scope mapping override",
					);
					mappings.rejected.push((category.clone(), rejection));
				}
			}
		}
		mappings
	}

	/// Returns the fallback chain for `category`, or an empty slice if the
	/// category is unknown.
	pub fn find(&self, category: &str) -> &[String] {
		self.table.get(category).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Resolves `category` to a rule by trying each scope in its fallback
	/// chain, in priority order, until `try_resolve` produces one.
	///
	/// Short-circuits on the first hit; returns `None` when every candidate
	/// fails or the category is unknown.
	pub fn resolve_rule<R>(
		&self,
		category: &str,
		mut try_resolve: impl FnMut(&str) -> Option<R>,
	) -> Option<R> {
		self.find(category).iter().find_map(|scope| try_resolve(scope))
	}

	/// Override entries dropped by the last [`ScopeMappings::load`], with the
	/// reason each was dropped.
	pub fn rejected(&self) -> &[(String, OverrideRejection)] {
		&self.rejected
	}
}

fn parse_chain(value: &Value) -> Result<Vec<String>, OverrideRejection> {
	match value {
		Value::String(scope) => Ok(vec![scope.clone()]),
		Value::Array(items) => items
			.iter()
			.enumerate()
			.map(|(index, item)| match item {
				Value::String(scope) => Ok(scope.clone()),
				_ => Err(OverrideRejection::NonStringElement { index }),
			})
			.collect(),
		_ => Err(OverrideRejection::UnsupportedShape { found: json_type_name(value) }),
	}
}

fn json_type_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "bool",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}
