//! The typed option snapshot and its sticky partial-update function.

use serde::Deserialize;
use serde_json::Value;

use crate::source::ConfigSource;

/// Keys under which the host's snapshot service reports each option.
pub mod keys {
	pub const HIGHLIGHTING_ON: &str = "highlightingOn";
	pub const RAINBOW_HIGHLIGHTING_ON: &str = "rainbowHighlightingOn";
	pub const ENABLE_ENHANCED_TYPING: &str = "enableEnhancedTyping";
	pub const SERVER_PATH: &str = "serverPath";
	pub const LRU_CAPACITY: &str = "lruCapacity";
	pub const DISPLAY_INLAY_HINTS: &str = "displayInlayHints";
	pub const MAX_INLAY_HINT_LENGTH: &str = "maxInlayHintLength";
	pub const EXCLUDE_GLOBS: &str = "excludeGlobs";
	pub const USE_CLIENT_WATCHING: &str = "useClientWatching";
	pub const FEATURE_FLAGS: &str = "featureFlags";
	pub const WITH_SYSROOT: &str = "withSysroot";
	pub const WATCH_STARTUP_MODE: &str = "watch.startupMode";
	pub const WATCH_TRACE_LEVEL: &str = "watch.traceLevel";
	pub const WATCH_EXTRA_ARGUMENTS: &str = "watch.extraArguments";
	pub const WATCH_COMMAND: &str = "watch.command";
	pub const WATCH_IGNORE_PATTERNS: &str = "watch.ignorePatterns";
	pub const SCOPE_MAPPINGS: &str = "scopeMappings";
}

/// Server binary looked up on `$PATH` when neither the debug environment
/// override nor the `serverPath` option names one.
pub const DEFAULT_SERVER_PATH: &str = "vesper-ls";

/// When the file watcher starts relative to session startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchStartup {
	/// Prompt the user on first use.
	#[default]
	Ask,
	Enabled,
	Disabled,
}

/// Verbosity of the file watcher's own output channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchTrace {
	#[default]
	Off,
	Error,
	Verbose,
}

/// Nested sub-configuration for the auxiliary file-watch feature.
///
/// Populated from the five `watch.*` keys; each sub-key is independently
/// optional and independently sticky, the same as every top-level option.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WatchOptions {
	pub startup_mode: WatchStartup,
	pub trace_level: WatchTrace,
	pub extra_arguments: String,
	pub command: String,
	pub ignore_patterns: Vec<String>,
}

/// One full snapshot of every recognized option.
///
/// A `Settings` value is immutable once built; [`Settings::updated_from`]
/// produces the follow-up snapshot for a configuration-changed event. After
/// the first load every field always holds either its previous value or the
/// freshly read external one; absence in a later read skips the update
/// rather than resetting to a default (**sticky value** semantics).
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
	/// Master switch for semantic highlighting.
	pub highlighting_on: bool,
	/// Per-binding rainbow colorization of related identifiers.
	pub rainbow_highlighting_on: bool,
	/// Structural typing assists; flipping this requires a host reload.
	pub enable_enhanced_typing: bool,
	/// Language server binary to spawn.
	pub server_path: String,
	/// Capacity of the server's query cache, if capped.
	pub lru_capacity: Option<u64>,
	pub display_inlay_hints: bool,
	/// Truncation length for inlay hint labels, if capped.
	pub max_inlay_hint_length: Option<u64>,
	/// Glob patterns excluded from project discovery.
	pub exclude_globs: Vec<String>,
	/// Route file watching through the client instead of the server.
	pub use_client_watching: bool,
	/// Free-form experimental toggles forwarded to the server.
	pub feature_flags: serde_json::Map<String, Value>,
	/// Explicit sysroot opt-in/out; absent lets the server decide.
	pub with_sysroot: Option<bool>,
	/// File-watch sub-configuration.
	pub watch: WatchOptions,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			highlighting_on: true,
			rainbow_highlighting_on: false,
			enable_enhanced_typing: true,
			server_path: DEFAULT_SERVER_PATH.to_string(),
			lru_capacity: None,
			display_inlay_hints: true,
			max_inlay_hint_length: None,
			exclude_globs: Vec::new(),
			use_client_watching: false,
			feature_flags: serde_json::Map::new(),
			with_sysroot: None,
			watch: WatchOptions::default(),
		}
	}
}

impl Settings {
	/// Produces the snapshot that results from applying one
	/// configuration-changed event on top of `self`.
	///
	/// Every recognized option is read independently: a key the source
	/// reports is copied in, a key it does not report keeps its prior value.
	/// Values of the wrong shape are treated as absent for this event and
	/// logged; ingestion never fails.
	pub fn updated_from(&self, source: &impl ConfigSource) -> Self {
		let mut next = self.clone();
		if let Some(v) = read_bool(source, keys::HIGHLIGHTING_ON) {
			next.highlighting_on = v;
		}
		if let Some(v) = read_bool(source, keys::RAINBOW_HIGHLIGHTING_ON) {
			next.rainbow_highlighting_on = v;
		}
		if let Some(v) = read_bool(source, keys::ENABLE_ENHANCED_TYPING) {
			next.enable_enhanced_typing = v;
		}
		if let Some(v) = read_string(source, keys::SERVER_PATH) {
			next.server_path = v;
		}
		if let Some(v) = read_opt_u64(source, keys::LRU_CAPACITY) {
			next.lru_capacity = v;
		}
		if let Some(v) = read_bool(source, keys::DISPLAY_INLAY_HINTS) {
			next.display_inlay_hints = v;
		}
		if let Some(v) = read_opt_u64(source, keys::MAX_INLAY_HINT_LENGTH) {
			next.max_inlay_hint_length = v;
		}
		if let Some(v) = read_string_array(source, keys::EXCLUDE_GLOBS) {
			next.exclude_globs = v;
		}
		if let Some(v) = read_bool(source, keys::USE_CLIENT_WATCHING) {
			next.use_client_watching = v;
		}
		if let Some(v) = read_object(source, keys::FEATURE_FLAGS) {
			next.feature_flags = v;
		}
		if let Some(v) = read_opt_bool(source, keys::WITH_SYSROOT) {
			next.with_sysroot = v;
		}
		if let Some(v) = read_enum(source, keys::WATCH_STARTUP_MODE) {
			next.watch.startup_mode = v;
		}
		if let Some(v) = read_enum(source, keys::WATCH_TRACE_LEVEL) {
			next.watch.trace_level = v;
		}
		if let Some(v) = read_string(source, keys::WATCH_EXTRA_ARGUMENTS) {
			next.watch.extra_arguments = v;
		}
		if let Some(v) = read_string(source, keys::WATCH_COMMAND) {
			next.watch.command = v;
		}
		if let Some(v) = read_string_array(source, keys::WATCH_IGNORE_PATTERNS) {
			next.watch.ignore_patterns = v;
		}
		next
	}

	/// Reads a boolean out of `feature_flags`, or `None` when the flag is
	/// unset or not a boolean.
	pub fn feature_flag(&self, name: &str) -> Option<bool> {
		self.feature_flags.get(name).and_then(Value::as_bool)
	}
}

fn read_bool(source: &impl ConfigSource, key: &str) -> Option<bool> {
	match source.get(key)? {
		Value::Bool(v) => Some(v),
		Value::Null => None,
		other => skip_mismatch(key, &other, "bool"),
	}
}

fn read_string(source: &impl ConfigSource, key: &str) -> Option<String> {
	match source.get(key)? {
		Value::String(v) => Some(v),
		Value::Null => None,
		other => skip_mismatch(key, &other, "string"),
	}
}

// Optional ints distinguish an explicit null (clears the field) from an
// absent key (keeps the prior value).
fn read_opt_u64(source: &impl ConfigSource, key: &str) -> Option<Option<u64>> {
	match source.get(key)? {
		Value::Null => Some(None),
		Value::Number(n) => match n.as_u64() {
			Some(v) => Some(Some(v)),
			None => skip_mismatch(key, &Value::Number(n), "non-negative integer"),
		},
		other => skip_mismatch(key, &other, "non-negative integer"),
	}
}

fn read_opt_bool(source: &impl ConfigSource, key: &str) -> Option<Option<bool>> {
	match source.get(key)? {
		Value::Null => Some(None),
		Value::Bool(v) => Some(Some(v)),
		other => skip_mismatch(key, &other, "bool"),
	}
}

fn read_string_array(source: &impl ConfigSource, key: &str) -> Option<Vec<String>> {
	match source.get(key)? {
		Value::Array(items) => Some(
			items
				.into_iter()
				.filter_map(|item| match item {
					Value::String(s) => Some(s),
					_ => None,
				})
				.collect(),
		),
		Value::Null => None,
		other => skip_mismatch(key, &other, "array of strings"),
	}
}

fn read_object(source: &impl ConfigSource, key: &str) -> Option<serde_json::Map<String, Value>> {
	match source.get(key)? {
		Value::Object(map) => Some(map),
		Value::Null => None,
		other => skip_mismatch(key, &other, "object"),
	}
}

fn read_enum<T: serde::de::DeserializeOwned>(source: &impl ConfigSource, key: &str) -> Option<T> {
	let value = source.get(key)?;
	match serde_json::from_value(value.clone()) {
		Ok(v) => Some(v),
		Err(_) if value.is_null() => None,
		Err(_) => skip_mismatch(key, &value, "known variant name"),
	}
}

fn skip_mismatch<T>(key: &str, value: &Value, expected: &'static str) -> Option<T> {
	tracing::warn!(
		domain = "config",
		key,
		expected,
		found = json_type_name(value),
		"ignoring option with unexpected shape",
	);
	None
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

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::source::MemorySource;

	#[test]
	fn test_defaults() {
		let settings = Settings::default();

		assert!(settings.highlighting_on);
		assert!(!settings.rainbow_highlighting_on);
		assert!(settings.enable_enhanced_typing);
		assert_eq!(settings.server_path, DEFAULT_SERVER_PATH);
		assert_eq!(settings.lru_capacity, None);
		assert_eq!(settings.with_sysroot, None);
		assert_eq!(settings.watch.startup_mode, WatchStartup::Ask);
		assert_eq!(settings.watch.trace_level, WatchTrace::Off);
	}

	#[test]
	fn test_absent_keys_keep_prior_values() {
		let seeded = Settings::default().updated_from(
			&MemorySource::new()
				.with(keys::LRU_CAPACITY, json!(5))
				.with(keys::HIGHLIGHTING_ON, json!(false)),
		);
		assert_eq!(seeded.lru_capacity, Some(5));
		assert!(!seeded.highlighting_on);

		let after_empty_event = seeded.updated_from(&MemorySource::new());
		assert_eq!(after_empty_event.lru_capacity, Some(5));
		assert!(!after_empty_event.highlighting_on);
	}

	#[test]
	fn test_updated_from_leaves_receiver_untouched() {
		let before = Settings::default();
		let _ = before.updated_from(&MemorySource::new().with(keys::LRU_CAPACITY, json!(9)));

		assert_eq!(before, Settings::default());
	}

	#[test]
	fn test_explicit_null_clears_optional_int() {
		let seeded = Settings::default()
			.updated_from(&MemorySource::new().with(keys::LRU_CAPACITY, json!(128)));

		let cleared =
			seeded.updated_from(&MemorySource::new().with(keys::LRU_CAPACITY, Value::Null));

		assert_eq!(cleared.lru_capacity, None);
	}

	#[test]
	fn test_wrong_shape_is_treated_as_absent() {
		let settings = Settings::default().updated_from(
			&MemorySource::new()
				.with(keys::HIGHLIGHTING_ON, json!("yes"))
				.with(keys::LRU_CAPACITY, json!(-3))
				.with(keys::EXCLUDE_GLOBS, json!("target/**")),
		);

		assert!(settings.highlighting_on);
		assert_eq!(settings.lru_capacity, None);
		assert!(settings.exclude_globs.is_empty());
	}

	#[test]
	fn test_string_array_keeps_only_strings() {
		let settings = Settings::default().updated_from(
			&MemorySource::new().with(keys::EXCLUDE_GLOBS, json!(["target/**", 7, "out/**"])),
		);

		assert_eq!(settings.exclude_globs, ["target/**", "out/**"]);
	}

	#[test]
	fn test_watch_sub_keys_are_independently_sticky() {
		let seeded = Settings::default().updated_from(
			&MemorySource::new()
				.with(keys::WATCH_STARTUP_MODE, json!("enabled"))
				.with(keys::WATCH_COMMAND, json!("check")),
		);
		assert_eq!(seeded.watch.startup_mode, WatchStartup::Enabled);
		assert_eq!(seeded.watch.command, "check");

		let updated = seeded
			.updated_from(&MemorySource::new().with(keys::WATCH_TRACE_LEVEL, json!("verbose")));

		assert_eq!(updated.watch.startup_mode, WatchStartup::Enabled);
		assert_eq!(updated.watch.command, "check");
		assert_eq!(updated.watch.trace_level, WatchTrace::Verbose);
	}

	#[test]
	fn test_unknown_enum_variant_is_treated_as_absent() {
		let settings = Settings::default()
			.updated_from(&MemorySource::new().with(keys::WATCH_STARTUP_MODE, json!("maybe")));

		assert_eq!(settings.watch.startup_mode, WatchStartup::Ask);
	}

	#[test]
	fn test_feature_flag_lookup() {
		let settings = Settings::default().updated_from(
			&MemorySource::new()
				.with(keys::FEATURE_FLAGS, json!({ "completion.snippets": true, "notes": "x" })),
		);

		assert_eq!(settings.feature_flag("completion.snippets"), Some(true));
		assert_eq!(settings.feature_flag("notes"), None);
		assert_eq!(settings.feature_flag("unset"), None);
	}
}
