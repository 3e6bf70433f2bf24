//! The pull-based configuration snapshot service.

use std::collections::BTreeMap;

use serde_json::Value;

/// Read-only access to the host's configuration snapshot, queried by key.
///
/// Every key is independently optional from the source's perspective. Hosts
/// that register defaults for their keys will report essentially every key as
/// present on every event; the ingestion code is written for that case and
/// simply re-applies values rather than diffing.
pub trait ConfigSource {
	/// Returns the current value for `key`, or `None` when the source does
	/// not report the key at all.
	fn get(&self, key: &str) -> Option<Value>;

	/// Returns whether the source reports `key` as present. This includes
	/// keys that merely carry a registered default.
	fn has(&self, key: &str) -> bool {
		self.get(key).is_some()
	}
}

/// Map-backed [`ConfigSource`] for embedding hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
	values: BTreeMap<String, Value>,
}

impl MemorySource {
	/// Creates an empty source that reports no keys.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets `key` to `value`, making it present.
	pub fn set(&mut self, key: impl Into<String>, value: Value) {
		self.values.insert(key.into(), value);
	}

	/// Builder form of [`MemorySource::set`].
	pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
		self.set(key, value);
		self
	}

	/// Removes `key`, making it absent again.
	pub fn remove(&mut self, key: &str) {
		self.values.remove(key);
	}
}

impl ConfigSource for MemorySource {
	fn get(&self, key: &str) -> Option<Value> {
		self.values.get(key).cloned()
	}

	fn has(&self, key: &str) -> bool {
		self.values.contains_key(key)
	}
}
