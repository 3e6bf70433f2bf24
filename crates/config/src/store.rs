//! The live configuration store and its refresh cycle.

use vesper_highlight::ScopeMappings;

use crate::host::EditorHost;
use crate::settings::{Settings, keys};
use crate::source::ConfigSource;

/// Environment variable that pins the language server binary during
/// development, overriding both the default and the `serverPath` option.
pub const SERVER_DEBUG_ENV: &str = "VESPER_LS_DEBUG";

const ENHANCED_TYPING_RELOAD_MESSAGE: &str =
	"Changing the enhanced typing setting requires a reload";
const RELOAD_ACTION: &str = "Reload now";

/// Single source of truth for all recognized options.
///
/// Created once per extension session and refreshed in place on every
/// configuration-changed event. Besides the [`Settings`] snapshot it tracks
/// the last enhanced-typing value it acted on, so the reload prompt fires at
/// most once per actual transition.
#[derive(Debug)]
pub struct ConfigStore {
	settings: Settings,
	prev_enhanced_typing: bool,
	server_override: Option<String>,
}

impl ConfigStore {
	/// Reads the initial snapshot from `source`.
	///
	/// Captures [`SERVER_DEBUG_ENV`] once; when set, it wins over any
	/// `serverPath` the source reports, now and on every later refresh. The
	/// enhanced-typing tracker is seeded with the loaded value, so the first
	/// load never prompts.
	pub fn new(source: &impl ConfigSource) -> Self {
		Self::with_server_override(source, std::env::var(SERVER_DEBUG_ENV).ok())
	}

	/// [`ConfigStore::new`] with the environment override supplied
	/// explicitly.
	pub fn with_server_override(
		source: &impl ConfigSource,
		server_override: Option<String>,
	) -> Self {
		let mut settings = Settings::default().updated_from(source);
		if let Some(path) = &server_override {
			settings.server_path = path.clone();
		}
		let prev_enhanced_typing = settings.enable_enhanced_typing;
		Self { settings, prev_enhanced_typing, server_override }
	}

	/// The current snapshot.
	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	/// Handles one configuration-changed event.
	///
	/// Always clears on-screen highlights first as a safety reset, then
	/// re-applies the full snapshot (sticky per key). A change of the
	/// enhanced-typing value surfaces the one-shot reload prompt. Finally,
	/// when the source reports `highlightingOn` at all (changed or not),
	/// both highlighting resources are rebuilt from the latest override
	/// values: the host's scope-definition set and the scope-mapping table
	/// behind `scopes`.
	pub fn refresh(
		&mut self,
		source: &impl ConfigSource,
		host: &mut impl EditorHost,
		scopes: &mut ScopeMappings,
	) {
		host.clear_highlights();

		self.settings = self.settings.updated_from(source);
		if let Some(path) = &self.server_override {
			self.settings.server_path = path.clone();
		}

		if self.settings.enable_enhanced_typing != self.prev_enhanced_typing {
			tracing::info!(
				domain = "config",
				enabled = self.settings.enable_enhanced_typing,
				"enhanced typing changed; prompting for reload",
			);
			host.prompt_reload(ENHANCED_TYPING_RELOAD_MESSAGE, RELOAD_ACTION);
			self.prev_enhanced_typing = self.settings.enable_enhanced_typing;
		}

		if source.has(keys::HIGHLIGHTING_ON) {
			host.reload_scope_definitions();
			*scopes = ScopeMappings::load(&scope_overrides(source));
			tracing::debug!(domain = "config", "highlighting resources reloaded");
		}
	}
}

fn scope_overrides(source: &impl ConfigSource) -> serde_json::Map<String, serde_json::Value> {
	source
		.get(keys::SCOPE_MAPPINGS)
		.and_then(|value| value.as_object().cloned())
		.unwrap_or_default()
}
