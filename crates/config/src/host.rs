//! Services the surrounding editor provides to the configuration core.

/// Narrow interface to the host editor's side-effectful services.
///
/// All methods are synchronous from the caller's perspective. The reload
/// prompt in particular is fire-and-forget: the host shows the message and,
/// only if the user picks the action, performs a full environment reload on
/// its own time. By then this subsystem's state is already fully updated, so
/// dismissing the prompt needs no follow-up.
pub trait EditorHost {
	/// Removes any highlight decorations currently on screen.
	fn clear_highlights(&mut self);

	/// Re-reads the lazily-loaded scope-definition set from the active theme.
	fn reload_scope_definitions(&mut self);

	/// Shows `message` with a single actionable choice labelled `action`;
	/// accepting it requests a full host environment reload.
	fn prompt_reload(&mut self, message: &str, action: &str);
}
