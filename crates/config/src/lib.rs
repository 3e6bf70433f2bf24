//! Live configuration for the Vesper editor extension.
//!
//! The host publishes its settings through a pull-based snapshot service; this
//! crate reads that snapshot into a typed record and keeps it current across
//! configuration-changed events. Three rules govern ingestion:
//!
//! - **Sticky values**: a key the source does not report leaves the prior
//!   field value untouched; it never resets to the built-in default.
//! - **Best effort**: a value of the wrong shape is treated as absent for
//!   that event and logged. Nothing here can fail the editor session.
//! - **Re-derive, don't diff**: when the highlighting switch is present in a
//!   change event, both externally-loaded highlighting resources are rebuilt
//!   from the latest override values, changed or not.
//!
//! The one transition that needs more than a field write is the enhanced
//! typing switch, which only takes effect after a full host reload: flipping
//! it surfaces a one-shot reload prompt via [`EditorHost`].

pub mod host;
pub mod settings;
pub mod source;
pub mod store;

pub use host::EditorHost;
pub use settings::{Settings, WatchOptions, WatchStartup, WatchTrace};
pub use source::{ConfigSource, MemorySource};
pub use store::ConfigStore;
