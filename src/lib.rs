//! Model asset lifecycle core for the Murmur dictation app.
//!
//! Speech recognition runs against large on-disk model bundles that an
//! external inference engine materializes on first use. This crate owns
//! everything around that: discovering which bundles are present, driving
//! per-model download tasks, estimating progress from filesystem growth,
//! validating bundle layouts, and deleting bundles. Audio capture, hotkeys,
//! text delivery, and the engine itself live behind thin collaborator
//! traits and are provided by the host application.

mod config;
mod engine;
mod error;
mod models;
mod notify;

pub use config::ModelStoreConfig;
pub use engine::ModelEngine;
pub use error::{DownloadError, EngineError};
pub use models::{
    catalog, is_complete, locate_bundle, DownloadOrchestrator, DownloadState, ModelDescriptor,
    ModelRegistry, StorePaths,
};
pub use notify::{Notifier, NullNotifier};

use tracing::metadata::LevelFilter;

/// Install the global tracing subscriber. Honors `MURMUR_LOG` for the
/// level filter; defaults to `info`.
pub fn init_logging() {
    let filter = std::env::var("MURMUR_LOG")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(LevelFilter::INFO);

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_target(false)
        .compact()
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
