use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the model store and download orchestrator.
///
/// With the defaults the models root resolves to the platform app-support
/// directory; tests and embedders can pin explicit roots instead.
#[derive(Debug, Clone)]
pub struct ModelStoreConfig {
    /// Root directory for model bundles. `None` resolves the platform
    /// data directory.
    pub models_root: Option<PathBuf>,
    /// Root for transient per-model download caches. `None` derives it
    /// from the models root.
    pub cache_root: Option<PathBuf>,
    /// Sampling interval for filesystem-based progress estimation.
    pub poll_interval: Duration,
}

impl Default for ModelStoreConfig {
    fn default() -> Self {
        Self {
            models_root: None,
            cache_root: None,
            poll_interval: Duration::from_millis(500),
        }
    }
}
