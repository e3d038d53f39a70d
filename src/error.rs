use std::path::PathBuf;

use thiserror::Error;

/// Error reported by the external inference engine when model acquisition
/// fails. The engine is a black box; all we get is its message.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct EngineError {
    pub message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Terminal outcome of a download attempt that did not succeed.
///
/// `Cancelled` is deliberately its own variant: user cancellation aborts
/// the same awaited call as a failure does, but must never surface as one.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("failed to create models directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Engine(#[from] EngineError),

    #[error("download cancelled")]
    Cancelled,

    /// The engine reported success but the bundle on disk still fails
    /// completeness validation.
    #[error("post-download validation mismatch: bundle for {model_id} is incomplete")]
    ValidationMismatch { model_id: String },
}
