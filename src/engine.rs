use std::path::Path;

use async_trait::async_trait;

use crate::error::EngineError;

/// The external inference engine's model-acquisition entry point.
///
/// The engine is opaque: it is handed its own identifier for the model and
/// the destination root, and its only observable side effect is the files
/// it writes under that root (in its nested `models/<vendor>/<repo>/<id>/`
/// layout). It provides no progress callback; callers that want progress
/// watch the filesystem instead.
///
/// Acquisition may take seconds to tens of minutes. Implementations should
/// observe task cancellation promptly, but the orchestrator does not rely
/// on it: a cancelled download is abandoned regardless of whether the
/// underlying call has unwound.
#[async_trait]
pub trait ModelEngine: Send + Sync {
    /// Fetch the bundle for `engine_id` into `dest_root`.
    ///
    /// `use_background_session` opts into OS-level background transfer
    /// sessions; the orchestrator always passes `false` so downloads stay
    /// bound to the process lifetime.
    async fn fetch_model(
        &self,
        engine_id: &str,
        dest_root: &Path,
        use_background_session: bool,
    ) -> Result<(), EngineError>;
}
