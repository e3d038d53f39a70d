use std::collections::HashMap;
use std::fs;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::ModelStoreConfig;
use crate::engine::ModelEngine;
use crate::error::DownloadError;
use crate::notify::Notifier;

use super::catalog;
use super::paths::StorePaths;
use super::progress;
use super::registry::{DownloadState, ModelRegistry};
use super::validate;

/// Identifies one download attempt. A finalize whose lease no longer
/// matches the active entry belongs to a cancelled or replaced attempt
/// and must not touch the registry.
type Lease = u64;

struct ActiveDownload {
    lease: Lease,
    cancel: CancellationToken,
    sampler: JoinHandle<()>,
}

/// Owns one cancellable asynchronous download task per model identifier.
///
/// All registry mutations originate here or in tasks spawned here, so
/// state transitions per model are strictly sequential: a second start
/// while one is active is a no-op, and starting a fresh attempt always
/// tears down the prior task and sampler first. Downloads for distinct
/// models are fully independent.
pub struct DownloadOrchestrator {
    registry: Arc<ModelRegistry>,
    paths: StorePaths,
    engine: Arc<dyn ModelEngine>,
    notifier: Arc<dyn Notifier>,
    poll_interval: Duration,
    active: Mutex<HashMap<String, ActiveDownload>>,
    lease_counter: AtomicU64,
}

impl DownloadOrchestrator {
    pub fn new(
        engine: Arc<dyn ModelEngine>,
        notifier: Arc<dyn Notifier>,
        config: &ModelStoreConfig,
    ) -> Result<Self> {
        let paths = StorePaths::resolve(config)?;
        Ok(Self::with_paths(engine, notifier, paths, config.poll_interval))
    }

    pub fn with_paths(
        engine: Arc<dyn ModelEngine>,
        notifier: Arc<dyn Notifier>,
        paths: StorePaths,
        poll_interval: Duration,
    ) -> Self {
        Self {
            registry: Arc::new(ModelRegistry::new()),
            paths,
            engine,
            notifier,
            poll_interval,
            active: Mutex::new(HashMap::new()),
            lease_counter: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn registry(&self) -> Arc<ModelRegistry> {
        Arc::clone(&self.registry)
    }

    #[must_use]
    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    /// On-demand disk check, bypassing the registry's cached state.
    #[must_use]
    pub fn is_downloaded(&self, model_id: &str) -> bool {
        validate::locate_bundle(&self.paths, model_id).is_some()
    }

    /// Begin downloading `model_id`. No-op while an attempt for the same
    /// identifier is already in flight.
    pub fn start_download(self: &Arc<Self>, model_id: &str) {
        let Some(descriptor) = catalog::descriptor(model_id) else {
            warn!(model = model_id, "download requested for unknown model");
            self.registry.set_state(
                model_id,
                DownloadState::Failed(format!("unknown model identifier {model_id:?}")),
            );
            return;
        };

        let lease;
        let cancel = CancellationToken::new();
        {
            let mut active = self.active.lock();
            if active.contains_key(model_id) {
                debug!(model = model_id, "download already in progress");
                return;
            }

            lease = self.lease_counter.fetch_add(1, Ordering::Relaxed);
            self.registry
                .set_state(model_id, DownloadState::Downloading { progress: 0.0 });

            let sampler = progress::spawn_sampler(
                Arc::clone(&self.registry),
                self.paths.clone(),
                model_id.to_string(),
                descriptor.download_size_bytes,
                self.poll_interval,
                cancel.clone(),
            );
            active.insert(
                model_id.to_string(),
                ActiveDownload {
                    lease,
                    cancel: cancel.clone(),
                    sampler,
                },
            );
        }

        info!(model = model_id, engine = descriptor.engine_id, "download started");

        let this = Arc::clone(self);
        let id = model_id.to_string();
        let engine_id = descriptor.engine_id;
        tokio::spawn(async move {
            let result = this.execute(&id, engine_id, &cancel).await;
            this.finish(&id, lease, result);
        });
    }

    /// Cancel any in-flight download for `model_id`. Idempotent; state
    /// returns to idle immediately, without waiting for the engine call
    /// to unwind. A completed bundle on disk is left completed.
    pub fn cancel_download(&self, model_id: &str) {
        let job = self.active.lock().remove(model_id);
        if let Some(job) = job {
            job.cancel.cancel();
            job.sampler.abort();
            info!(model = model_id, "download cancelled");
        }

        if self.registry.state(model_id) != DownloadState::Completed {
            self.registry.set_state(model_id, DownloadState::Idle);
        }
    }

    /// Remove the model's bundle from both known locations plus its
    /// download cache. Callers must cancel an active download first;
    /// deletion is refused, not auto-cancelled, while one is running.
    pub fn delete_model(&self, model_id: &str) -> Result<()> {
        if self.active.lock().contains_key(model_id) {
            bail!("model {model_id} is downloading; cancel before deleting");
        }

        let mut outcome = Ok(());
        let targets = [
            self.paths.nested_dir(model_id),
            self.paths.flat_dir(model_id),
            self.paths.cache_dir(model_id),
        ];
        for dir in targets {
            if !dir.exists() {
                continue;
            }
            let removed = fs::remove_dir_all(&dir)
                .with_context(|| format!("remove model directory {}", dir.display()));
            match removed {
                Ok(()) => info!(model = model_id, path = %dir.display(), "removed model data"),
                Err(error) => {
                    if outcome.is_ok() {
                        outcome = Err(error);
                    }
                }
            }
        }

        // Cleared even on partial failure; the next disk refresh
        // re-derives whatever actually remains.
        self.registry.set_state(model_id, DownloadState::Idle);
        outcome
    }

    /// Acknowledge a failed attempt, returning the entry to idle so the
    /// UI stops surfacing the failure.
    pub fn clear_failed(&self, model_id: &str) {
        self.registry.clear_failed(model_id);
    }

    async fn execute(
        &self,
        model_id: &str,
        engine_id: &str,
        cancel: &CancellationToken,
    ) -> Result<(), DownloadError> {
        if cancel.is_cancelled() {
            return Err(DownloadError::Cancelled);
        }

        let root = self.paths.models_root().to_path_buf();
        fs::create_dir_all(&root).map_err(|source| DownloadError::CreateDir {
            path: root.clone(),
            source,
        })?;

        self.purge_stale(model_id);

        tokio::select! {
            biased;

            () = cancel.cancelled() => Err(DownloadError::Cancelled),

            fetched = self.engine.fetch_model(engine_id, &root, false) => {
                fetched?;
                if validate::locate_bundle(&self.paths, model_id).is_some() {
                    Ok(())
                } else {
                    Err(DownloadError::ValidationMismatch {
                        model_id: model_id.to_string(),
                    })
                }
            }
        }
    }

    fn finish(&self, model_id: &str, lease: Lease, result: Result<(), DownloadError>) {
        let owned = {
            let mut active = self.active.lock();
            match active.get(model_id) {
                Some(job) if job.lease == lease => active.remove(model_id),
                _ => None,
            }
        };
        let Some(job) = owned else {
            debug!(model = model_id, "ignoring stale download finalize");
            return;
        };
        job.cancel.cancel();

        match result {
            Ok(()) => {
                self.registry.set_state(model_id, DownloadState::Completed);
                self.registry.refresh_from_disk(&self.paths);
                info!(model = model_id, "download completed");
                self.notifier.download_completed(model_id);
            }
            Err(DownloadError::Cancelled) => {
                // Not an error; no notification.
                self.registry.set_state(model_id, DownloadState::Idle);
            }
            Err(error) => {
                let reason = error.to_string();
                warn!(model = model_id, reason, "download failed");
                self.registry
                    .set_state(model_id, DownloadState::Failed(reason.clone()));
                self.notifier.download_failed(&reason);
            }
        }
    }

    /// Remove a stale partial bundle and this model's download cache
    /// before re-downloading. Complete bundles are never touched, and
    /// nothing outside this identifier's subtrees is. Best-effort: the
    /// engine resumes over whatever could not be removed.
    fn purge_stale(&self, model_id: &str) {
        for dir in [
            self.paths.nested_dir(model_id),
            self.paths.flat_dir(model_id),
        ] {
            if dir.exists() && !validate::is_complete(&dir) {
                match fs::remove_dir_all(&dir) {
                    Ok(()) => {
                        info!(model = model_id, path = %dir.display(), "removed stale partial bundle");
                    }
                    Err(error) => {
                        warn!(model = model_id, "failed to remove stale bundle: {error}");
                    }
                }
            }
        }

        let cache = self.paths.cache_dir(model_id);
        if cache.exists() {
            if let Err(error) = fs::remove_dir_all(&cache) {
                warn!(model = model_id, "failed to clear download cache: {error}");
            }
        }
    }

    #[cfg(test)]
    fn active_count(&self) -> usize {
        self.active.lock().len()
    }
}
