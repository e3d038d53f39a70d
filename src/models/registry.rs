use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::catalog::CATALOG;
use super::paths::StorePaths;
use super::validate;

/// Lifecycle state of one model. Exactly one state is in effect per model
/// identifier at any time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum DownloadState {
    Idle,
    Downloading { progress: f32 },
    Completed,
    Failed(String),
}

impl DownloadState {
    /// Fractional progress for UI display. `Completed` pins 1.0; the
    /// size-based estimate never reaches it on its own.
    #[must_use]
    pub fn progress(&self) -> f32 {
        match self {
            DownloadState::Idle | DownloadState::Failed(_) => 0.0,
            DownloadState::Downloading { progress } => *progress,
            DownloadState::Completed => 1.0,
        }
    }

    #[must_use]
    pub fn is_downloading(&self) -> bool {
        matches!(self, DownloadState::Downloading { .. })
    }
}

/// Observed per-model state, keyed by model identifier.
///
/// Entries are created lazily and mutated only by the download
/// orchestrator and the tasks it owns; everything else takes non-blocking
/// snapshots. `Completed` is a cache of disk state, and
/// `refresh_from_disk` re-derives it from the bundle validator at any
/// time.
pub struct ModelRegistry {
    states: RwLock<HashMap<String, DownloadState>>,
}

impl ModelRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            states: RwLock::new(HashMap::new()),
        }
    }

    /// Current state for `model_id`; unknown identifiers read as `Idle`.
    #[must_use]
    pub fn state(&self, model_id: &str) -> DownloadState {
        self.states
            .read()
            .get(model_id)
            .cloned()
            .unwrap_or(DownloadState::Idle)
    }

    /// Snapshot of all entries with explicit state.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, DownloadState> {
        self.states.read().clone()
    }

    /// Whether at least one usable model is present.
    #[must_use]
    pub fn any_model_downloaded(&self) -> bool {
        self.states
            .read()
            .values()
            .any(|state| *state == DownloadState::Completed)
    }

    /// Re-derive the downloaded set from disk for every catalog entry.
    ///
    /// Safe to call at any time, including process start. In-flight
    /// downloads keep their `Downloading` state; a `Failed` marker is
    /// kept until the user clears or retries it, unless the bundle has
    /// since become complete on disk.
    pub fn refresh_from_disk(&self, paths: &StorePaths) {
        let mut states = self.states.write();
        for descriptor in CATALOG.iter() {
            let entry = states
                .entry(descriptor.id.to_string())
                .or_insert(DownloadState::Idle);
            if entry.is_downloading() {
                continue;
            }
            if validate::locate_bundle(paths, descriptor.id).is_some() {
                *entry = DownloadState::Completed;
            } else if *entry == DownloadState::Completed {
                *entry = DownloadState::Idle;
            }
        }
    }

    pub(crate) fn set_state(&self, model_id: &str, state: DownloadState) {
        self.states.write().insert(model_id.to_string(), state);
    }

    /// Raise the progress of an in-flight download. Writes are dropped
    /// when the model is no longer downloading (a finished or restarted
    /// attempt must never see a stale sampler's value) and when they
    /// would move progress backwards.
    pub(crate) fn bump_progress(&self, model_id: &str, progress: f32) {
        let mut states = self.states.write();
        if let Some(DownloadState::Downloading { progress: current }) = states.get_mut(model_id) {
            if progress > *current {
                *current = progress;
            }
        }
    }

    /// Reset a `Failed` marker back to `Idle`; any other state is left
    /// untouched.
    pub(crate) fn clear_failed(&self, model_id: &str) {
        let mut states = self.states.write();
        if let Some(entry) = states.get_mut(model_id) {
            if matches!(entry, DownloadState::Failed(_)) {
                *entry = DownloadState::Idle;
            }
        }
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
