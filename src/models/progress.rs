use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;

use super::paths::StorePaths;
use super::probe::dir_size;
use super::registry::ModelRegistry;

/// Ceiling on the size-based estimate. The engine gives no progress
/// callback, so completion is only ever signalled by the orchestrator
/// after validation passes; the estimate must not get there first.
const PROGRESS_CEILING: f64 = 0.99;

/// Convert observed bytes on disk into a bounded completion fraction.
#[must_use]
pub(crate) fn estimate(current_bytes: u64, expected_bytes: u64) -> f32 {
    if expected_bytes == 0 {
        return 0.0;
    }
    let fraction = current_bytes as f64 / expected_bytes as f64;
    fraction.min(PROGRESS_CEILING) as f32
}

/// Spawn the sampling task for one in-flight download.
///
/// Every tick it sums the nested bundle directory and the download cache
/// and raises the registry's progress accordingly. The task exits as soon
/// as `cancel` fires; the registry additionally drops writes once the
/// model leaves the downloading state, so a sampler that loses the race
/// on shutdown cannot corrupt a later attempt.
pub(crate) fn spawn_sampler(
    registry: Arc<ModelRegistry>,
    paths: StorePaths,
    model_id: String,
    expected_bytes: u64,
    poll_interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let bundle_dir = paths.nested_dir(&model_id);
        let cache_dir = paths.cache_dir(&model_id);
        let mut tick = interval(poll_interval);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                () = cancel.cancelled() => break,

                _ = tick.tick() => {
                    let current = dir_size(&bundle_dir) + dir_size(&cache_dir);
                    registry.bump_progress(&model_id, estimate(current, expected_bytes));
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::registry::DownloadState;
    use std::fs::{self, File};
    use std::io::Write;

    #[test]
    fn estimate_is_bounded_and_proportional() {
        assert_eq!(estimate(0, 100), 0.0);
        assert!((estimate(50, 100) - 0.5).abs() < 1e-6);
        // Even at 2x the expected size the estimate stays below 1.0.
        assert!((estimate(200, 100) - 0.99).abs() < 1e-6);
        assert_eq!(estimate(10, 0), 0.0);
    }

    #[test]
    fn estimate_never_decreases_along_growth() {
        let mut last = 0.0f32;
        for bytes in (0..200).step_by(10) {
            let next = estimate(bytes, 100);
            assert!(next >= last, "estimate regressed at {bytes} bytes");
            last = next;
        }
    }

    #[tokio::test]
    async fn sampler_tracks_directory_growth() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = StorePaths::with_roots(dir.path(), dir.path().join("cache"));
        let registry = Arc::new(ModelRegistry::new());
        registry.set_state("tiny", DownloadState::Downloading { progress: 0.0 });

        let cancel = CancellationToken::new();
        let sampler = spawn_sampler(
            Arc::clone(&registry),
            paths.clone(),
            "tiny".into(),
            1000,
            Duration::from_millis(10),
            cancel.clone(),
        );

        let bundle = paths.nested_dir("tiny");
        fs::create_dir_all(&bundle).expect("bundle dir");
        File::create(bundle.join("weight.bin"))
            .and_then(|mut file| file.write_all(&[0u8; 500]))
            .expect("write weights");

        let mut observed = 0.0f32;
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            observed = registry.state("tiny").progress();
            if observed > 0.0 {
                break;
            }
        }
        assert!((observed - 0.5).abs() < 1e-6, "observed {observed}");

        cancel.cancel();
        sampler.await.expect("sampler join");
    }

    #[tokio::test]
    async fn sampler_stops_writing_after_cancel() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = StorePaths::with_roots(dir.path(), dir.path().join("cache"));
        let registry = Arc::new(ModelRegistry::new());
        registry.set_state("tiny", DownloadState::Downloading { progress: 0.0 });

        let cancel = CancellationToken::new();
        let sampler = spawn_sampler(
            Arc::clone(&registry),
            paths.clone(),
            "tiny".into(),
            1000,
            Duration::from_millis(10),
            cancel.clone(),
        );
        cancel.cancel();
        sampler.await.expect("sampler join");

        let bundle = paths.nested_dir("tiny");
        fs::create_dir_all(&bundle).expect("bundle dir");
        File::create(bundle.join("weight.bin"))
            .and_then(|mut file| file.write_all(&[0u8; 900]))
            .expect("write weights");

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(registry.state("tiny").progress(), 0.0);
    }
}
