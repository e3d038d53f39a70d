use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

use crate::config::ModelStoreConfig;

/// Vendor and repository path segments the engine imposes on its nested
/// bundle layout.
const VENDOR_DIR: &str = "argmaxinc";
const ENGINE_REPO_DIR: &str = "whisperkit-coreml";

/// On-disk locations for the model store.
///
/// A bundle for a model id may live at either of two places: the nested
/// path the engine writes to, or a flat `<model-id>/` directory kept for
/// compatibility with alternate layouts. In-progress downloads also leave
/// a transient cache subtree which is expected to vanish on completion.
#[derive(Debug, Clone)]
pub struct StorePaths {
    models_root: PathBuf,
    cache_root: PathBuf,
}

impl StorePaths {
    pub fn resolve(config: &ModelStoreConfig) -> Result<Self> {
        let models_root = match &config.models_root {
            Some(root) => root.clone(),
            None => default_models_root()?,
        };
        let cache_root = match &config.cache_root {
            Some(root) => root.clone(),
            None => models_root.join(".cache").join("murmur"),
        };
        Ok(Self {
            models_root,
            cache_root,
        })
    }

    /// Pin both roots explicitly; used by tests and embedders.
    pub fn with_roots(models_root: impl Into<PathBuf>, cache_root: impl Into<PathBuf>) -> Self {
        Self {
            models_root: models_root.into(),
            cache_root: cache_root.into(),
        }
    }

    #[must_use]
    pub fn models_root(&self) -> &Path {
        &self.models_root
    }

    /// Primary bundle location, in the engine's nested layout.
    #[must_use]
    pub fn nested_dir(&self, model_id: &str) -> PathBuf {
        self.models_root
            .join("models")
            .join(VENDOR_DIR)
            .join(ENGINE_REPO_DIR)
            .join(model_id)
    }

    /// Secondary flat bundle location.
    #[must_use]
    pub fn flat_dir(&self, model_id: &str) -> PathBuf {
        self.models_root.join(model_id)
    }

    /// Transient per-model download cache.
    #[must_use]
    pub fn cache_dir(&self, model_id: &str) -> PathBuf {
        self.cache_root.join("download").join(model_id)
    }
}

fn default_models_root() -> Result<PathBuf> {
    let project_dirs =
        ProjectDirs::from("com", "Murmur", "Murmur").context("missing project directories")?;
    Ok(project_dirs.data_dir().join("models"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_path_follows_engine_layout() {
        let paths = StorePaths::with_roots("/data/models", "/data/cache");
        assert_eq!(
            paths.nested_dir("tiny"),
            PathBuf::from("/data/models/models/argmaxinc/whisperkit-coreml/tiny")
        );
        assert_eq!(paths.flat_dir("tiny"), PathBuf::from("/data/models/tiny"));
        assert_eq!(
            paths.cache_dir("tiny"),
            PathBuf::from("/data/cache/download/tiny")
        );
    }

    #[test]
    fn cache_root_derives_from_models_root() {
        let config = ModelStoreConfig {
            models_root: Some(PathBuf::from("/data/models")),
            cache_root: None,
            ..ModelStoreConfig::default()
        };
        let paths = StorePaths::resolve(&config).expect("resolve paths");
        assert_eq!(
            paths.cache_dir("base"),
            PathBuf::from("/data/models/.cache/murmur/download/base")
        );
    }
}
