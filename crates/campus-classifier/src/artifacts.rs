//! Model artifact caching.
//!
//! Locates the classifier's artifacts on disk, downloading them from
//! HuggingFace Hub into a local cache when absent.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::ClassifierError;

/// Default model repository on HuggingFace
pub const DEFAULT_MODEL_REPO: &str = "campus-assist/query-intent-bert";

/// Required model files
pub const MODEL_FILES: &[&str] = &["config.json", "tokenizer.json", "model.safetensors"];

/// Artifact cache configuration
#[derive(Debug, Clone)]
pub struct ArtifactCache {
    /// Cache directory path
    pub cache_dir: PathBuf,
    /// Model repository ID
    pub repo_id: String,
}

impl Default for ArtifactCache {
    fn default() -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("campus-assist")
            .join("models");

        Self {
            cache_dir,
            repo_id: DEFAULT_MODEL_REPO.to_string(),
        }
    }
}

impl ArtifactCache {
    /// Create a new artifact cache with custom settings
    pub fn new(cache_dir: impl Into<PathBuf>, repo_id: impl Into<String>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            repo_id: repo_id.into(),
        }
    }

    /// Get the model directory path
    pub fn model_dir(&self) -> PathBuf {
        self.cache_dir.join(self.repo_id.replace('/', "_"))
    }

    /// Check if all model files are cached
    pub fn is_cached(&self) -> bool {
        let model_dir = self.model_dir();
        MODEL_FILES.iter().all(|f| model_dir.join(f).exists())
    }

    /// Get path to a specific model file
    pub fn file_path(&self, filename: &str) -> PathBuf {
        self.model_dir().join(filename)
    }
}

/// Paths to model files
#[derive(Debug, Clone)]
pub struct ModelPaths {
    pub config: PathBuf,
    pub tokenizer: PathBuf,
    pub weights: PathBuf,
}

impl ModelPaths {
    /// Build paths from an explicit model directory, verifying that every
    /// required artifact is present.
    pub fn from_dir(dir: &Path) -> Result<Self, ClassifierError> {
        for filename in MODEL_FILES {
            let path = dir.join(filename);
            if !path.exists() {
                return Err(ClassifierError::Artifact(format!(
                    "missing {} in {}",
                    filename,
                    dir.display()
                )));
            }
        }
        Ok(Self {
            config: dir.join("config.json"),
            tokenizer: dir.join("tokenizer.json"),
            weights: dir.join("model.safetensors"),
        })
    }
}

/// Get or download model files.
///
/// Returns paths to config.json, tokenizer.json, and model.safetensors.
pub fn get_or_download_model(cache: &ArtifactCache) -> Result<ModelPaths, ClassifierError> {
    let model_dir = cache.model_dir();

    if cache.is_cached() {
        debug!(path = ?model_dir, "Using cached model");
    } else {
        info!(repo = %cache.repo_id, "Downloading model files...");
        download_model_files(cache)?;
    }

    Ok(ModelPaths {
        config: model_dir.join("config.json"),
        tokenizer: model_dir.join("tokenizer.json"),
        weights: model_dir.join("model.safetensors"),
    })
}

/// Download model files from HuggingFace Hub
fn download_model_files(cache: &ArtifactCache) -> Result<(), ClassifierError> {
    use hf_hub::api::sync::Api;

    let api = Api::new().map_err(|e| ClassifierError::Download(e.to_string()))?;
    let repo = api.model(cache.repo_id.clone());

    std::fs::create_dir_all(cache.model_dir())?;

    for filename in MODEL_FILES {
        info!(file = filename, "Downloading...");
        let source_path = repo
            .get(filename)
            .map_err(|e| ClassifierError::Download(format!("{}: {}", filename, e)))?;

        let dest_path = cache.file_path(filename);
        std::fs::copy(&source_path, &dest_path)?;
        debug!(file = filename, "Downloaded to {:?}", dest_path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cache_default() {
        let cache = ArtifactCache::default();
        assert!(cache.cache_dir.to_string_lossy().contains("campus-assist"));
        assert_eq!(cache.repo_id, DEFAULT_MODEL_REPO);
    }

    #[test]
    fn test_is_cached_empty() {
        let temp = TempDir::new().unwrap();
        let cache = ArtifactCache::new(temp.path(), "test/model");
        assert!(!cache.is_cached());
    }

    #[test]
    fn test_from_dir_missing_artifact() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("config.json"), "{}").unwrap();

        let err = ModelPaths::from_dir(temp.path()).unwrap_err();
        assert!(matches!(err, ClassifierError::Artifact(_)));
    }

    #[test]
    fn test_from_dir_complete() {
        let temp = TempDir::new().unwrap();
        for filename in MODEL_FILES {
            std::fs::write(temp.path().join(filename), "stub").unwrap();
        }

        let paths = ModelPaths::from_dir(temp.path()).unwrap();
        assert!(paths.weights.ends_with("model.safetensors"));
    }
}
