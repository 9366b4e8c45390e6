//! Configuration loading for campus-assist.
//!
//! Layered precedence: built-in defaults -> config file -> env vars -> CLI
//! flags (applied by the caller). The config file lives at
//! `~/.config/campus-assist/config.toml`.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::AssistError;

/// Classifier engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierSettings {
    /// Directory holding config.json, tokenizer.json and model.safetensors.
    /// When unset, artifacts are fetched from `repo_id` into the local cache.
    #[serde(default)]
    pub model_dir: Option<String>,

    /// HuggingFace repository to fetch artifacts from when `model_dir` is
    /// unset.
    #[serde(default = "default_model_repo")]
    pub repo_id: String,

    /// Confidence below this resolves to the general intent. The observed
    /// value from the trained model's deployment; deliberately low, and not
    /// a validated quality bar.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,

    /// Capacity of the exact-text prediction cache.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_model_repo() -> String {
    "campus-assist/query-intent-bert".to_string()
}

fn default_confidence_threshold() -> f32 {
    0.15
}

fn default_cache_capacity() -> usize {
    1024
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            model_dir: None,
            repo_id: default_model_repo(),
            confidence_threshold: default_confidence_threshold(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl ClassifierSettings {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(format!(
                "confidence_threshold must be 0.0-1.0, got {}",
                self.confidence_threshold
            ));
        }
        if self.cache_capacity == 0 {
            return Err("cache_capacity must be > 0".to_string());
        }
        Ok(())
    }
}

/// Text-generation service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// API base URL (OpenAI-compatible chat completions endpoint)
    #[serde(default = "default_generation_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_generation_model")]
    pub model: String,

    /// API key (prefer the CAMPUS_GENERATION_API_KEY env var over the file)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_generation_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failure
    #[serde(default = "default_generation_retries")]
    pub max_retries: u32,
}

fn default_generation_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_generation_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_generation_timeout() -> u64 {
    60
}

fn default_generation_retries() -> u32 {
    3
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            base_url: default_generation_base_url(),
            model: default_generation_model(),
            api_key: None,
            timeout_secs: default_generation_timeout(),
            max_retries: default_generation_retries(),
        }
    }
}

/// Document-retrieval service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalSettings {
    /// Retrieval service endpoint
    #[serde(default = "default_retrieval_endpoint")]
    pub endpoint: String,

    /// Number of top-ranked documents to request
    #[serde(default = "default_retrieval_top_k")]
    pub top_k: usize,
}

fn default_retrieval_endpoint() -> String {
    "http://127.0.0.1:8001/retrieve".to_string()
}

fn default_retrieval_top_k() -> usize {
    5
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            endpoint: default_retrieval_endpoint(),
            top_k: default_retrieval_top_k(),
        }
    }
}

impl RetrievalSettings {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.top_k == 0 {
            return Err("top_k must be > 0".to_string());
        }
        Ok(())
    }
}

/// Web search service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Instant-answer API endpoint
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,
}

fn default_search_endpoint() -> String {
    "https://api.duckduckgo.com".to_string()
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: default_search_endpoint(),
        }
    }
}

/// Record store (host system read API) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Base URL of the host record-management API
    #[serde(default = "default_store_base_url")]
    pub base_url: String,
}

fn default_store_base_url() -> String {
    "http://127.0.0.1:8000/api/v1".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            base_url: default_store_base_url(),
        }
    }
}

/// Main application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Classifier engine configuration
    #[serde(default)]
    pub classifier: ClassifierSettings,

    /// Generation service configuration
    #[serde(default)]
    pub generation: GenerationSettings,

    /// Retrieval service configuration
    #[serde(default)]
    pub retrieval: RetrievalSettings,

    /// Web search configuration
    #[serde(default)]
    pub search: SearchSettings,

    /// Record store configuration
    #[serde(default)]
    pub store: StoreSettings,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            classifier: ClassifierSettings::default(),
            generation: GenerationSettings::default(),
            retrieval: RetrievalSettings::default(),
            search: SearchSettings::default(),
            store: StoreSettings::default(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/campus-assist/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (CAMPUS_*)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, AssistError> {
        let config_dir = ProjectDirs::from("", "", "campus-assist")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Format: CAMPUS_LOG_LEVEL, CAMPUS_CLASSIFIER_CONFIDENCE_THRESHOLD,
        // CAMPUS_GENERATION_API_KEY, etc.
        builder = builder.add_source(
            Environment::with_prefix("CAMPUS")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| AssistError::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| AssistError::Config(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate all sections, failing fast on the first problem.
    pub fn validate(&self) -> Result<(), AssistError> {
        self.classifier
            .validate()
            .map_err(AssistError::Config)?;
        self.retrieval.validate().map_err(AssistError::Config)?;
        Ok(())
    }

    /// Resolved model directory, when configured explicitly.
    pub fn model_dir(&self) -> Option<PathBuf> {
        self.classifier.model_dir.as_ref().map(PathBuf::from)
    }
}
