//! Classifier trait and result types.
//!
//! Defines the interface the dispatcher programs against, so the real
//! Candle engine and the scripted mock are interchangeable.

use serde::{Deserialize, Serialize};

/// Outcome of one classification call.
///
/// Created fresh per inference, never mutated, and immediately consumed by
/// the confidence policy. When `error` is set the label is absent and the
/// confidence is meaningless.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Raw label from the model's label space (absent on failure)
    pub label: Option<String>,

    /// Probability mass of the top label (0.0-1.0)
    pub confidence: f32,

    /// Wall-clock inference time in milliseconds
    pub inference_time_ms: f64,

    /// Failure description, if the call did not produce a label
    pub error: Option<String>,
}

impl ClassificationResult {
    /// A successful classification.
    pub fn classified(label: impl Into<String>, confidence: f32, inference_time_ms: f64) -> Self {
        Self {
            label: Some(label.into()),
            confidence,
            inference_time_ms,
            error: None,
        }
    }

    /// A failed classification. The caller has a defined fallback for this
    /// case, so failures are data, not panics.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            label: None,
            confidence: 0.0,
            inference_time_ms: 0.0,
            error: Some(error.into()),
        }
    }

    /// Whether this result carries an error instead of a label.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Model information
#[derive(Debug, Clone)]
pub struct ModelInfo {
    /// Model name or repository id
    pub name: String,
    /// Number of labels in the classification head
    pub num_labels: usize,
    /// Maximum sequence length in tokens
    pub max_sequence_length: usize,
}

/// Prediction cache counters, exposed for readiness reporting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that fell through to inference
    pub misses: u64,
    /// Entries currently held
    pub len: usize,
    /// Maximum entries held
    pub capacity: usize,
}

/// Introspection payload for health/readiness reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    /// Whether the model is loaded and serving
    pub loaded: bool,
    /// Execution device ("cpu", "cuda:0", ...)
    pub device: String,
    /// Label names in index order
    pub labels: Vec<String>,
    /// Prediction cache counters
    pub cache: CacheStats,
}

/// Trait for query classifiers.
///
/// Implementations must be thread-safe (Send + Sync) for concurrent use.
/// Calls block for the duration of a forward pass; async callers should
/// offload them to a worker thread.
pub trait QueryClassifier: Send + Sync {
    /// Get model information
    fn info(&self) -> &ModelInfo;

    /// Classify a single text.
    ///
    /// Never panics across this boundary: internal failures come back as a
    /// result with `error` set.
    fn predict(&self, text: &str) -> ClassificationResult;

    /// Classify with an exact-text cache in front of inference.
    ///
    /// A hit is indistinguishable in shape from a miss. Default
    /// implementation has no cache.
    fn predict_cached(&self, text: &str) -> ClassificationResult {
        self.predict(text)
    }

    /// Classify multiple texts, one result per input in input order.
    ///
    /// Default implementation classifies each text individually; engines
    /// override it with a single batched forward pass.
    fn predict_batch(&self, texts: &[&str]) -> Vec<ClassificationResult> {
        texts.iter().map(|text| self.predict(text)).collect()
    }

    /// Current engine status for health reporting.
    fn status(&self) -> EngineStatus;
}
