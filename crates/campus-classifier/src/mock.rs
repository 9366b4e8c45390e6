//! Mock classifier for testing.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::cache::PredictionCache;
use crate::model::{ClassificationResult, EngineStatus, ModelInfo, QueryClassifier};

/// Mock classifier that returns scripted results.
///
/// Useful for testing the dispatcher without loading a model. Carries a
/// real prediction cache so cache-stat assertions behave like the engine.
pub struct MockClassifier {
    info: ModelInfo,
    /// Scripted results per exact query text
    scripted: HashMap<String, ClassificationResult>,
    /// Result for queries with no script entry
    fallback: ClassificationResult,
    cache: PredictionCache,
    /// Count of predict calls (not cache hits), for assertions
    predictions: Mutex<u64>,
}

impl MockClassifier {
    /// Mock that classifies everything as the given label.
    pub fn returning(label: impl Into<String>, confidence: f32) -> Self {
        Self::with_fallback(ClassificationResult::classified(label, confidence, 0.1))
    }

    /// Mock that fails every classification.
    pub fn failing(error: impl Into<String>) -> Self {
        Self::with_fallback(ClassificationResult::failed(error))
    }

    /// Mock with an explicit fallback result.
    pub fn with_fallback(fallback: ClassificationResult) -> Self {
        Self {
            info: ModelInfo {
                name: "mock".to_string(),
                num_labels: 9,
                max_sequence_length: 128,
            },
            scripted: HashMap::new(),
            fallback,
            cache: PredictionCache::new(64),
            predictions: Mutex::new(0),
        }
    }

    /// Script a result for one exact query.
    pub fn with_response(mut self, query: impl Into<String>, result: ClassificationResult) -> Self {
        self.scripted.insert(query.into(), result);
        self
    }

    /// Number of real (non-cache-hit) predictions made.
    pub fn prediction_count(&self) -> u64 {
        *self.predictions.lock().expect("counter mutex poisoned")
    }
}

impl QueryClassifier for MockClassifier {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    fn predict(&self, text: &str) -> ClassificationResult {
        *self.predictions.lock().expect("counter mutex poisoned") += 1;
        self.scripted
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }

    fn predict_cached(&self, text: &str) -> ClassificationResult {
        if let Some((label, confidence)) = self.cache.get(text) {
            return ClassificationResult::classified(label, confidence, 0.0);
        }
        let result = self.predict(text);
        if !result.is_error() {
            if let Some(label) = result.label.as_deref() {
                self.cache.insert(text, label, result.confidence);
            }
        }
        result
    }

    fn status(&self) -> EngineStatus {
        EngineStatus {
            loaded: true,
            device: "mock".to_string(),
            labels: vec![
                "attendance".to_string(),
                "marks".to_string(),
                "fees".to_string(),
                "course".to_string(),
                "assignment".to_string(),
                "college_info".to_string(),
                "user_info".to_string(),
                "notices".to_string(),
                "general".to_string(),
            ],
            cache: self.cache.stats(),
        }
    }
}
