//! # campus-classifier
//!
//! Query intent classification for campus-assist using Candle.
//!
//! This crate owns the loaded sequence-classification model and everything
//! between raw query text and an actionable intent:
//!
//! - [`CandleClassifier`]: BERT inference with single, cached, and batch
//!   prediction paths
//! - [`LabelSpace`]: the model's index-to-name vocabulary, read from the
//!   model's own config
//! - [`ConfidencePolicy`]: error and low-confidence fallback to the general
//!   intent
//! - [`MockClassifier`]: scripted classifier for tests
//!
//! ## Features
//! - Local inference via Candle (no Python, no API)
//! - Automatic model artifact caching
//! - Bounded LRU prediction cache keyed by exact input text
//! - Works offline after initial model download

pub mod artifacts;
pub mod cache;
pub mod candle;
pub mod error;
pub mod labels;
pub mod mock;
pub mod model;
pub mod policy;

pub use artifacts::{
    get_or_download_model, ArtifactCache, ModelPaths, DEFAULT_MODEL_REPO, MODEL_FILES,
};
pub use cache::PredictionCache;
pub use candle::{CandleClassifier, DEFAULT_CACHE_CAPACITY, MAX_SEQ_LENGTH};
pub use error::ClassifierError;
pub use labels::LabelSpace;
pub use mock::MockClassifier;
pub use model::{CacheStats, ClassificationResult, EngineStatus, ModelInfo, QueryClassifier};
pub use policy::{ConfidencePolicy, DEFAULT_CONFIDENCE_THRESHOLD};

#[cfg(test)]
mod integration_tests {
    use super::*;
    use campus_types::Intent;

    /// Classification results flow through the policy into the closed
    /// intent set, whatever the engine produced.
    #[test]
    fn test_policy_total_over_engine_outputs() {
        let policy = ConfidencePolicy::default();

        let cases = [
            ClassificationResult::classified("attendance", 0.92, 1.0),
            ClassificationResult::classified("College Info", 0.5, 1.0),
            ClassificationResult::classified("unknown_12", 0.99, 1.0),
            ClassificationResult::classified("marks", 0.0, 1.0),
            ClassificationResult::failed("tokenizer error"),
        ];

        for result in cases {
            // Every case resolves without panicking
            let _intent: Intent = policy.resolve(&result);
        }
    }

    /// The mock and the policy together reproduce the engine's fallback
    /// chain: scripted low-confidence answers route to general.
    #[test]
    fn test_mock_with_policy() {
        let mock = MockClassifier::returning("general", 0.5).with_response(
            "asdkjasd",
            ClassificationResult::classified("fees", 0.05, 0.1),
        );
        let policy = ConfidencePolicy::default();

        let gibberish = mock.predict("asdkjasd");
        assert_eq!(policy.resolve(&gibberish), Intent::General);
    }
}
