//! Classifier error types.

use thiserror::Error;

/// Errors that can occur while loading or running the classifier.
///
/// Construction-time errors are fatal: the process must not serve requests
/// without a working engine. Per-call inference failures never surface as
/// this type across the engine boundary; they are folded into
/// `ClassificationResult::error` instead.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Candle model error
    #[error("Candle error: {0}")]
    Candle(#[from] candle_core::Error),

    /// Tokenizer error
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// Model artifact not found or unparseable
    #[error("Model artifact error: {0}")]
    Artifact(String),

    /// Download error
    #[error("Failed to download model: {0}")]
    Download(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Label space missing or inconsistent with the intent vocabulary
    #[error("Label space error: {0}")]
    LabelSpace(String),
}
