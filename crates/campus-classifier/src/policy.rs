//! Confidence policy: turns a raw classification into an actionable intent.

use tracing::debug;

use campus_types::{ClassifierSettings, Intent};

use crate::model::ClassificationResult;

/// Confidence below this resolves to the general intent.
///
/// The observed deployment value; deliberately low, since low confidence is
/// a last-resort fallback here rather than a quality bar.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.15;

/// Policy for converting a `ClassificationResult` into an `Intent`.
///
/// Total over all inputs: every result, including errors and malformed
/// confidence values, resolves to a member of the closed intent set.
#[derive(Debug, Clone, Copy)]
pub struct ConfidencePolicy {
    threshold: f32,
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

impl ConfidencePolicy {
    /// Create a policy with a custom threshold.
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// Create a policy from application settings.
    pub fn from_settings(settings: &ClassifierSettings) -> Self {
        Self {
            threshold: settings.confidence_threshold,
        }
    }

    /// The configured fallback threshold.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Resolve a classification into the intent to act on.
    ///
    /// Rules, in order:
    /// 1. Error or missing label -> `General`
    /// 2. Confidence below the threshold (or not a finite number) -> `General`
    /// 3. Otherwise the normalized label's intent
    pub fn resolve(&self, result: &ClassificationResult) -> Intent {
        if let Some(error) = &result.error {
            debug!(error = %error, "Classification error, falling back to general");
            return Intent::General;
        }

        let Some(label) = &result.label else {
            debug!("Classification produced no label, falling back to general");
            return Intent::General;
        };

        if !result.confidence.is_finite() || result.confidence < self.threshold {
            debug!(
                confidence = result.confidence,
                threshold = self.threshold,
                "Low confidence, falling back to general"
            );
            return Intent::General;
        }

        Intent::from_label(label)
    }
}
