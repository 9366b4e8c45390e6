//! Label space: the model's native index-to-name vocabulary.
//!
//! The mapping is read from the model's own config.json (`id2label`), the
//! same artifact the weights come from, so index/label skew between the two
//! cannot arise. The label space is total: an index the model emits that has
//! no entry yields a synthetic `unknown_<index>` label instead of failing.

use std::collections::BTreeMap;

use serde::Deserialize;

use campus_types::{normalize_label, Intent, ALL_INTENTS};

use crate::error::ClassifierError;

/// Subset of the model config this crate cares about.
#[derive(Debug, Deserialize)]
struct RawLabelConfig {
    #[serde(default)]
    id2label: BTreeMap<String, String>,
}

/// Ordered mapping from model output index to label name.
#[derive(Debug, Clone)]
pub struct LabelSpace {
    labels: BTreeMap<usize, String>,
}

impl LabelSpace {
    /// Parse the label space out of the model's config.json contents.
    pub fn from_model_config(config_json: &str) -> Result<Self, ClassifierError> {
        let raw: RawLabelConfig = serde_json::from_str(config_json)
            .map_err(|e| ClassifierError::Artifact(format!("invalid config.json: {}", e)))?;

        if raw.id2label.is_empty() {
            return Err(ClassifierError::LabelSpace(
                "config.json has no id2label mapping".to_string(),
            ));
        }

        let mut labels = BTreeMap::new();
        for (key, name) in raw.id2label {
            let index: usize = key.parse().map_err(|_| {
                ClassifierError::LabelSpace(format!("non-numeric id2label key: {:?}", key))
            })?;
            labels.insert(index, name);
        }

        Ok(Self { labels })
    }

    /// Build from an explicit index-ordered list of names. Used by tests.
    pub fn from_names(names: &[&str]) -> Self {
        Self {
            labels: names
                .iter()
                .enumerate()
                .map(|(i, n)| (i, n.to_string()))
                .collect(),
        }
    }

    /// Label for a model output index.
    ///
    /// Total over all indices: a missing entry yields `unknown_<index>`.
    pub fn label_for(&self, index: usize) -> String {
        self.labels
            .get(&index)
            .cloned()
            .unwrap_or_else(|| format!("unknown_{}", index))
    }

    /// Number of labels the classification head was trained with.
    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }

    /// All label names in index order.
    pub fn names(&self) -> Vec<String> {
        self.labels.values().cloned().collect()
    }

    /// Verify that every application intent is reachable from some model
    /// label after normalization.
    ///
    /// Run once at engine construction so vocabulary skew fails at startup
    /// instead of silently misrouting queries later.
    pub fn validate_against_intents(&self) -> Result<(), ClassifierError> {
        let normalized: Vec<String> = self
            .labels
            .values()
            .map(|name| normalize_label(name))
            .collect();

        let missing: Vec<&str> = ALL_INTENTS
            .iter()
            .filter(|intent| !normalized.iter().any(|n| Intent::from_label(n) == **intent))
            .map(|intent| intent.as_str())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ClassifierError::LabelSpace(format!(
                "model labels do not cover intents: [{}]",
                missing.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_CONFIG: &str = r#"{
        "hidden_size": 768,
        "id2label": {
            "0": "attendance",
            "1": "marks",
            "2": "fees",
            "3": "course",
            "4": "assignment",
            "5": "College Info",
            "6": "user info",
            "7": "notices",
            "8": "general"
        }
    }"#;

    #[test]
    fn test_parse_from_config() {
        let space = LabelSpace::from_model_config(FULL_CONFIG).unwrap();
        assert_eq!(space.num_labels(), 9);
        assert_eq!(space.label_for(0), "attendance");
        assert_eq!(space.label_for(5), "College Info");
    }

    #[test]
    fn test_unknown_index_is_synthetic() {
        let space = LabelSpace::from_model_config(FULL_CONFIG).unwrap();
        assert_eq!(space.label_for(42), "unknown_42");
    }

    #[test]
    fn test_missing_id2label_rejected() {
        let err = LabelSpace::from_model_config(r#"{"hidden_size": 768}"#).unwrap_err();
        assert!(matches!(err, ClassifierError::LabelSpace(_)));
    }

    #[test]
    fn test_non_numeric_key_rejected() {
        let err =
            LabelSpace::from_model_config(r#"{"id2label": {"zero": "attendance"}}"#).unwrap_err();
        assert!(matches!(err, ClassifierError::LabelSpace(_)));
    }

    #[test]
    fn test_validation_passes_with_drifted_names() {
        // "College Info" and "user info" normalize into the vocabulary
        let space = LabelSpace::from_model_config(FULL_CONFIG).unwrap();
        space.validate_against_intents().unwrap();
    }

    #[test]
    fn test_validation_fails_on_missing_intent() {
        let space = LabelSpace::from_names(&["attendance", "marks", "general"]);
        let err = space.validate_against_intents().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("fees"));
        assert!(message.contains("notices"));
    }
}
