//! Candle-based sequence classification engine.
//!
//! Runs a fine-tuned BERT classification checkpoint: BERT encoder, tanh
//! pooler over the [CLS] token, linear head over the label space, softmax.

use std::time::Instant;

use candle_core::{DType, Device, Tensor, D};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use campus_types::ClassifierSettings;

use crate::artifacts::{get_or_download_model, ArtifactCache, ModelPaths};
use crate::cache::PredictionCache;
use crate::error::ClassifierError;
use crate::labels::LabelSpace;
use crate::model::{ClassificationResult, EngineStatus, ModelInfo, QueryClassifier};

/// Maximum sequence length. Shorter than BERT's 512 absolute limit to bound
/// inference latency; longer inputs are truncated, not rejected.
pub const MAX_SEQ_LENGTH: usize = 128;

/// Default prediction cache capacity
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Dimensions this crate needs from the model config.
#[derive(serde::Deserialize)]
struct RawBertDims {
    hidden_size: usize,
}

/// Candle-based query classifier.
///
/// Constructed once per process and shared; the model and tokenizer are
/// read-only after load, the prediction cache is the only mutable state.
pub struct CandleClassifier {
    model: BertModel,
    pooler: Linear,
    head: Linear,
    tokenizer: Tokenizer,
    labels: LabelSpace,
    device: Device,
    info: ModelInfo,
    cache: PredictionCache,
}

impl CandleClassifier {
    /// Load the classifier from cache (downloading if needed).
    pub fn load(cache: &ArtifactCache, cache_capacity: usize) -> Result<Self, ClassifierError> {
        let paths = get_or_download_model(cache)?;
        Self::load_from_paths(&paths, &cache.repo_id, cache_capacity)
    }

    /// Load with default cache settings
    pub fn load_default() -> Result<Self, ClassifierError> {
        let cache = ArtifactCache::default();
        Self::load(&cache, DEFAULT_CACHE_CAPACITY)
    }

    /// Load according to application settings: an explicit model directory
    /// when configured, the hub cache otherwise.
    pub fn from_settings(settings: &ClassifierSettings) -> Result<Self, ClassifierError> {
        match &settings.model_dir {
            Some(dir) => {
                let paths = ModelPaths::from_dir(std::path::Path::new(dir))?;
                Self::load_from_paths(&paths, dir, settings.cache_capacity)
            }
            None => {
                let cache = ArtifactCache {
                    repo_id: settings.repo_id.clone(),
                    ..ArtifactCache::default()
                };
                Self::load(&cache, settings.cache_capacity)
            }
        }
    }

    /// Load from explicit file paths.
    ///
    /// Fatal on any missing or unparseable artifact: the engine offers no
    /// degraded mode, and callers must treat failure here as a startup
    /// abort.
    pub fn load_from_paths(
        paths: &ModelPaths,
        name: &str,
        cache_capacity: usize,
    ) -> Result<Self, ClassifierError> {
        info!("Loading classifier model...");

        let device = select_device();

        // Config and label space come from the same artifact as the
        // weights, so index/label skew cannot arise.
        let config_str = std::fs::read_to_string(&paths.config)?;
        let config: BertConfig = serde_json::from_str(&config_str)
            .map_err(|e| ClassifierError::Artifact(format!("Invalid config: {}", e)))?;
        // hidden_size is private on BertConfig; read it from the raw JSON
        let dims: RawBertDims = serde_json::from_str(&config_str)
            .map_err(|e| ClassifierError::Artifact(format!("Invalid config: {}", e)))?;
        let labels = LabelSpace::from_model_config(&config_str)?;
        labels.validate_against_intents()?;

        let tokenizer = Tokenizer::from_file(&paths.tokenizer)
            .map_err(|e| ClassifierError::Tokenizer(e.to_string()))?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[paths.weights.clone()], DType::F32, &device)?
        };

        let pooler = candle_nn::linear(
            dims.hidden_size,
            dims.hidden_size,
            vb.pp("bert.pooler.dense"),
        )?;
        let head = candle_nn::linear(dims.hidden_size, labels.num_labels(), vb.pp("classifier"))?;
        let model = BertModel::load(vb.pp("bert"), &config)?;

        info!(
            device = %device_name(&device),
            labels = ?labels.names(),
            max_seq = MAX_SEQ_LENGTH,
            "Model loaded successfully"
        );

        let info = ModelInfo {
            name: name.to_string(),
            num_labels: labels.num_labels(),
            max_sequence_length: MAX_SEQ_LENGTH,
        };

        Ok(Self {
            model,
            pooler,
            head,
            tokenizer,
            labels,
            device,
            info,
            cache: PredictionCache::new(cache_capacity),
        })
    }

    /// The engine's label space.
    pub fn labels(&self) -> &LabelSpace {
        &self.labels
    }

    /// Tokenize, pad, and run one forward pass over a batch of texts.
    ///
    /// Returns (argmax index, probability) per input, in input order.
    fn classify_batch(&self, texts: &[&str]) -> Result<Vec<(usize, f32)>, ClassifierError> {
        debug!(count = texts.len(), "Classifying batch");

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| ClassifierError::Tokenizer(e.to_string()))?;

        // Pad to the longest sequence, capped at MAX_SEQ_LENGTH
        let max_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0)
            .min(MAX_SEQ_LENGTH)
            .max(1);

        let mut input_ids: Vec<Vec<u32>> = Vec::new();
        let mut attention_masks: Vec<Vec<u32>> = Vec::new();

        for encoding in &encodings {
            let ids = encoding.get_ids();
            let mask = encoding.get_attention_mask();

            let truncated_len = ids.len().min(max_len);
            let mut padded_ids = ids[..truncated_len].to_vec();
            let mut padded_mask = mask[..truncated_len].to_vec();

            padded_ids.resize(max_len, 0);
            padded_mask.resize(max_len, 0);

            input_ids.push(padded_ids);
            attention_masks.push(padded_mask);
        }

        let batch_size = texts.len();
        let input_ids_flat: Vec<u32> = input_ids.into_iter().flatten().collect();
        let mask_flat: Vec<u32> = attention_masks.into_iter().flatten().collect();

        let input_ids = Tensor::from_vec(input_ids_flat, (batch_size, max_len), &self.device)?;
        let attention_mask = Tensor::from_vec(mask_flat, (batch_size, max_len), &self.device)?;
        let token_type_ids = input_ids.zeros_like()?;

        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;

        // [CLS] token -> tanh pooler -> classification head -> softmax
        let cls = hidden.narrow(1, 0, 1)?.squeeze(1)?;
        let pooled = self.pooler.forward(&cls)?.tanh()?;
        let logits = self.head.forward(&pooled)?;
        let probs = candle_nn::ops::softmax(&logits, D::Minus1)?;

        let rows: Vec<Vec<f32>> = probs.to_vec2()?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let mut best_index = 0usize;
                let mut best_prob = f32::NEG_INFINITY;
                for (index, prob) in row.into_iter().enumerate() {
                    if prob > best_prob {
                        best_prob = prob;
                        best_index = index;
                    }
                }
                (best_index, best_prob)
            })
            .collect())
    }
}

impl QueryClassifier for CandleClassifier {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    fn predict(&self, text: &str) -> ClassificationResult {
        let start = Instant::now();

        match self.classify_batch(&[text]) {
            Ok(mut predictions) => match predictions.pop() {
                Some((index, confidence)) => ClassificationResult::classified(
                    self.labels.label_for(index),
                    confidence,
                    elapsed_ms(start),
                ),
                None => ClassificationResult::failed("empty prediction batch"),
            },
            Err(e) => {
                warn!(error = %e, "Classification failed");
                ClassificationResult::failed(e.to_string())
            }
        }
    }

    fn predict_cached(&self, text: &str) -> ClassificationResult {
        let start = Instant::now();

        if let Some((label, confidence)) = self.cache.get(text) {
            debug!(label = %label, "Prediction cache hit");
            return ClassificationResult::classified(label, confidence, elapsed_ms(start));
        }

        let result = self.predict(text);
        if !result.is_error() {
            if let Some(label) = result.label.as_deref() {
                self.cache.insert(text, label, result.confidence);
            }
        }
        result
    }

    fn predict_batch(&self, texts: &[&str]) -> Vec<ClassificationResult> {
        if texts.is_empty() {
            return vec![];
        }

        let start = Instant::now();

        match self.classify_batch(texts) {
            Ok(predictions) => {
                let elapsed = elapsed_ms(start);
                predictions
                    .into_iter()
                    .map(|(index, confidence)| {
                        ClassificationResult::classified(
                            self.labels.label_for(index),
                            confidence,
                            elapsed,
                        )
                    })
                    .collect()
            }
            Err(e) => {
                // Whole-batch failure: one error result per input so
                // callers can always index positionally.
                warn!(error = %e, count = texts.len(), "Batch classification failed");
                vec![ClassificationResult::failed(e.to_string()); texts.len()]
            }
        }
    }

    fn status(&self) -> EngineStatus {
        EngineStatus {
            loaded: true,
            device: device_name(&self.device),
            labels: self.labels.names(),
            cache: self.cache.stats(),
        }
    }
}

/// Select the execution device once: accelerator if available, else CPU.
fn select_device() -> Device {
    match Device::cuda_if_available(0) {
        Ok(device) => device,
        Err(e) => {
            warn!(error = %e, "CUDA initialization failed, using CPU");
            Device::Cpu
        }
    }
}

fn device_name(device: &Device) -> String {
    if device.is_cuda() {
        "cuda:0".to_string()
    } else if device.is_metal() {
        "metal".to_string()
    } else {
        "cpu".to_string()
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    // Integration tests require model download, run with:
    // cargo test -p campus-classifier -- --ignored

    #[test]
    #[ignore = "requires model download"]
    fn test_load_model() {
        let classifier = CandleClassifier::load_default().unwrap();
        assert_eq!(classifier.info().max_sequence_length, MAX_SEQ_LENGTH);
        assert!(classifier.status().loaded);
    }

    #[test]
    #[ignore = "requires model download"]
    fn test_predict_deterministic() {
        let classifier = CandleClassifier::load_default().unwrap();
        let first = classifier.predict("What is my attendance this month?");
        let second = classifier.predict("What is my attendance this month?");
        assert_eq!(first.label, second.label);
        assert_eq!(first.confidence, second.confidence);
    }

    #[test]
    #[ignore = "requires model download"]
    fn test_predict_batch_positional() {
        let classifier = CandleClassifier::load_default().unwrap();
        let texts = vec!["What are my marks?", "Any new notices?", "hello"];
        let results = classifier.predict_batch(&texts);
        assert_eq!(results.len(), 3);
        for result in &results {
            assert!(!result.is_error());
        }
    }

    #[test]
    #[ignore = "requires model download"]
    fn test_cache_transparency() {
        let classifier = CandleClassifier::load_default().unwrap();
        let plain = classifier.predict("What is my fee status?");
        let cached_miss = classifier.predict_cached("What is my fee status?");
        let cached_hit = classifier.predict_cached("What is my fee status?");

        assert_eq!(plain.label, cached_miss.label);
        assert_eq!(cached_miss.label, cached_hit.label);
        assert_eq!(cached_miss.confidence, cached_hit.confidence);
        assert!(classifier.status().cache.hits >= 1);
    }
}
