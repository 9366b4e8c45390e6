//! Text-generation service client.
//!
//! The dispatcher treats generation as an opaque function from a filled
//! prompt template to text. The API client speaks OpenAI-compatible chat
//! completions with retry; the mock echoes the rendered prompt for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use backoff::{backoff::Backoff, ExponentialBackoff};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use campus_types::GenerationSettings;

use crate::error::ServiceError;
use crate::templates::{render, TemplateName};

/// Pluggable text-generation service.
///
/// Empty or whitespace-only output is valid and must not be treated as an
/// error.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Render the named template with the given variables and generate a
    /// response.
    async fn generate(
        &self,
        template: TemplateName,
        variables: &HashMap<String, String>,
    ) -> Result<String, ServiceError>;
}

/// Configuration for the API-based generator.
#[derive(Debug, Clone)]
pub struct ApiGeneratorConfig {
    /// API base URL (e.g., "https://api.openai.com/v1")
    pub base_url: String,

    /// Model to use (e.g., "gpt-4o-mini")
    pub model: String,

    /// API key
    pub api_key: SecretString,

    /// Request timeout
    pub timeout: Duration,

    /// Maximum retries on failure
    pub max_retries: u32,
}

impl ApiGeneratorConfig {
    /// Build from application settings. Fails when no API key is
    /// configured.
    pub fn from_settings(settings: &GenerationSettings) -> Result<Self, ServiceError> {
        let api_key = settings
            .api_key
            .clone()
            .ok_or_else(|| ServiceError::Config("generation API key not configured".to_string()))?;

        Ok(Self {
            base_url: settings.base_url.clone(),
            model: settings.model.clone(),
            api_key: SecretString::from(api_key),
            timeout: Duration::from_secs(settings.timeout_secs),
            max_retries: settings.max_retries,
        })
    }
}

/// API-based generator implementation.
pub struct ApiGenerator {
    client: Client,
    config: ApiGeneratorConfig,
}

impl ApiGenerator {
    /// Create a new API generator.
    pub fn new(config: ApiGeneratorConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ServiceError::Config(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Call the API with retry logic.
    async fn call_api(&self, prompt: &str) -> Result<String, ServiceError> {
        let mut backoff = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(120)),
            ..Default::default()
        };

        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!(attempt = attempts, "Calling generation API");

            match self.make_request(prompt).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    if attempts >= self.config.max_retries {
                        error!(error = %e, "Max retries exceeded");
                        return Err(e);
                    }

                    match backoff.next_backoff() {
                        Some(duration) => {
                            warn!(
                                error = %e,
                                retry_in_ms = duration.as_millis(),
                                "Generation call failed, retrying"
                            );
                            tokio::time::sleep(duration).await;
                        }
                        None => {
                            error!(error = %e, "Backoff exhausted");
                            return Err(e);
                        }
                    }
                }
            }
        }
    }

    /// Make a single chat-completions request.
    async fn make_request(&self, prompt: &str) -> Result<String, ServiceError> {
        #[derive(Serialize)]
        struct ChatRequest {
            model: String,
            messages: Vec<ChatMessage>,
            temperature: f32,
        }

        #[derive(Serialize)]
        struct ChatMessage {
            role: String,
            content: String,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<ChatChoice>,
        }

        #[derive(Deserialize)]
        struct ChatChoice {
            message: ChatMessageResponse,
        }

        #[derive(Deserialize)]
        struct ChatMessageResponse {
            #[serde(default)]
            content: String,
        }

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: 0.7,
        };

        let url = format!("{}/chat/completions", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ServiceError::Api(e.to_string()))?;

        if response.status() == 429 {
            return Err(ServiceError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api(format!("HTTP {}: {}", status, body)));
        }

        let response_body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;

        // Empty content is a valid generation, not an error
        response_body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ServiceError::Parse("No choices in response".to_string()))
    }
}

#[async_trait]
impl Generator for ApiGenerator {
    async fn generate(
        &self,
        template: TemplateName,
        variables: &HashMap<String, String>,
    ) -> Result<String, ServiceError> {
        let prompt = render(template, variables);
        let response = self.call_api(&prompt).await?;
        Ok(response.trim().to_string())
    }
}

/// Record of one mock generation call.
#[derive(Debug, Clone)]
pub struct GenerationCall {
    pub template: TemplateName,
    pub variables: HashMap<String, String>,
}

/// Mock generator for testing.
///
/// Returns the rendered prompt itself, so tests can assert that the digest
/// and query actually reached generation. Records every call.
#[derive(Default)]
pub struct MockGenerator {
    calls: Mutex<Vec<GenerationCall>>,
    fail_with: Option<String>,
}

impl MockGenerator {
    /// Mock that succeeds on every call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock that fails every call with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_with: Some(message.into()),
        }
    }

    /// All calls made so far.
    pub fn calls(&self) -> Vec<GenerationCall> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls mutex poisoned").len()
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(
        &self,
        template: TemplateName,
        variables: &HashMap<String, String>,
    ) -> Result<String, ServiceError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push(GenerationCall {
                template,
                variables: variables.clone(),
            });

        if let Some(message) = &self.fail_with {
            return Err(ServiceError::Api(message.clone()));
        }

        Ok(render(template, variables))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::variables;

    #[test]
    fn test_config_from_settings_requires_key() {
        let settings = GenerationSettings::default();
        assert!(matches!(
            ApiGeneratorConfig::from_settings(&settings),
            Err(ServiceError::Config(_))
        ));

        let with_key = GenerationSettings {
            api_key: Some("test-key".to_string()),
            ..GenerationSettings::default()
        };
        let config = ApiGeneratorConfig::from_settings(&with_key).unwrap();
        assert!(config.base_url.contains("openai"));
        assert_eq!(config.max_retries, 3);
    }

    #[tokio::test]
    async fn test_mock_records_calls() {
        let generator = MockGenerator::new();
        let vars = variables([("query", "hi"), ("search_results", "results here")]);

        let output = generator
            .generate(TemplateName::GeneralSearch, &vars)
            .await
            .unwrap();

        assert!(output.contains("results here"));
        assert_eq!(generator.call_count(), 1);
        assert_eq!(generator.calls()[0].template, TemplateName::GeneralSearch);
    }

    #[tokio::test]
    async fn test_mock_failing() {
        let generator = MockGenerator::failing("upstream down");
        let vars = variables([("query", "hi")]);

        let err = generator
            .generate(TemplateName::Conversational, &vars)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Api(_)));
        // The failed call is still recorded
        assert_eq!(generator.call_count(), 1);
    }
}
