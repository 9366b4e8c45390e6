//! Web search service client.
//!
//! Fully general queries are grounded with a web search before generation.
//! The client returns an explicit Result; what a search failure looks like
//! downstream is the dispatcher's decision, not this client's.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use campus_types::SearchSettings;

use crate::error::ServiceError;

/// Fixed sentence returned when the search backend has nothing for a query.
pub const NO_RESULTS_SENTENCE: &str = "No search results found.";

/// Pluggable web search.
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Search the web and return a text summary of the results.
    async fn search(&self, query: &str) -> Result<String, ServiceError>;
}

/// DuckDuckGo instant-answer search client.
pub struct DuckDuckGoSearch {
    client: Client,
    endpoint: String,
}

impl DuckDuckGoSearch {
    /// Create a search client from settings.
    pub fn new(settings: &SearchSettings) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ServiceError::Config(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct InstantAnswer {
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,

    #[serde(rename = "Answer", default)]
    answer: String,

    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
}

#[derive(Debug, Deserialize)]
struct RelatedTopic {
    #[serde(rename = "Text", default)]
    text: String,
}

/// Flatten an instant-answer payload into a context string.
fn summarize_answer(answer: InstantAnswer) -> String {
    let mut parts: Vec<String> = Vec::new();

    if !answer.answer.trim().is_empty() {
        parts.push(answer.answer.trim().to_string());
    }
    if !answer.abstract_text.trim().is_empty() {
        parts.push(answer.abstract_text.trim().to_string());
    }

    parts.extend(
        answer
            .related_topics
            .into_iter()
            .map(|topic| topic.text.trim().to_string())
            .filter(|text| !text.is_empty())
            .take(5),
    );

    if parts.is_empty() {
        NO_RESULTS_SENTENCE.to_string()
    } else {
        parts.join("\n")
    }
}

#[async_trait]
impl WebSearch for DuckDuckGoSearch {
    async fn search(&self, query: &str) -> Result<String, ServiceError> {
        debug!(query = query, "Searching the web");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("format", "json"), ("no_html", "1")])
            .send()
            .await
            .map_err(|e| ServiceError::Api(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(ServiceError::Api(format!("HTTP {}", status)));
        }

        let answer: InstantAnswer = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;

        Ok(summarize_answer(answer))
    }
}

/// Mock search for testing.
pub struct MockSearch {
    result: Result<String, String>,
}

impl MockSearch {
    /// Mock returning the given text.
    pub fn returning(text: impl Into<String>) -> Self {
        Self {
            result: Ok(text.into()),
        }
    }

    /// Mock failing every call.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            result: Err(message.into()),
        }
    }
}

#[async_trait]
impl WebSearch for MockSearch {
    async fn search(&self, _query: &str) -> Result<String, ServiceError> {
        match &self.result {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(ServiceError::Api(message.clone())),
        }
    }
}
