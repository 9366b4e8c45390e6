//! Document-retrieval service client.
//!
//! Used for open-domain institution questions: similarity search over
//! crawled site pages, served by an external retrieval endpoint. The core
//! treats it as an opaque ranked-document source.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use campus_types::RetrievalSettings;

use crate::error::ServiceError;

/// A single retrieved document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedDocument {
    /// Page content chunk
    pub content: String,

    /// Source identifier (URL or page title)
    pub source: String,

    /// Similarity score, higher is better
    pub score: f32,
}

/// Pluggable document retriever.
#[async_trait]
pub trait DocumentRetriever: Send + Sync {
    /// Retrieve up to `top_k` documents for the query, ranked descending
    /// by score.
    async fn retrieve(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievedDocument>, ServiceError>;
}

/// HTTP retriever against the configured retrieval endpoint.
pub struct HttpRetriever {
    client: Client,
    endpoint: String,
}

impl HttpRetriever {
    /// Create a retriever from settings.
    pub fn new(settings: &RetrievalSettings) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ServiceError::Config(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
        })
    }
}

#[derive(Serialize)]
struct RetrieveRequest<'a> {
    query: &'a str,
    top_k: usize,
}

#[derive(Deserialize)]
struct RetrieveResponse {
    #[serde(default)]
    documents: Vec<RetrievedDocument>,
}

#[async_trait]
impl DocumentRetriever for HttpRetriever {
    async fn retrieve(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievedDocument>, ServiceError> {
        debug!(query = query, top_k = top_k, "Retrieving documents");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&RetrieveRequest { query, top_k })
            .send()
            .await
            .map_err(|e| ServiceError::Api(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api(format!("HTTP {}: {}", status, body)));
        }

        let body: RetrieveResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;

        // Enforce the ranking contract locally rather than trusting the
        // service's ordering.
        let mut documents = body.documents;
        documents.sort_by(|a, b| b.score.total_cmp(&a.score));
        documents.truncate(top_k);

        Ok(documents)
    }
}

/// Mock retriever for testing.
#[derive(Default)]
pub struct MockRetriever {
    documents: Vec<RetrievedDocument>,
    fail_with: Option<String>,
}

impl MockRetriever {
    /// Mock returning the given documents.
    pub fn with_documents(documents: Vec<RetrievedDocument>) -> Self {
        Self {
            documents,
            fail_with: None,
        }
    }

    /// Mock returning no documents.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Mock failing every call.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            documents: Vec::new(),
            fail_with: Some(message.into()),
        }
    }
}

#[async_trait]
impl DocumentRetriever for MockRetriever {
    async fn retrieve(
        &self,
        _query: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievedDocument>, ServiceError> {
        if let Some(message) = &self.fail_with {
            return Err(ServiceError::Api(message.clone()));
        }

        let mut documents = self.documents.clone();
        documents.sort_by(|a, b| b.score.total_cmp(&a.score));
        documents.truncate(top_k);
        Ok(documents)
    }
}
