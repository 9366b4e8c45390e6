//! Dispatch error taxonomy.

use thiserror::Error;

use campus_services::ServiceError;

/// Errors surfaced by the dispatcher.
///
/// Classification failures never appear here: they degrade to the general
/// intent inside the confidence policy. What does surface is caller error
/// (empty query) and collaborator failure during routing, so upstream
/// retry/backoff logic can act on it.
#[derive(Debug, Error)]
pub enum RouterError {
    /// The raw query was empty or whitespace-only
    #[error("Query must not be empty")]
    EmptyQuery,

    /// Record store failure while fetching the intent's records
    #[error("Record store failure: {0}")]
    Store(#[source] ServiceError),

    /// Document retrieval failure on the college-info path
    #[error("Document retrieval failure: {0}")]
    Retrieval(#[source] ServiceError),

    /// Generation service failure
    #[error("Generation failure: {0}")]
    Generation(#[source] ServiceError),
}
