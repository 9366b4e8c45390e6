//! Chat request and response types.

use serde::{Deserialize, Serialize};

use crate::intent::Intent;
use crate::records::UserId;

/// A single chat turn submitted by a caller.
///
/// Owned by the caller for the duration of one dispatch; the core never
/// retains it across requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Identity of the calling user (resolved by the host system)
    pub caller_id: UserId,

    /// Raw query text as typed by the user
    pub query: String,
}

impl ChatRequest {
    /// Create a new request.
    pub fn new(caller_id: UserId, query: impl Into<String>) -> Self {
        Self {
            caller_id,
            query: query.into(),
        }
    }
}

/// The dispatcher's answer to one chat turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated natural-language answer
    pub response_text: String,

    /// Intent the query was ultimately routed as
    pub resolved_intent: Intent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_construction() {
        let request = ChatRequest::new(42, "What is my attendance?");
        assert_eq!(request.caller_id, 42);
        assert_eq!(request.query, "What is my attendance?");
    }

    #[test]
    fn test_response_serialization() {
        let response = ChatResponse {
            response_text: "All good.".to_string(),
            resolved_intent: Intent::Attendance,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"attendance\""));
    }
}
