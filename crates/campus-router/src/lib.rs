//! # campus-router
//!
//! Intent routing for the campus-assist chat core.
//!
//! This crate is the "brainstem" between classification and generation: it
//! owns the mapping from each intent to its data fetch, formatter, and
//! prompt template, and it is the only component that talks to every
//! collaborator.
//!
//! ## Core Concepts
//!
//! - **Dispatch**: one `handle_chat` call classifies the query, selects a
//!   branch, and returns generated text plus the resolved intent
//! - **Formatters**: pure per-category record-to-digest transforms
//! - **Error policy**: classification failures degrade to the general path;
//!   collaborator failures during routing surface as structured errors
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use campus_classifier::{CandleClassifier, ConfidencePolicy};
//! use campus_router::ChatService;
//! use campus_types::ChatRequest;
//!
//! let classifier = Arc::new(CandleClassifier::load_default()?);
//! let service = ChatService::new(
//!     classifier,
//!     ConfidencePolicy::default(),
//!     store,
//!     generator,
//!     retriever,
//!     search,
//! );
//!
//! let response = service
//!     .handle_chat(ChatRequest::new(user_id, "What is my attendance?"))
//!     .await?;
//! ```

pub mod dispatcher;
pub mod error;
pub mod format;

pub use dispatcher::{
    ChatService, DEFAULT_RETRIEVAL_TOP_K, NO_DOCUMENTS_SENTENCE, SEARCH_UNAVAILABLE_SENTENCE,
};
pub use error::RouterError;
pub use format::{
    format_assignments, format_attendance, format_courses, format_fees, format_marks,
    format_notices, format_profile,
};
