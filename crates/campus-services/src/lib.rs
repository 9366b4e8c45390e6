//! # campus-services
//!
//! External collaborator clients for the campus-assist chat core.
//!
//! The dispatcher consumes four services, each behind a trait with an HTTP
//! implementation and a mock:
//!
//! - [`Generator`]: text generation from a prompt template plus variables
//! - [`DocumentRetriever`]: ranked document retrieval for institution
//!   questions
//! - [`WebSearch`]: web search for fully general questions
//! - [`RecordStore`]: per-category reads from the host record system
//!
//! All clients return explicit `Result`s; fallback decisions belong to the
//! dispatcher, not to the transport layer.

pub mod error;
pub mod generate;
pub mod retrieve;
pub mod search;
pub mod store;
pub mod templates;

pub use error::ServiceError;
pub use generate::{ApiGenerator, ApiGeneratorConfig, GenerationCall, Generator, MockGenerator};
pub use retrieve::{DocumentRetriever, HttpRetriever, MockRetriever, RetrievedDocument};
pub use search::{DuckDuckGoSearch, MockSearch, WebSearch, NO_RESULTS_SENTENCE};
pub use store::{HttpRecordStore, MockRecordStore, RecordStore};
pub use templates::{render, variables, TemplateName};
