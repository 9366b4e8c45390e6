//! # campus-types
//!
//! Shared domain types for the campus-assist chat core.
//!
//! This crate defines the data structures used throughout the system:
//! - Intents: the closed vocabulary of query categories, plus label
//!   normalization for mapping model labels into it
//! - Records: per-category structured records read from the host system
//! - Chat: request/response types for one dispatch
//! - Settings: layered configuration

pub mod chat;
pub mod config;
pub mod error;
pub mod intent;
pub mod records;

pub use chat::{ChatRequest, ChatResponse};
pub use config::{
    ClassifierSettings, GenerationSettings, RetrievalSettings, SearchSettings, Settings,
    StoreSettings,
};
pub use error::AssistError;
pub use intent::{normalize_label, Intent, ALL_INTENTS};
pub use records::{
    AssignmentRecord, AttendanceRecord, CourseRecord, FeeRecord, MarkRecord, NoticeRecord,
    UserId, UserProfile,
};
