//! Learning backend integration
//!
//! Request/response types and an async client for the roadmap, quiz,
//! resource, auth and admin endpoints.

pub mod client;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use client::ApiClient;
pub use error::ApiError;
pub use models::{ChapterPayload, ResourceContent};
