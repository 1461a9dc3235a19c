//! Persisted learner data
//!
//! A flat key-value store of JSON strings plus a typed [`Repository`] over it.

pub mod error;
pub mod keys;
pub mod kv;
pub mod repository;

pub use error::StoreError;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use repository::{AVATAR_STYLES, Repository, UserIdentity};
