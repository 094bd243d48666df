//! Rule Store Module
//!
//! Persistence boundary for pricing rule records and device types.
//! The catalog and pricing layers only see the [`RuleStore`] and
//! [`DeviceTypeStore`] traits; the backends are:
//!
//! | Backend | Type | Use |
//! |---------|------|-----|
//! | memory | [`MemoryStore`] | tests, ephemeral deployments |
//! | redb | [`RedbStore`] | embedded persistent storage |
//!
//! Any backend can be wrapped in [`TimeoutStore`] so that a hung call
//! surfaces as [`RepoError::Unavailable`] instead of blocking a quote.

pub mod memory;
pub mod redb_store;
pub mod store;
pub mod timeout;

pub use memory::MemoryStore;
pub use redb_store::RedbStore;
pub use store::{DeviceTypeStore, RuleQuery, RuleStore};
pub use timeout::TimeoutStore;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Transient failure: timeout, worker gone, backend unreachable
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
