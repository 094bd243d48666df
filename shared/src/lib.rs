//! Shared types for the trade-in quote platform
//!
//! Domain models (device types, pricing rule records, the canonical
//! computation model, answer sets, quote results), the unified error system
//! and ID/time utilities used by quote-server and its clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
