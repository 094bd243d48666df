//! Unified error codes for the quote platform
//!
//! This module defines all error codes used by quote-server and its HTTP clients.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 6xxx: Catalog errors (pricing rule records)
//! - 7xxx: Pricing errors (quote computation)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,

    // ==================== 6xxx: Catalog ====================
    /// Pricing rule record not found
    PricingRuleNotFound = 6101,

    // ==================== 7xxx: Pricing ====================
    /// No usable pricing rule is configured for the requested type/kind
    PricingRuleNotConfigured = 7001,

    // ==================== 9xxx: System ====================
    /// Rule store temporarily unavailable
    ServiceUnavailable = 9006,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",

            // Catalog
            ErrorCode::PricingRuleNotFound => "Pricing rule not found",

            // Pricing
            ErrorCode::PricingRuleNotConfigured => "No pricing rule configured",

            // System
            ErrorCode::ServiceUnavailable => "Pricing service temporarily unavailable",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),

            // Catalog
            6101 => Ok(ErrorCode::PricingRuleNotFound),

            // Pricing
            7001 => Ok(ErrorCode::PricingRuleNotConfigured),

            // System
            9006 => Ok(ErrorCode::ServiceUnavailable),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}
