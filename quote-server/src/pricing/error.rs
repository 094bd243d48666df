//! Catalog and pricing error taxonomy
//!
//! Only structural failures surface here. Malformed adjustments and
//! predicates are absorbed by the normalizer and evaluator and never reach
//! the caller.

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use crate::db::RepoError;

#[derive(Debug, Error)]
pub enum PricingError {
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// No active-or-fallback record for (type, kind)
    #[error("No pricing rule for type '{type_alias}' and kind '{kind}'")]
    RuleNotFound { type_alias: String, kind: String },

    #[error("Pricing rule {id} not found")]
    RecordNotFound { id: i64 },

    /// The record exists but has no usable basePrice
    #[error("Pricing rule {rule_id} is invalid: {reason}")]
    InvalidRule { rule_id: i64, reason: String },

    /// Store unreachable or timed out; callers may retry
    #[error("Rule store unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

pub type PricingResult<T> = Result<T, PricingError>;

impl From<RepoError> for PricingError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(resource) => PricingError::NotFound { resource },
            RepoError::Duplicate(msg) => PricingError::Conflict(msg),
            RepoError::Validation(msg) => PricingError::Validation(msg),
            RepoError::Unavailable(msg) | RepoError::Database(msg) => {
                PricingError::UpstreamUnavailable(msg)
            }
            RepoError::Serialization(e) => PricingError::UpstreamUnavailable(e.to_string()),
        }
    }
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        let message = err.to_string();
        match err {
            PricingError::NotFound { resource } => AppError::not_found(resource),
            PricingError::RuleNotFound { type_alias, kind } => {
                AppError::rule_not_configured(message, "rule_not_found")
                    .with_detail("typeAlias", type_alias)
                    .with_detail("kind", kind)
            }
            PricingError::RecordNotFound { id } => {
                AppError::with_message(ErrorCode::PricingRuleNotFound, message)
                    .with_detail("id", id)
            }
            PricingError::InvalidRule { rule_id, .. } => {
                AppError::rule_not_configured(message, "invalid_rule").with_detail("ruleId", rule_id)
            }
            PricingError::UpstreamUnavailable(_) => AppError::unavailable(message),
            PricingError::Validation(msg) => AppError::validation(msg),
            PricingError::Conflict(msg) => AppError::already_exists(msg),
        }
    }
}
