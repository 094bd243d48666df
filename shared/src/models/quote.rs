//! Quote pricing request/response types

use super::answers::AnswerSet;
use super::pricing_rule::CanonicalComputationModel;
use serde::{Deserialize, Serialize};

/// Pin a specific rule record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordLookup {
    pub id: i64,
}

/// Resolve through the active rule for a device type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveLookup {
    pub type_alias: String,
    /// Defaults to the configured rule kind
    #[serde(default)]
    pub kind: Option<String>,
}

/// Locator for the rule a quote is priced with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleLookup {
    Record(RecordLookup),
    Active(ActiveLookup),
}

impl RuleLookup {
    pub fn active(type_alias: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::Active(ActiveLookup {
            type_alias: type_alias.into(),
            kind: Some(kind.into()),
        })
    }

    pub fn record(id: i64) -> Self {
        Self::Record(RecordLookup { id })
    }
}

/// Compute price request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRequest {
    #[serde(default)]
    pub answers: AnswerSet,
    pub rule: RuleLookup,
}

/// Recompute a price from a stored audit snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecomputeRequest {
    #[serde(default)]
    pub answers: AnswerSet,
    pub rule_version: i64,
    pub rule_snapshot: CanonicalComputationModel,
}

/// Computed preliminary price with its audit snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceComputationResult {
    /// Whole currency units, >= 0 and >= minPrice
    pub prelim_price: i64,
    pub rule_version: i64,
    pub rule_snapshot: CanonicalComputationModel,
    /// Record the price was computed from; absent for snapshot recomputation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<i64>,
}
