//! Pricing Rule Model

use super::predicate::Predicate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Default rule kind for trade-in price rules
pub const KIND_PRICING: &str = "pricing";

/// Stored pricing rule document (定价规则版本)
///
/// Created once; only `is_active` (and the store-stamped `revision`) ever change.
/// Corrections are new versions, not edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleRecord {
    pub id: i64,
    /// Device type id, code or name, as written by the rule author
    pub type_alias: String,
    /// Free-form partition tag, e.g. "pricing"
    pub kind: String,
    /// Informational version number (>= 1)
    pub version: i64,
    pub is_active: bool,
    /// Raw rule body; canonical or legacy shape
    pub body: Value,
    /// Unix millis
    pub created_at: i64,
    /// Store write stamp, bumped on insert and on every activation flip
    #[serde(default)]
    pub revision: u64,
}

/// Create pricing rule payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCreate {
    pub type_alias: String,
    pub kind: String,
    #[serde(default)]
    pub version: Option<i64>,
    #[serde(default)]
    pub is_active: Option<bool>,
    pub body: Value,
}

/// List filter; both fields optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleFilter {
    #[serde(default)]
    pub type_alias: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
}

/// Response to a successful create
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleCreated {
    pub id: i64,
}

/// Response to a successful activation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleActivated {
    pub id: i64,
    pub type_alias: String,
    pub kind: String,
    pub is_active: bool,
}

impl From<&RuleRecord> for RuleActivated {
    fn from(record: &RuleRecord) -> Self {
        Self {
            id: record.id,
            type_alias: record.type_alias.clone(),
            kind: record.kind.clone(),
            is_active: record.is_active,
        }
    }
}

/// One conditional price delta
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    #[serde(rename = "if")]
    pub condition: Predicate,
    pub then: f64,
}

/// Normalized, storage-shape independent rule representation
///
/// Never persisted as a rule record; it travels as the audit snapshot of a
/// computed price and is enough to recompute that price.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalComputationModel {
    pub base_price: f64,
    #[serde(default)]
    pub min_price: f64,
    #[serde(default)]
    pub adjustments: Vec<Adjustment>,
    /// fieldKey -> price delta per unit of the numeric answer
    #[serde(default)]
    pub per_unit: BTreeMap<String, f64>,
}
