//! Rule Normalizer
//!
//! Stored rule bodies come in two shapes:
//!
//! ```text
//! canonical: {basePrice, minPrice?, adjustments: [{if: <predicate>, then: <delta>}]}
//! legacy:    {basePrice, minPrice?, adjustments: {field: {option: <delta>} | {perUnit: <n>}}}
//! ```
//!
//! Both are folded into one [`CanonicalComputationModel`] here so the
//! evaluator and calculator never branch on the storage shape. Normalizing
//! is total: malformed entries are skipped, never reported.

use serde_json::{Map, Value};
use shared::models::{Adjustment, CanonicalComputationModel, Predicate};

/// A stored rule body, classified by shape
#[derive(Debug, Clone, PartialEq)]
pub enum RuleBody<'a> {
    Canonical {
        base_price: Option<&'a Value>,
        min_price: Option<&'a Value>,
        adjustments: &'a [Value],
    },
    Legacy {
        base_price: Option<&'a Value>,
        min_price: Option<&'a Value>,
        /// Empty when `adjustments` is absent, null or a scalar
        fields: Option<&'a Map<String, Value>>,
    },
}

impl<'a> RuleBody<'a> {
    pub fn parse(body: &'a Value) -> Self {
        let base_price = body.get("basePrice");
        let min_price = body.get("minPrice");
        match body.get("adjustments") {
            Some(Value::Array(adjustments)) => Self::Canonical {
                base_price,
                min_price,
                adjustments,
            },
            Some(Value::Object(fields)) => Self::Legacy {
                base_price,
                min_price,
                fields: Some(fields),
            },
            _ => Self::Legacy {
                base_price,
                min_price,
                fields: None,
            },
        }
    }

    /// basePrice, if it is a finite JSON number
    pub fn base_price(&self) -> Option<f64> {
        let (Self::Canonical { base_price, .. } | Self::Legacy { base_price, .. }) = self;
        base_price.and_then(finite_number)
    }

    /// minPrice, or 0 when missing or not finite
    pub fn min_price(&self) -> f64 {
        let (Self::Canonical { min_price, .. } | Self::Legacy { min_price, .. }) = self;
        min_price.and_then(finite_number).unwrap_or(0.0)
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy { .. })
    }

    pub fn normalize(&self) -> CanonicalComputationModel {
        let mut model = CanonicalComputationModel {
            base_price: self.base_price().unwrap_or(0.0),
            min_price: self.min_price(),
            ..Default::default()
        };

        match self {
            // Per-unit terms only exist in the legacy shape
            Self::Canonical { adjustments, .. } => {
                model.adjustments = adjustments.iter().filter_map(canonical_adjustment).collect();
            }
            Self::Legacy { fields, .. } => {
                if let Some(fields) = fields {
                    for (field, field_def) in fields.iter() {
                        push_legacy_field(&mut model, field, field_def);
                    }
                }
            }
        }
        model
    }
}

/// Normalize a raw stored body
pub fn normalize(body: &Value) -> CanonicalComputationModel {
    RuleBody::parse(body).normalize()
}

fn finite_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|n| n.is_finite())
}

fn canonical_adjustment(entry: &Value) -> Option<Adjustment> {
    let Value::Object(entry) = entry else {
        tracing::trace!(%entry, "Skipping non-object adjustment");
        return None;
    };
    let Some(then) = entry.get("then").and_then(finite_number) else {
        tracing::trace!(?entry, "Skipping adjustment without numeric delta");
        return None;
    };
    let condition = entry
        .get("if")
        .map(Predicate::parse)
        .unwrap_or(Predicate::Unrecognized(Value::Null));
    Some(Adjustment { condition, then })
}

fn push_legacy_field(model: &mut CanonicalComputationModel, field: &str, field_def: &Value) {
    let Value::Object(options) = field_def else {
        tracing::trace!(field, "Skipping non-object legacy field");
        return;
    };

    if let Some(per_unit) = options.get("perUnit").and_then(finite_number) {
        model.per_unit.insert(field.to_string(), per_unit);
        // Neutral entry keeps the field visible in the adjustments list.
        model.adjustments.push(Adjustment {
            condition: Predicate::var(field),
            then: 0.0,
        });
        return;
    }

    for (option, delta) in options {
        let Some(delta) = finite_number(delta) else {
            tracing::trace!(field, option = %option, "Skipping non-numeric option delta");
            continue;
        };
        model.adjustments.push(Adjustment {
            condition: Predicate::var_equals(field, option_literal(option)),
            then: delta,
        });
    }
}

/// Option keys are strings in JSON; "true"/"false" stand for booleans
fn option_literal(option: &str) -> Value {
    match option {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        other => Value::String(other.to_string()),
    }
}
