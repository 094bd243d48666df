//! Price Calculator
//!
//! Applies a normalized model to an answer set.
//! Uses rust_decimal for precise calculations, stores as f64/i64.

use rust_decimal::prelude::*;
use serde_json::Value;
use shared::models::{AnswerSet, CanonicalComputationModel, PriceComputationResult};

use super::predicate::evaluate;

/// Convert f64 to Decimal for calculation; non-finite values become zero
#[inline]
fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Whether a price bound survives the conversion to `Decimal` and fits the
/// whole-unit result
pub(crate) fn is_representable(value: f64) -> bool {
    value.is_finite() && value.abs() < i64::MAX as f64 && Decimal::from_f64(value).is_some()
}

/// Round to whole currency units, half away from zero
#[inline]
fn to_whole_units(value: Decimal) -> i64 {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    rounded.to_i64().unwrap_or(if rounded.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

/// Numeric reading of an answer for per-unit terms
///
/// Numbers as-is, numeric strings parsed, booleans as 1/0; anything else is 0.
pub fn numeric_answer(value: Option<&Value>) -> Decimal {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Decimal::from)
            .or_else(|| n.as_f64().and_then(Decimal::from_f64))
            .unwrap_or_default(),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Decimal::ZERO;
            }
            s.parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(to_decimal)
                .unwrap_or_default()
        }
        Some(Value::Bool(true)) => Decimal::ONE,
        _ => Decimal::ZERO,
    }
}

/// Compute the preliminary price for a model
///
/// `price = base + Σ matching adjustments + Σ perUnit × answer`, floored at
/// `minPrice` and at zero. Every matching adjustment counts, in model order.
pub fn compute(
    model: &CanonicalComputationModel,
    rule_version: i64,
    answers: &AnswerSet,
) -> PriceComputationResult {
    let mut price = to_decimal(model.base_price);

    for (index, adjustment) in model.adjustments.iter().enumerate() {
        if !evaluate(&adjustment.condition, answers) {
            tracing::trace!(index, recognized = adjustment.condition.is_recognized(), "Adjustment not applied");
            continue;
        }
        match price.checked_add(to_decimal(adjustment.then)) {
            Some(next) => price = next,
            None => tracing::trace!(index, "Adjustment overflow, skipped"),
        }
    }

    for (field, per_unit) in &model.per_unit {
        let term = to_decimal(*per_unit).checked_mul(numeric_answer(answers.get(field)));
        match term.and_then(|term| price.checked_add(term)) {
            Some(next) => price = next,
            None => tracing::trace!(field = %field, "Per-unit term overflow, skipped"),
        }
    }

    price = price.max(to_decimal(model.min_price));

    PriceComputationResult {
        prelim_price: to_whole_units(price).max(0),
        rule_version,
        rule_snapshot: model.clone(),
        rule_id: None,
    }
}
