//! Predicate Evaluator
//!
//! Total over [`Predicate`]: every input evaluates to a boolean, and
//! anything outside `{var}` / `{"==": [a, b]}` evaluates to false.

use std::borrow::Cow;

use serde_json::Value;
use shared::models::{AnswerSet, MAX_PREDICATE_DEPTH, Predicate};

/// Evaluate a predicate against an answer set
///
/// A top-level literal or unrecognized node is false, as is any tree
/// nested deeper than [`MAX_PREDICATE_DEPTH`].
pub fn evaluate(predicate: &Predicate, answers: &AnswerSet) -> bool {
    match predicate {
        Predicate::Var(_) | Predicate::Equals(..) => resolve(predicate, answers, 0)
            .map(|value| truthy(&value))
            .unwrap_or(false),
        Predicate::Literal(_) | Predicate::Unrecognized(_) => false,
    }
}

/// Resolve a node to a value; `None` once the depth limit is exceeded
fn resolve<'a>(
    predicate: &'a Predicate,
    answers: &'a AnswerSet,
    depth: usize,
) -> Option<Cow<'a, Value>> {
    if depth > MAX_PREDICATE_DEPTH {
        return None;
    }
    let value = match predicate {
        Predicate::Var(key) => answers
            .get(key)
            .map(Cow::Borrowed)
            .unwrap_or(Cow::Owned(Value::Null)),
        Predicate::Literal(value) | Predicate::Unrecognized(value) => Cow::Borrowed(value),
        Predicate::Equals(lhs, rhs) => {
            let lhs = resolve(lhs, answers, depth + 1)?;
            let rhs = resolve(rhs, answers, depth + 1)?;
            Cow::Owned(Value::Bool(deep_equal(&lhs, &rhs)))
        }
    };
    Some(value)
}

/// null, false, 0, NaN and "" are falsy
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Structural equality; numbers compare by value, no cross-type coercion
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_f64() == y.as_f64(),
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| deep_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| deep_equal(x, y)))
        }
        _ => a == b,
    }
}
