//! Adjustment predicate model
//!
//! Canonical adjustments carry a tiny condition tree:
//!
//! ```json
//! {"var": "pantalla"}
//! {"==": [{"var": "pantalla"}, "quebrada"]}
//! ```
//!
//! Parsing never fails. Shapes outside the supported set are kept verbatim as
//! [`Predicate::Unrecognized`] so that a stored body serializes back unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Nesting limit for predicate trees; deeper nodes become `Unrecognized`.
pub const MAX_PREDICATE_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Predicate {
    /// `{"var": key}`: answer lookup
    Var(String),
    /// `{"==": [lhs, rhs]}`: deep equality of the resolved operands
    Equals(Box<Predicate>, Box<Predicate>),
    /// Any non-object JSON value
    Literal(Value),
    /// Any other object, kept as stored
    Unrecognized(Value),
}

impl Predicate {
    pub fn var(key: impl Into<String>) -> Self {
        Self::Var(key.into())
    }

    /// `{"==": [{"var": key}, value]}`
    pub fn var_equals(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Equals(
            Box::new(Self::Var(key.into())),
            Box::new(Self::Literal(value.into())),
        )
    }

    pub fn parse(value: &Value) -> Self {
        Self::parse_at(value, 0)
    }

    fn parse_at(value: &Value, depth: usize) -> Self {
        let Value::Object(map) = value else {
            return Self::Literal(value.clone());
        };
        if depth >= MAX_PREDICATE_DEPTH || map.len() != 1 {
            return Self::Unrecognized(value.clone());
        }

        if let Some(Value::String(key)) = map.get("var") {
            return Self::Var(key.clone());
        }
        if let Some(Value::Array(operands)) = map.get("==")
            && let [lhs, rhs] = operands.as_slice()
        {
            return Self::Equals(
                Box::new(Self::parse_at(lhs, depth + 1)),
                Box::new(Self::parse_at(rhs, depth + 1)),
            );
        }

        Self::Unrecognized(value.clone())
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self, Self::Var(_) | Self::Equals(..))
    }
}

impl From<Value> for Predicate {
    fn from(value: Value) -> Self {
        Self::parse(&value)
    }
}

impl From<Predicate> for Value {
    fn from(predicate: Predicate) -> Self {
        match predicate {
            Predicate::Var(key) => {
                let mut map = Map::new();
                map.insert("var".to_string(), Value::String(key));
                Value::Object(map)
            }
            Predicate::Equals(lhs, rhs) => {
                let mut map = Map::new();
                map.insert(
                    "==".to_string(),
                    Value::Array(vec![Value::from(*lhs), Value::from(*rhs)]),
                );
                Value::Object(map)
            }
            Predicate::Literal(value) | Predicate::Unrecognized(value) => value,
        }
    }
}
