//! Questionnaire answer set

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// fieldKey -> answer (string, number or boolean) supplied per calculation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<String, Value>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_mixed_answers() {
        let answers: AnswerSet = serde_json::from_value(json!({
            "pantalla": "quebrada",
            "almacenamiento_gb": 128,
            "enciende": true
        }))
        .unwrap();
        assert_eq!(answers.len(), 3);
        assert_eq!(answers.get("pantalla"), Some(&json!("quebrada")));
        assert_eq!(answers.get("enciende"), Some(&json!(true)));
        assert!(answers.get("bateria").is_none());
    }

    #[test]
    fn test_from_iter() {
        let answers: AnswerSet = [("a", json!(1)), ("b", json!("x"))].into_iter().collect();
        assert_eq!(answers.get("a"), Some(&json!(1)));
    }
}
