//! Device Type Model

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Catalog device type (手机、平板、笔记本...)
///
/// A stored rule may reference its device type by any of `id`, `code` or
/// `name`; these are the type's aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceType {
    pub id: String,
    /// Short code, e.g. "PHONE"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Display name, e.g. "Teléfonos"
    pub name: String,
}

impl DeviceType {
    /// Non-blank aliases of this type, in id/code/name order
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        [Some(self.id.as_str()), self.code.as_deref(), Some(self.name.as_str())]
            .into_iter()
            .flatten()
            .filter(|alias| !alias.trim().is_empty())
    }
}

/// Register device type payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceTypeCreate {
    /// Assigned by the catalog when absent
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
}

/// The interchangeable identifiers a type reference expands to.
///
/// Never empty: an unresolvable reference still yields `{reference}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasSet(BTreeSet<String>);

impl AliasSet {
    /// Alias set for a reference that matched no known device type
    pub fn single(reference: impl Into<String>) -> Self {
        Self(BTreeSet::from([reference.into()]))
    }

    /// Alias set for a resolved device type, always including the original reference
    pub fn for_device_type(device_type: &DeviceType, reference: &str) -> Self {
        let mut set: BTreeSet<String> = device_type.aliases().map(str::to_string).collect();
        set.insert(reference.to_string());
        Self(set)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.0.contains(alias)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone() -> DeviceType {
        DeviceType {
            id: "t1".to_string(),
            code: Some("PHONE".to_string()),
            name: "Teléfonos".to_string(),
        }
    }

    #[test]
    fn test_aliases_skip_blank_code() {
        let dt = DeviceType {
            id: "t2".to_string(),
            code: Some("  ".to_string()),
            name: "Tablets".to_string(),
        };
        assert_eq!(dt.aliases().collect::<Vec<_>>(), vec!["t2", "Tablets"]);
    }

    #[test]
    fn test_alias_set_includes_reference_and_all_aliases() {
        let set = AliasSet::for_device_type(&phone(), "t1");
        assert_eq!(set.len(), 3);
        assert!(set.contains("t1"));
        assert!(set.contains("PHONE"));
        assert!(set.contains("Teléfonos"));
    }

    #[test]
    fn test_single_alias_set() {
        let set = AliasSet::single("unknown-type");
        assert_eq!(set.len(), 1);
        assert!(set.contains("unknown-type"));
        assert!(!set.is_empty());
    }

    #[test]
    fn test_serde_camel_case_without_code() {
        let dt = DeviceType {
            id: "t3".to_string(),
            code: None,
            name: "Laptops".to_string(),
        };
        let json = serde_json::to_value(&dt).unwrap();
        assert_eq!(json, serde_json::json!({"id": "t3", "name": "Laptops"}));
    }
}
