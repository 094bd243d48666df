//! In-memory store backend

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use shared::models::{DeviceType, RuleRecord};

use super::store::{find_by_reference, sort_newest_first};
use super::{DeviceTypeStore, RepoError, RepoResult, RuleQuery, RuleStore};

#[derive(Debug, Default)]
struct Inner {
    rules: HashMap<i64, RuleRecord>,
    device_types: Vec<DeviceType>,
    revision: u64,
}

impl Inner {
    fn next_revision(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }
}

/// Process-local store; clones share the same data
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RuleStore for MemoryStore {
    async fn insert_rule(&self, mut record: RuleRecord) -> RepoResult<RuleRecord> {
        let mut inner = self.inner.write();
        if inner.rules.contains_key(&record.id) {
            return Err(RepoError::Duplicate(format!("pricing rule {}", record.id)));
        }
        record.revision = inner.next_revision();
        inner.rules.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_rule(&self, id: i64) -> RepoResult<Option<RuleRecord>> {
        Ok(self.inner.read().rules.get(&id).cloned())
    }

    async fn list_rules(&self, query: &RuleQuery) -> RepoResult<Vec<RuleRecord>> {
        let mut records: Vec<RuleRecord> = self
            .inner
            .read()
            .rules
            .values()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();
        sort_newest_first(&mut records);
        Ok(records)
    }

    async fn set_rule_active(&self, id: i64, active: bool) -> RepoResult<RuleRecord> {
        let mut inner = self.inner.write();
        if !inner.rules.contains_key(&id) {
            return Err(RepoError::NotFound(format!("pricing rule {id}")));
        }
        let revision = inner.next_revision();
        let record = inner
            .rules
            .get_mut(&id)
            .ok_or_else(|| RepoError::NotFound(format!("pricing rule {id}")))?;
        record.is_active = active;
        record.revision = revision;
        Ok(record.clone())
    }

    async fn set_rule_active_if(
        &self,
        id: i64,
        active: bool,
        expected_revision: u64,
    ) -> RepoResult<Option<RuleRecord>> {
        let mut inner = self.inner.write();
        let current = inner
            .rules
            .get(&id)
            .ok_or_else(|| RepoError::NotFound(format!("pricing rule {id}")))?
            .revision;
        if current != expected_revision {
            return Ok(None);
        }
        let revision = inner.next_revision();
        let Some(record) = inner.rules.get_mut(&id) else {
            return Ok(None);
        };
        record.is_active = active;
        record.revision = revision;
        Ok(Some(record.clone()))
    }
}

#[async_trait]
impl DeviceTypeStore for MemoryStore {
    async fn insert_device_type(&self, device_type: DeviceType) -> RepoResult<DeviceType> {
        let mut inner = self.inner.write();
        if inner.device_types.iter().any(|dt| dt.id == device_type.id) {
            return Err(RepoError::Duplicate(format!(
                "device type {}",
                device_type.id
            )));
        }
        inner.device_types.push(device_type.clone());
        Ok(device_type)
    }

    async fn find_device_type(&self, reference: &str) -> RepoResult<Option<DeviceType>> {
        let inner = self.inner.read();
        Ok(find_by_reference(&inner.device_types, reference).cloned())
    }

    async fn list_device_types(&self) -> RepoResult<Vec<DeviceType>> {
        Ok(self.inner.read().device_types.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::models::AliasSet;

    fn record(id: i64, alias: &str, created_at: i64) -> RuleRecord {
        RuleRecord {
            id,
            type_alias: alias.to_string(),
            kind: "pricing".to_string(),
            version: 1,
            is_active: false,
            body: json!({"basePrice": 100}),
            created_at,
            revision: 0,
        }
    }

    #[tokio::test]
    async fn test_conditional_flip_checks_revision() {
        let store = MemoryStore::new();
        let stored = store.insert_rule(record(1, "PHONE", 10)).await.unwrap();
        let active = store.set_rule_active(1, true).await.unwrap();

        // Revision read before the flip no longer matches.
        let skipped = store.set_rule_active_if(1, false, stored.revision).await.unwrap();
        assert!(skipped.is_none());
        assert!(store.find_rule(1).await.unwrap().unwrap().is_active);

        let applied = store
            .set_rule_active_if(1, false, active.revision)
            .await
            .unwrap()
            .unwrap();
        assert!(!applied.is_active);
        assert!(applied.revision > active.revision);

        let err = store.set_rule_active_if(9, false, 0).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_insert_stamps_increasing_revisions() {
        let store = MemoryStore::new();
        let a = store.insert_rule(record(1, "PHONE", 10)).await.unwrap();
        let b = store.insert_rule(record(2, "PHONE", 20)).await.unwrap();
        assert!(b.revision > a.revision);

        let flipped = store.set_rule_active(1, true).await.unwrap();
        assert!(flipped.is_active);
        assert!(flipped.revision > b.revision);
    }

    #[tokio::test]
    async fn test_duplicate_rule_id_rejected() {
        let store = MemoryStore::new();
        store.insert_rule(record(1, "PHONE", 10)).await.unwrap();
        let err = store.insert_rule(record(1, "PHONE", 10)).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_set_active_unknown_id() {
        let store = MemoryStore::new();
        let err = store.set_rule_active(42, true).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_filters_and_orders() {
        let store = MemoryStore::new();
        store.insert_rule(record(1, "PHONE", 10)).await.unwrap();
        store.insert_rule(record(2, "TABLET", 20)).await.unwrap();
        store.insert_rule(record(3, "PHONE", 30)).await.unwrap();

        let phones = store
            .list_rules(&RuleQuery::for_aliases(AliasSet::single("PHONE"), "pricing"))
            .await
            .unwrap();
        let ids: Vec<i64> = phones.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1]);

        let all = store.list_rules(&RuleQuery::all()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, 3);
    }

    #[tokio::test]
    async fn test_device_types_lookup_and_duplicates() {
        let store = MemoryStore::new();
        let phone = DeviceType {
            id: "t1".into(),
            code: Some("PHONE".into()),
            name: "Smartphone".into(),
        };
        store.insert_device_type(phone.clone()).await.unwrap();

        let err = store.insert_device_type(phone).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));

        let found = store.find_device_type("PHONE").await.unwrap().unwrap();
        assert_eq!(found.id, "t1");
        assert!(store.find_device_type("unknown").await.unwrap().is_none());
        assert_eq!(store.list_device_types().await.unwrap().len(), 1);
    }
}
