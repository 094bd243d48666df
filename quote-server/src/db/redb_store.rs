//! redb-based store backend
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `rules` | rule id | `RuleRecord` (JSON) | Pricing rule records |
//! | `device_types` | `(seq, device type id)` | `DeviceType` (JSON) | Device type catalog, registration order |
//! | `meta` | `"revision"` / `"device_type_seq"` | `u64` | Counters |
//!
//! redb calls are blocking, so every operation runs on the blocking pool
//! via `spawn_blocking`.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use shared::models::{DeviceType, RuleRecord};

use super::store::{find_by_reference, sort_newest_first};
use super::{DeviceTypeStore, RepoError, RepoResult, RuleQuery, RuleStore};

/// key = rule id, value = JSON-serialized RuleRecord
const RULES_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("rules");

/// key = (registration seq, device type id), value = JSON-serialized DeviceType
const DEVICE_TYPES_TABLE: TableDefinition<(u64, &str), &[u8]> =
    TableDefinition::new("device_types");

/// key = counter name, value = u64
const META_TABLE: TableDefinition<&str, u64> = TableDefinition::new("meta");

const REVISION_KEY: &str = "revision";
const DEVICE_TYPE_SEQ_KEY: &str = "device_type_seq";

impl From<redb::DatabaseError> for RepoError {
    fn from(err: redb::DatabaseError) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<redb::TransactionError> for RepoError {
    fn from(err: redb::TransactionError) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<redb::TableError> for RepoError {
    fn from(err: redb::TableError) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<redb::StorageError> for RepoError {
    fn from(err: redb::StorageError) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<redb::CommitError> for RepoError {
    fn from(err: redb::CommitError) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Rule store backed by an embedded redb file
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> RepoResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> RepoResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(RULES_TABLE)?;
            let _ = write_txn.open_table(DEVICE_TYPES_TABLE)?;
            let mut meta = write_txn.open_table(META_TABLE)?;
            if meta.get(REVISION_KEY)?.is_none() {
                meta.insert(REVISION_KEY, 0u64)?;
            }
            if meta.get(DEVICE_TYPE_SEQ_KEY)?.is_none() {
                meta.insert(DEVICE_TYPE_SEQ_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Run a blocking closure against the database on the blocking pool
    async fn blocking<T, F>(&self, f: F) -> RepoResult<T>
    where
        F: FnOnce(&Database) -> RepoResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(|e| RepoError::Unavailable(format!("store task failed: {e}")))?
    }
}

/// Increment and return a named counter (within transaction)
fn increment_counter(txn: &WriteTransaction, key: &str) -> RepoResult<u64> {
    let mut table = txn.open_table(META_TABLE)?;
    let current = table.get(key)?.map(|guard| guard.value()).unwrap_or(0);
    let next = current + 1;
    table.insert(key, next)?;
    Ok(next)
}

fn read_rule(txn: &WriteTransaction, id: i64) -> RepoResult<Option<RuleRecord>> {
    let table = txn.open_table(RULES_TABLE)?;
    let record: Option<RuleRecord> = table
        .get(id)?
        .map(|guard| serde_json::from_slice(guard.value()))
        .transpose()?;
    Ok(record)
}

fn write_rule(txn: &WriteTransaction, record: &RuleRecord) -> RepoResult<()> {
    let bytes = serde_json::to_vec(record)?;
    let mut table = txn.open_table(RULES_TABLE)?;
    table.insert(record.id, bytes.as_slice())?;
    Ok(())
}

fn device_type_exists(txn: &WriteTransaction, id: &str) -> RepoResult<bool> {
    let table = txn.open_table(DEVICE_TYPES_TABLE)?;
    for result in table.iter()? {
        let (key, _value) = result?;
        if key.value().1 == id {
            return Ok(true);
        }
    }
    Ok(false)
}

fn load_device_types(db: &Database) -> RepoResult<Vec<DeviceType>> {
    let read_txn = db.begin_read()?;
    let table = read_txn.open_table(DEVICE_TYPES_TABLE)?;

    let mut types = Vec::new();
    for result in table.iter()? {
        let (_key, value) = result?;
        types.push(serde_json::from_slice(value.value())?);
    }
    Ok(types)
}

#[async_trait]
impl RuleStore for RedbStore {
    async fn insert_rule(&self, mut record: RuleRecord) -> RepoResult<RuleRecord> {
        self.blocking(move |db| {
            let txn = db.begin_write()?;
            if read_rule(&txn, record.id)?.is_some() {
                return Err(RepoError::Duplicate(format!("pricing rule {}", record.id)));
            }
            record.revision = increment_counter(&txn, REVISION_KEY)?;
            write_rule(&txn, &record)?;
            txn.commit()?;
            Ok(record)
        })
        .await
    }

    async fn find_rule(&self, id: i64) -> RepoResult<Option<RuleRecord>> {
        self.blocking(move |db| {
            let read_txn = db.begin_read()?;
            let table = read_txn.open_table(RULES_TABLE)?;
            let record: Option<RuleRecord> = table
                .get(id)?
                .map(|guard| serde_json::from_slice(guard.value()))
                .transpose()?;
            Ok(record)
        })
        .await
    }

    async fn list_rules(&self, query: &RuleQuery) -> RepoResult<Vec<RuleRecord>> {
        let query = query.clone();
        self.blocking(move |db| {
            let read_txn = db.begin_read()?;
            let table = read_txn.open_table(RULES_TABLE)?;

            let mut records = Vec::new();
            for result in table.iter()? {
                let (_key, value) = result?;
                let record: RuleRecord = serde_json::from_slice(value.value())?;
                if query.matches(&record) {
                    records.push(record);
                }
            }

            sort_newest_first(&mut records);
            Ok(records)
        })
        .await
    }

    async fn set_rule_active(&self, id: i64, active: bool) -> RepoResult<RuleRecord> {
        self.blocking(move |db| {
            let txn = db.begin_write()?;
            let mut record = read_rule(&txn, id)?
                .ok_or_else(|| RepoError::NotFound(format!("pricing rule {id}")))?;
            record.is_active = active;
            record.revision = increment_counter(&txn, REVISION_KEY)?;
            write_rule(&txn, &record)?;
            txn.commit()?;
            Ok(record)
        })
        .await
    }

    async fn set_rule_active_if(
        &self,
        id: i64,
        active: bool,
        expected_revision: u64,
    ) -> RepoResult<Option<RuleRecord>> {
        self.blocking(move |db| {
            let txn = db.begin_write()?;
            let mut record = read_rule(&txn, id)?
                .ok_or_else(|| RepoError::NotFound(format!("pricing rule {id}")))?;
            if record.revision != expected_revision {
                txn.abort()?;
                return Ok(None);
            }
            record.is_active = active;
            record.revision = increment_counter(&txn, REVISION_KEY)?;
            write_rule(&txn, &record)?;
            txn.commit()?;
            Ok(Some(record))
        })
        .await
    }
}

#[async_trait]
impl DeviceTypeStore for RedbStore {
    async fn insert_device_type(&self, device_type: DeviceType) -> RepoResult<DeviceType> {
        self.blocking(move |db| {
            let txn = db.begin_write()?;
            if device_type_exists(&txn, &device_type.id)? {
                return Err(RepoError::Duplicate(format!(
                    "device type {}",
                    device_type.id
                )));
            }
            let seq = increment_counter(&txn, DEVICE_TYPE_SEQ_KEY)?;
            {
                let bytes = serde_json::to_vec(&device_type)?;
                let mut table = txn.open_table(DEVICE_TYPES_TABLE)?;
                table.insert((seq, device_type.id.as_str()), bytes.as_slice())?;
            }
            txn.commit()?;
            Ok(device_type)
        })
        .await
    }

    async fn find_device_type(&self, reference: &str) -> RepoResult<Option<DeviceType>> {
        let reference = reference.to_string();
        self.blocking(move |db| {
            let types = load_device_types(db)?;
            Ok(find_by_reference(&types, &reference).cloned())
        })
        .await
    }

    async fn list_device_types(&self) -> RepoResult<Vec<DeviceType>> {
        self.blocking(load_device_types).await
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
            body: json!({"basePrice": 500, "adjustments": []}),
            created_at,
            revision: 0,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = RedbStore::open_in_memory().unwrap();
        let stored = store.insert_rule(record(7, "PHONE", 10)).await.unwrap();
        assert_eq!(stored.revision, 1);

        let found = store.find_rule(7).await.unwrap().unwrap();
        assert_eq!(found, stored);
        assert!(store.find_rule(8).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_body_preserved_verbatim() {
        let store = RedbStore::open_in_memory().unwrap();
        let mut rec = record(1, "PHONE", 10);
        rec.body = json!({"basePrice": 500, "screen": {"cracked": -200}, "extra": [1, 2]});
        store.insert_rule(rec.clone()).await.unwrap();

        let found = store.find_rule(1).await.unwrap().unwrap();
        assert_eq!(found.body, rec.body);
    }

    #[tokio::test]
    async fn test_set_active_bumps_revision() {
        let store = RedbStore::open_in_memory().unwrap();
        store.insert_rule(record(1, "PHONE", 10)).await.unwrap();
        store.insert_rule(record(2, "PHONE", 20)).await.unwrap();

        let activated = store.set_rule_active(1, true).await.unwrap();
        assert!(activated.is_active);
        assert_eq!(activated.revision, 3);

        let err = store.set_rule_active(99, true).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_conditional_flip_checks_revision() {
        let store = RedbStore::open_in_memory().unwrap();
        let stored = store.insert_rule(record(1, "PHONE", 10)).await.unwrap();
        let active = store.set_rule_active(1, true).await.unwrap();

        assert!(
            store
                .set_rule_active_if(1, false, stored.revision)
                .await
                .unwrap()
                .is_none()
        );
        assert!(store.find_rule(1).await.unwrap().unwrap().is_active);

        let applied = store
            .set_rule_active_if(1, false, active.revision)
            .await
            .unwrap()
            .unwrap();
        assert!(!applied.is_active);
        assert_eq!(applied.revision, active.revision + 1);

        let err = store.set_rule_active_if(99, false, 0).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_active_only_newest_first() {
        let store = RedbStore::open_in_memory().unwrap();
        store.insert_rule(record(1, "PHONE", 10)).await.unwrap();
        store.insert_rule(record(2, "PHONE", 20)).await.unwrap();
        store.insert_rule(record(3, "TABLET", 30)).await.unwrap();
        store.set_rule_active(1, true).await.unwrap();
        store.set_rule_active(2, true).await.unwrap();

        let query = RuleQuery::for_aliases(AliasSet::single("PHONE"), "pricing").active_only();
        let ids: Vec<i64> = store
            .list_rules(&query)
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_device_types_keep_registration_order() {
        let store = RedbStore::open_in_memory().unwrap();
        for (id, name) in [("z", "Zeta"), ("a", "Alpha")] {
            store
                .insert_device_type(DeviceType {
                    id: id.into(),
                    code: None,
                    name: name.into(),
                })
                .await
                .unwrap();
        }

        let ids: Vec<String> = store
            .list_device_types()
            .await
            .unwrap()
            .into_iter()
            .map(|dt| dt.id)
            .collect();
        assert_eq!(ids, vec!["z".to_string(), "a".to_string()]);

        let found = store.find_device_type("Alpha").await.unwrap().unwrap();
        assert_eq!(found.id, "a");

        let dup = store
            .insert_device_type(DeviceType {
                id: "a".into(),
                code: None,
                name: "Again".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(dup, RepoError::Duplicate(_)));
    }
}
