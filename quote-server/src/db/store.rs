//! Store traits shared by every backend

use async_trait::async_trait;
use shared::models::{AliasSet, DeviceType, RuleRecord};

use super::RepoResult;

/// Filter for [`RuleStore::list_rules`]
///
/// `aliases: None` matches every type alias.
#[derive(Debug, Clone, Default)]
pub struct RuleQuery {
    pub aliases: Option<AliasSet>,
    pub kind: Option<String>,
    pub active_only: bool,
}

impl RuleQuery {
    /// All records (newest first)
    pub fn all() -> Self {
        Self::default()
    }

    /// Records whose typeAlias is in `aliases` and whose kind equals `kind`
    pub fn for_aliases(aliases: AliasSet, kind: impl Into<String>) -> Self {
        Self {
            aliases: Some(aliases),
            kind: Some(kind.into()),
            active_only: false,
        }
    }

    pub fn active_only(mut self) -> Self {
        self.active_only = true;
        self
    }

    pub fn matches(&self, record: &RuleRecord) -> bool {
        if self.active_only && !record.is_active {
            return false;
        }
        if let Some(kind) = &self.kind
            && record.kind != *kind
        {
            return false;
        }
        match &self.aliases {
            Some(aliases) => aliases.contains(&record.type_alias),
            None => true,
        }
    }
}

/// Order records newest first: createdAt descending, id descending on ties
pub fn sort_newest_first(records: &mut [RuleRecord]) {
    records.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

/// Find a device type by reference: id match first, then code, then name
pub fn find_by_reference<'a>(types: &'a [DeviceType], reference: &str) -> Option<&'a DeviceType> {
    types
        .iter()
        .find(|dt| dt.id == reference)
        .or_else(|| {
            types
                .iter()
                .find(|dt| dt.code.as_deref() == Some(reference))
        })
        .or_else(|| types.iter().find(|dt| dt.name == reference))
}

/// Pricing rule persistence
///
/// Implementations must stamp `revision` from a store-wide monotonic
/// counter on insert and on every `is_active` change, so that the most
/// recent activation is always identifiable.
#[async_trait]
pub trait RuleStore: Send + Sync + 'static {
    /// Persist a new record, returning it with its revision stamped
    async fn insert_rule(&self, record: RuleRecord) -> RepoResult<RuleRecord>;

    async fn find_rule(&self, id: i64) -> RepoResult<Option<RuleRecord>>;

    /// Matching records, newest first
    async fn list_rules(&self, query: &RuleQuery) -> RepoResult<Vec<RuleRecord>>;

    /// Flip `is_active`, returning the updated record
    ///
    /// Fails with `RepoError::NotFound` if no record has this id.
    async fn set_rule_active(&self, id: i64, active: bool) -> RepoResult<RuleRecord>;

    /// Flip `is_active` only if the record still carries `expected_revision`
    ///
    /// Returns `None` without writing when the record changed since it was
    /// read. Fails with `RepoError::NotFound` if no record has this id.
    async fn set_rule_active_if(
        &self,
        id: i64,
        active: bool,
        expected_revision: u64,
    ) -> RepoResult<Option<RuleRecord>>;
}

/// Device type catalog persistence
#[async_trait]
pub trait DeviceTypeStore: Send + Sync + 'static {
    /// Register a new device type; fails with `RepoError::Duplicate` on a taken id
    async fn insert_device_type(&self, device_type: DeviceType) -> RepoResult<DeviceType>;

    /// Look up by id, then code, then name
    async fn find_device_type(&self, reference: &str) -> RepoResult<Option<DeviceType>>;

    /// All device types in registration order
    async fn list_device_types(&self) -> RepoResult<Vec<DeviceType>>;
}
