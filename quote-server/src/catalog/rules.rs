//! Rule Record Catalog
//!
//! Creates, lists and activates pricing rule records, and keeps at most one
//! record active per (type alias set, kind).
//!
//! The store only offers per-document atomicity, so activation is two steps:
//! flip the target on (which stamps a fresh revision), then *settle* the
//! siblings. Settling keeps the active record with the highest revision and
//! switches the rest off, each only if it still carries the revision settle
//! read, so a stale settle never undoes a later activation. The catalog
//! converges to exactly one active record (last write wins), although a
//! reader can briefly observe two active siblings.

use std::sync::Arc;

use serde_json::Value;
use shared::models::{AliasSet, RuleCreate, RuleFilter, RuleRecord};
use shared::util::{now_millis, snowflake_id};

use super::TypeKeyResolver;
use crate::db::{RuleQuery, RuleStore};
use crate::pricing::{PricingError, PricingResult};

const DEFAULT_VERSION: i64 = 1;

#[derive(Clone)]
pub struct RuleCatalog {
    store: Arc<dyn RuleStore>,
    resolver: TypeKeyResolver,
}

impl RuleCatalog {
    pub fn new(store: Arc<dyn RuleStore>, resolver: TypeKeyResolver) -> Self {
        Self { store, resolver }
    }

    /// List records, newest first
    ///
    /// `typeAlias` filters by exact stored alias; use [`Self::get_active`]
    /// for alias-resolved lookups.
    pub async fn list(&self, filter: &RuleFilter) -> PricingResult<Vec<RuleRecord>> {
        let query = RuleQuery {
            aliases: filter.type_alias.clone().map(AliasSet::single),
            kind: filter.kind.clone(),
            active_only: false,
        };
        Ok(self.store.list_rules(&query).await?)
    }

    /// Get a single record by id
    pub async fn get(&self, id: i64) -> PricingResult<RuleRecord> {
        self.store
            .find_rule(id)
            .await?
            .ok_or(PricingError::RecordNotFound { id })
    }

    /// Create a record; an active record takes over from its active siblings
    pub async fn create(&self, data: RuleCreate) -> PricingResult<RuleRecord> {
        let record = validate_create(data)?;
        let created = self.store.insert_rule(record).await?;

        tracing::info!(
            rule_id = created.id,
            type_alias = %created.type_alias,
            kind = %created.kind,
            version = created.version,
            is_active = created.is_active,
            "Pricing rule created"
        );

        if created.is_active {
            let aliases = self.resolver.resolve(&created.type_alias).await;
            self.settle(&aliases, &created.kind).await?;
        }
        Ok(created)
    }

    /// Activate a record and deactivate its siblings
    ///
    /// Returns the record as stored after settling.
    pub async fn activate(&self, id: i64) -> PricingResult<RuleRecord> {
        let target = self.get(id).await?;
        self.store.set_rule_active(target.id, true).await?;

        let aliases = self.resolver.resolve(&target.type_alias).await;
        self.settle(&aliases, &target.kind).await?;

        let updated = self.get(id).await?;
        tracing::info!(
            rule_id = updated.id,
            type_alias = %updated.type_alias,
            kind = %updated.kind,
            is_active = updated.is_active,
            "Pricing rule activated"
        );
        Ok(updated)
    }

    /// Resolve `type_alias` and return the record in effect for it
    pub async fn get_active(&self, type_alias: &str, kind: &str) -> PricingResult<RuleRecord> {
        let aliases = self.resolver.resolve(type_alias).await;
        self.get_active_by_aliases(&aliases, kind)
            .await?
            .ok_or_else(|| PricingError::RuleNotFound {
                type_alias: type_alias.to_string(),
                kind: kind.to_string(),
            })
    }

    /// Record in effect for an alias set: the active one, else the newest
    ///
    /// If more than one is active (mid-activation), the last one written wins.
    pub async fn get_active_by_aliases(
        &self,
        aliases: &AliasSet,
        kind: &str,
    ) -> PricingResult<Option<RuleRecord>> {
        let records = self
            .store
            .list_rules(&RuleQuery::for_aliases(aliases.clone(), kind))
            .await?;

        let active = records
            .iter()
            .filter(|r| r.is_active)
            .max_by_key(|r| r.revision)
            .cloned();
        if active.is_some() {
            return Ok(active);
        }

        let fallback = records.into_iter().next();
        if let Some(record) = &fallback {
            tracing::debug!(
                rule_id = record.id,
                kind,
                "No active pricing rule, falling back to newest"
            );
        }
        Ok(fallback)
    }

    /// Deactivate every active sibling except the last one written
    async fn settle(&self, aliases: &AliasSet, kind: &str) -> PricingResult<()> {
        let active = self
            .store
            .list_rules(&RuleQuery::for_aliases(aliases.clone(), kind).active_only())
            .await?;
        self.deactivate_losers(&active, kind).await
    }

    /// Switch off every record in `active` but the highest revision
    ///
    /// Records rewritten since `active` was read are left alone.
    async fn deactivate_losers(&self, active: &[RuleRecord], kind: &str) -> PricingResult<()> {
        if active.len() <= 1 {
            return Ok(());
        }
        let Some((_, winner)) = active.iter().map(|r| (r.revision, r.id)).max() else {
            return Ok(());
        };

        for record in active.iter().filter(|r| r.id != winner) {
            match self
                .store
                .set_rule_active_if(record.id, false, record.revision)
                .await?
            {
                Some(_) => {
                    tracing::debug!(rule_id = record.id, winner, kind, "Deactivated sibling rule")
                }
                None => tracing::debug!(
                    rule_id = record.id,
                    winner,
                    kind,
                    "Sibling rule changed since read, left as is"
                ),
            }
        }
        Ok(())
    }
}

fn validate_create(data: RuleCreate) -> PricingResult<RuleRecord> {
    let type_alias = data.type_alias.trim();
    if type_alias.is_empty() {
        return Err(PricingError::Validation("typeAlias must not be blank".into()));
    }
    let kind = data.kind.trim();
    if kind.is_empty() {
        return Err(PricingError::Validation("kind must not be blank".into()));
    }
    let version = data.version.unwrap_or(DEFAULT_VERSION);
    if version < 1 {
        return Err(PricingError::Validation(format!(
            "version must be >= 1, got {version}"
        )));
    }
    if !matches!(data.body, Value::Object(_)) {
        return Err(PricingError::Validation("body must be a JSON object".into()));
    }

    Ok(RuleRecord {
        id: snowflake_id(),
        type_alias: type_alias.to_string(),
        kind: kind.to_string(),
        version,
        is_active: data.is_active.unwrap_or(false),
        body: data.body,
        created_at: now_millis(),
        revision: 0,
    })
}
