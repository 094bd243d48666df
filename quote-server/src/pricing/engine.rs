//! Pricing Service
//!
//! Composes rule lookup, normalization and calculation.

use shared::models::{
    ActiveLookup, AnswerSet, PriceComputationResult, PriceRequest, RecomputeRequest, RuleLookup,
    RuleRecord,
};

use super::calculator::{compute, is_representable};
use super::normalizer::RuleBody;
use super::{PricingError, PricingResult};
use crate::catalog::RuleCatalog;

#[derive(Clone)]
pub struct PricingService {
    catalog: RuleCatalog,
    default_kind: String,
}

impl PricingService {
    pub fn new(catalog: RuleCatalog, default_kind: impl Into<String>) -> Self {
        Self {
            catalog,
            default_kind: default_kind.into(),
        }
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    /// Locate the rule for a request and price the answers with it
    pub async fn quote(&self, request: &PriceRequest) -> PricingResult<PriceComputationResult> {
        let record = self.lookup(&request.rule).await?;
        self.price_record(&record, &request.answers)
    }

    async fn lookup(&self, rule: &RuleLookup) -> PricingResult<RuleRecord> {
        match rule {
            RuleLookup::Record(lookup) => self.catalog.get(lookup.id).await,
            RuleLookup::Active(ActiveLookup { type_alias, kind }) => {
                if type_alias.trim().is_empty() {
                    return Err(PricingError::Validation(
                        "rule.typeAlias must not be blank".into(),
                    ));
                }
                let kind = kind.as_deref().unwrap_or(&self.default_kind);
                self.catalog.get_active(type_alias, kind).await
            }
        }
    }

    /// Price answers against a specific record
    pub fn price_record(
        &self,
        record: &RuleRecord,
        answers: &AnswerSet,
    ) -> PricingResult<PriceComputationResult> {
        let body = RuleBody::parse(&record.body);
        let Some(base_price) = body.base_price() else {
            tracing::warn!(rule_id = record.id, "Pricing rule has no numeric basePrice");
            return Err(PricingError::InvalidRule {
                rule_id: record.id,
                reason: "basePrice is missing or not a finite number".into(),
            });
        };
        if !is_representable(base_price) || !is_representable(body.min_price()) {
            tracing::warn!(rule_id = record.id, base_price, "Pricing rule price bounds out of range");
            return Err(PricingError::InvalidRule {
                rule_id: record.id,
                reason: "basePrice or minPrice is out of range".into(),
            });
        }

        let model = body.normalize();
        let mut result = compute(&model, record.version, answers);
        result.rule_id = Some(record.id);

        tracing::debug!(
            rule_id = record.id,
            type_alias = %record.type_alias,
            kind = %record.kind,
            version = record.version,
            legacy = body.is_legacy(),
            prelim_price = result.prelim_price,
            "Computed preliminary price"
        );
        Ok(result)
    }

    /// Recompute from an audit snapshot without touching the store
    pub fn recompute(&self, request: &RecomputeRequest) -> PricingResult<PriceComputationResult> {
        let snapshot = &request.rule_snapshot;
        if !is_representable(snapshot.base_price) {
            return Err(PricingError::Validation(
                "ruleSnapshot.basePrice must be a finite number within range".into(),
            ));
        }
        if !is_representable(snapshot.min_price) {
            return Err(PricingError::Validation(
                "ruleSnapshot.minPrice must be a finite number within range".into(),
            ));
        }
        let result = compute(&request.rule_snapshot, request.rule_version, &request.answers);
        tracing::debug!(
            version = request.rule_version,
            prelim_price = result.prelim_price,
            "Recomputed price from snapshot"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TypeKeyResolver;
    use crate::db::{DeviceTypeStore, MemoryStore};
    use serde_json::json;
    use shared::models::{DeviceType, RuleCreate};
    use std::sync::Arc;

    async fn service() -> PricingService {
        let store = MemoryStore::new();
        store
            .insert_device_type(DeviceType {
                id: "t1".into(),
                code: Some("PHONE".into()),
                name: "Teléfonos".into(),
            })
            .await
            .unwrap();
        let resolver = TypeKeyResolver::new(Arc::new(store.clone()));
        let catalog = RuleCatalog::new(Arc::new(store), resolver);
        PricingService::new(catalog, "pricing")
    }

    fn legacy_rule(active: bool) -> RuleCreate {
        RuleCreate {
            type_alias: "PHONE".into(),
            kind: "pricing".into(),
            version: Some(4),
            is_active: Some(active),
            body: json!({
                "basePrice": 500,
                "adjustments": {
                    "pantalla": {"intacta": 0, "quebrada": -150},
                    "almacenamiento_gb": {"perUnit": 2}
                }
            }),
        }
    }

    fn answers() -> AnswerSet {
        AnswerSet::from_iter([
            ("pantalla", json!("quebrada")),
            ("almacenamiento_gb", json!(128)),
        ])
    }

    #[tokio::test]
    async fn test_quote_by_resolved_alias() {
        let service = service().await;
        let record = service.catalog().create(legacy_rule(true)).await.unwrap();

        let request = PriceRequest {
            answers: answers(),
            rule: RuleLookup::Active(ActiveLookup {
                type_alias: "t1".into(),
                kind: None,
            }),
        };
        let result = service.quote(&request).await.unwrap();
        assert_eq!(result.prelim_price, 606);
        assert_eq!(result.rule_version, 4);
        assert_eq!(result.rule_id, Some(record.id));
    }

    #[tokio::test]
    async fn test_quote_by_pinned_record() {
        let service = service().await;
        let record = service.catalog().create(legacy_rule(false)).await.unwrap();
        let request = PriceRequest {
            answers: answers(),
            rule: RuleLookup::record(record.id),
        };
        assert_eq!(service.quote(&request).await.unwrap().prelim_price, 606);
    }

    #[tokio::test]
    async fn test_quote_missing_rule() {
        let service = service().await;
        let request = PriceRequest {
            answers: answers(),
            rule: RuleLookup::active("TABLET", "pricing"),
        };
        assert!(matches!(
            service.quote(&request).await.unwrap_err(),
            PricingError::RuleNotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_invalid_base_price() {
        let service = service().await;
        let mut create = legacy_rule(true);
        create.body = json!({"basePrice": "quinientos", "adjustments": []});
        service.catalog().create(create).await.unwrap();

        let request = PriceRequest {
            answers: answers(),
            rule: RuleLookup::active("PHONE", "pricing"),
        };
        assert!(matches!(
            service.quote(&request).await.unwrap_err(),
            PricingError::InvalidRule { .. }
        ));
    }

    #[tokio::test]
    async fn test_out_of_range_price_bounds_are_invalid() {
        for body in [
            json!({"basePrice": 1e29, "adjustments": []}),
            json!({"basePrice": 100, "minPrice": 1e30, "adjustments": []}),
            json!({"basePrice": 1e19}),
        ] {
            let service = service().await;
            let mut create = legacy_rule(true);
            create.body = body;
            let record = service.catalog().create(create).await.unwrap();

            let err = service
                .price_record(&record, &answers())
                .unwrap_err();
            assert!(
                matches!(err, PricingError::InvalidRule { rule_id, .. } if rule_id == record.id),
                "{}",
                record.body
            );
        }
    }

    #[tokio::test]
    async fn test_large_min_price_within_range_is_honored() {
        let service = service().await;
        let mut create = legacy_rule(true);
        create.body = json!({"basePrice": 100, "minPrice": 1e15, "adjustments": []});
        let record = service.catalog().create(create).await.unwrap();

        let result = service.price_record(&record, &answers()).unwrap();
        assert_eq!(result.prelim_price, 1_000_000_000_000_000);
    }

    #[test]
    fn test_recompute_rejects_out_of_range_snapshot() {
        let store = MemoryStore::new();
        let resolver = TypeKeyResolver::new(Arc::new(store.clone()));
        let service = PricingService::new(RuleCatalog::new(Arc::new(store), resolver), "pricing");

        let base_too_large = RecomputeRequest {
            answers: answers(),
            rule_version: 1,
            rule_snapshot: shared::models::CanonicalComputationModel {
                base_price: 1e29,
                ..Default::default()
            },
        };
        assert!(matches!(
            service.recompute(&base_too_large).unwrap_err(),
            PricingError::Validation(_)
        ));

        let min_too_large = RecomputeRequest {
            answers: answers(),
            rule_version: 1,
            rule_snapshot: shared::models::CanonicalComputationModel {
                base_price: 100.0,
                min_price: 1e30,
                ..Default::default()
            },
        };
        assert!(matches!(
            service.recompute(&min_too_large).unwrap_err(),
            PricingError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_recompute_matches_original() {
        let service = service().await;
        service.catalog().create(legacy_rule(true)).await.unwrap();
        let request = PriceRequest {
            answers: answers(),
            rule: RuleLookup::active("PHONE", "pricing"),
        };
        let original = service.quote(&request).await.unwrap();

        let recomputed = service
            .recompute(&RecomputeRequest {
                answers: answers(),
                rule_version: original.rule_version,
                rule_snapshot: original.rule_snapshot.clone(),
            })
            .unwrap();
        assert_eq!(recomputed.prelim_price, original.prelim_price);
        assert_eq!(recomputed.rule_snapshot, original.rule_snapshot);
        assert_eq!(recomputed.rule_id, None);
    }
}
