//! Type Key Resolver
//!
//! Expands a type reference (opaque id, short code or display name) into
//! the set of aliases a rule may have been stored under.

use std::sync::Arc;

use shared::models::AliasSet;

use crate::db::DeviceTypeStore;

#[derive(Clone)]
pub struct TypeKeyResolver {
    store: Arc<dyn DeviceTypeStore>,
}

impl TypeKeyResolver {
    pub fn new(store: Arc<dyn DeviceTypeStore>) -> Self {
        Self { store }
    }

    /// Resolve a reference to its alias set. Never fails.
    ///
    /// A known device type yields its non-blank id/code/name plus the
    /// reference itself; an unknown reference (or an unreachable store)
    /// yields `{reference}`.
    pub async fn resolve(&self, reference: &str) -> AliasSet {
        match self.store.find_device_type(reference).await {
            Ok(Some(device_type)) => {
                let aliases = AliasSet::for_device_type(&device_type, reference);
                tracing::trace!(
                    reference,
                    device_type_id = %device_type.id,
                    aliases = aliases.len(),
                    "Resolved type reference"
                );
                aliases
            }
            Ok(None) => AliasSet::single(reference),
            Err(e) => {
                tracing::warn!(reference, error = %e, "Device type lookup failed, using exact match");
                AliasSet::single(reference)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, RepoError, RepoResult};
    use async_trait::async_trait;
    use shared::models::DeviceType;

    struct BrokenStore;

    #[async_trait]
    impl DeviceTypeStore for BrokenStore {
        async fn insert_device_type(&self, _device_type: DeviceType) -> RepoResult<DeviceType> {
            Err(RepoError::Unavailable("down".into()))
        }

        async fn find_device_type(&self, _reference: &str) -> RepoResult<Option<DeviceType>> {
            Err(RepoError::Unavailable("down".into()))
        }

        async fn list_device_types(&self) -> RepoResult<Vec<DeviceType>> {
            Err(RepoError::Unavailable("down".into()))
        }
    }

    async fn resolver_with_phone() -> TypeKeyResolver {
        let store = MemoryStore::new();
        store
            .insert_device_type(DeviceType {
                id: "t1".into(),
                code: Some("PHONE".into()),
                name: "Teléfonos".into(),
            })
            .await
            .unwrap();
        TypeKeyResolver::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_resolve_by_id_includes_all_aliases() {
        let resolver = resolver_with_phone().await;
        let aliases = resolver.resolve("t1").await;
        assert!(aliases.contains("t1"));
        assert!(aliases.contains("PHONE"));
        assert!(aliases.contains("Teléfonos"));
        assert_eq!(aliases.len(), 3);
    }

    #[tokio::test]
    async fn test_resolve_by_name() {
        let resolver = resolver_with_phone().await;
        let aliases = resolver.resolve("Teléfonos").await;
        assert!(aliases.contains("PHONE"));
    }

    #[tokio::test]
    async fn test_unknown_reference_is_exact() {
        let resolver = resolver_with_phone().await;
        let aliases = resolver.resolve("phone").await;
        assert_eq!(aliases, AliasSet::single("phone"));
    }

    #[tokio::test]
    async fn test_blank_code_not_added() {
        let store = MemoryStore::new();
        store
            .insert_device_type(DeviceType {
                id: "t2".into(),
                code: Some("  ".into()),
                name: "Tablet".into(),
            })
            .await
            .unwrap();
        let resolver = TypeKeyResolver::new(Arc::new(store));
        let aliases = resolver.resolve("t2").await;
        assert_eq!(aliases.len(), 2);
    }

    #[tokio::test]
    async fn test_store_failure_degrades_to_exact_match() {
        let resolver = TypeKeyResolver::new(Arc::new(BrokenStore));
        let aliases = resolver.resolve("t1").await;
        assert_eq!(aliases, AliasSet::single("t1"));
    }
}
