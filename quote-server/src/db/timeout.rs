//! Deadline decorator for store backends

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use shared::models::{DeviceType, RuleRecord};

use super::{DeviceTypeStore, RepoError, RepoResult, RuleQuery, RuleStore};

/// Wraps a store so that every call fails with [`RepoError::Unavailable`]
/// once `timeout` elapses
#[derive(Debug, Clone)]
pub struct TimeoutStore<S> {
    inner: S,
    timeout: Duration,
}

impl<S> TimeoutStore<S> {
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn deadline<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = RepoResult<T>>,
    ) -> RepoResult<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                let timeout_ms = self.timeout.as_millis() as u64;
                tracing::warn!(operation, timeout_ms, "Rule store call timed out");
                Err(RepoError::Unavailable(format!(
                    "{operation} timed out after {timeout_ms}ms"
                )))
            }
        }
    }
}

#[async_trait]
impl<S: RuleStore> RuleStore for TimeoutStore<S> {
    async fn insert_rule(&self, record: RuleRecord) -> RepoResult<RuleRecord> {
        self.deadline("insert_rule", self.inner.insert_rule(record))
            .await
    }

    async fn find_rule(&self, id: i64) -> RepoResult<Option<RuleRecord>> {
        self.deadline("find_rule", self.inner.find_rule(id)).await
    }

    async fn list_rules(&self, query: &RuleQuery) -> RepoResult<Vec<RuleRecord>> {
        self.deadline("list_rules", self.inner.list_rules(query))
            .await
    }

    async fn set_rule_active(&self, id: i64, active: bool) -> RepoResult<RuleRecord> {
        self.deadline("set_rule_active", self.inner.set_rule_active(id, active))
            .await
    }

    async fn set_rule_active_if(
        &self,
        id: i64,
        active: bool,
        expected_revision: u64,
    ) -> RepoResult<Option<RuleRecord>> {
        self.deadline(
            "set_rule_active_if",
            self.inner.set_rule_active_if(id, active, expected_revision),
        )
        .await
    }
}

#[async_trait]
impl<S: DeviceTypeStore> DeviceTypeStore for TimeoutStore<S> {
    async fn insert_device_type(&self, device_type: DeviceType) -> RepoResult<DeviceType> {
        self.deadline(
            "insert_device_type",
            self.inner.insert_device_type(device_type),
        )
        .await
    }

    async fn find_device_type(&self, reference: &str) -> RepoResult<Option<DeviceType>> {
        self.deadline("find_device_type", self.inner.find_device_type(reference))
            .await
    }

    async fn list_device_types(&self) -> RepoResult<Vec<DeviceType>> {
        self.deadline("list_device_types", self.inner.list_device_types())
            .await
    }
}
