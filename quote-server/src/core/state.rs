use std::sync::Arc;

use crate::catalog::{DeviceTypeCatalog, RuleCatalog, TypeKeyResolver};
use crate::core::config::StoreBackend;
use crate::core::{Config, Result, ServerError};
use crate::db::{DeviceTypeStore, MemoryStore, RedbStore, RuleStore, TimeoutStore};
use crate::pricing::PricingService;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，每个请求 clone 一份。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | device_types | DeviceTypeCatalog | 设备类型目录 |
/// | pricing | PricingService | 规则目录 + 报价计算 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub device_types: DeviceTypeCatalog,
    pub pricing: PricingService,
}

impl ServerState {
    /// 手动构造 (存储句柄由调用方按需包装超时)
    pub fn new(
        config: Config,
        rules: Arc<dyn RuleStore>,
        device_types: Arc<dyn DeviceTypeStore>,
    ) -> Self {
        let resolver = TypeKeyResolver::new(device_types.clone());
        let catalog = RuleCatalog::new(rules, resolver);
        let pricing = PricingService::new(catalog, config.default_rule_kind.clone());
        Self {
            device_types: DeviceTypeCatalog::new(device_types),
            pricing,
            config,
        }
    }

    /// Build state over a store, applying the configured per-call deadline
    pub fn with_store<S>(config: Config, store: S) -> Self
    where
        S: RuleStore + DeviceTypeStore,
    {
        let store = Arc::new(TimeoutStore::new(store, config.store_timeout()));
        Self::new(config, store.clone(), store)
    }

    /// 初始化服务器状态
    ///
    /// Opens the configured backend; redb creates `DATA_DIR` if missing.
    pub fn initialize(config: &Config) -> Result<Self> {
        match config.store_backend {
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory rule store, data is lost on restart");
                Ok(Self::with_store(config.clone(), MemoryStore::new()))
            }
            StoreBackend::Redb => {
                if config.data_dir.trim().is_empty() {
                    return Err(ServerError::Config("DATA_DIR must not be empty".into()));
                }
                std::fs::create_dir_all(&config.data_dir)?;
                let path = config.db_path();
                let store = RedbStore::open(&path)?;
                tracing::info!(path = %path.display(), "Rule store opened");
                Ok(Self::with_store(config.clone(), store))
            }
        }
    }

    pub fn rules(&self) -> &RuleCatalog {
        self.pricing.catalog()
    }
}
