//! Quote Server - 以旧换新报价规则引擎
//!
//! # 架构概述
//!
//! - **规则目录** (`catalog`): 设备类型、类型别名解析、定价规则版本与激活
//! - **报价计算** (`pricing`): 规则归一化、条件求值、价格计算
//! - **存储** (`db`): redb / 内存后端，带超时装饰器
//! - **HTTP API** (`api`): axum 路由和处理器
//!
//! # 模块结构
//!
//! ```text
//! quote-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── catalog/       # 设备类型、别名解析、规则版本
//! ├── pricing/       # 归一化、谓词求值、计算、错误
//! ├── db/            # 存储 trait 与后端
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志
//! ```

pub mod api;
pub mod catalog;
pub mod core;
pub mod db;
pub mod pricing;
pub mod utils;

// Re-export 公共类型
pub use catalog::{DeviceTypeCatalog, RuleCatalog, TypeKeyResolver};
pub use crate::core::{Config, Server, ServerError, ServerState, StoreBackend};
pub use db::{DeviceTypeStore, MemoryStore, RedbStore, RepoError, RuleStore, TimeoutStore};
pub use pricing::{PricingError, PricingService};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::init_logger;
