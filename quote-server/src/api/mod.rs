//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`device_types`] - 设备类型目录接口
//! - [`pricing_rules`] - 定价规则版本管理接口
//! - [`quotes`] - 报价计算接口

pub mod device_types;
pub mod health;
pub mod pricing_rules;
pub mod quotes;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Rule bodies and answer sets are small JSON documents
const MAX_BODY_BYTES: usize = 1024 * 1024;

const MAX_IN_FLIGHT_REQUESTS: usize = 256;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Health API - public route
        .merge(health::router())
        // Catalog APIs
        .merge(device_types::router())
        .merge(pricing_rules::router())
        // Pricing API
        .merge(quotes::router())
}

/// Build a fully configured application with middleware and state
///
/// Used by both the HTTP server and oneshot tests
pub fn build_app(state: ServerState) -> Router {
    build_router()
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(ConcurrencyLimitLayer::new(MAX_IN_FLIGHT_REQUESTS))
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Trace - Request tracing
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
