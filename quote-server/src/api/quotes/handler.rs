//! Quote Pricing API Handlers

use axum::{Json, extract::State};
use shared::models::{PriceComputationResult, PriceRequest, RecomputeRequest};

use crate::core::ServerState;
use crate::utils::AppResult;

/// POST /api/quotes/price - 计算初步报价
pub async fn price(
    State(state): State<ServerState>,
    Json(request): Json<PriceRequest>,
) -> AppResult<Json<PriceComputationResult>> {
    let result = state.pricing.quote(&request).await?;
    Ok(Json(result))
}

/// POST /api/quotes/recompute - 按快照重算 (不访问规则存储)
pub async fn recompute(
    State(state): State<ServerState>,
    Json(request): Json<RecomputeRequest>,
) -> AppResult<Json<PriceComputationResult>> {
    let result = state.pricing.recompute(&request)?;
    Ok(Json(result))
}
