//! Device Type API Handlers

use axum::{Json, extract::State};
use shared::models::{DeviceType, DeviceTypeCreate};

use crate::core::ServerState;
use crate::utils::AppResult;

/// GET /api/device-types - 获取所有设备类型
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<DeviceType>>> {
    let device_types = state.device_types.list().await?;
    Ok(Json(device_types))
}

/// POST /api/device-types - 注册设备类型
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DeviceTypeCreate>,
) -> AppResult<Json<DeviceType>> {
    let device_type = state.device_types.register(payload).await?;
    Ok(Json(device_type))
}
