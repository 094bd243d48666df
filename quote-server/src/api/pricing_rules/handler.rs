//! Pricing Rule API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::{ActiveLookup, RuleActivated, RuleCreate, RuleCreated, RuleFilter, RuleRecord};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// GET /api/pricing-rules?typeAlias=&kind= - 规则列表 (最新在前)
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<RuleFilter>,
) -> AppResult<Json<Vec<RuleRecord>>> {
    let rules = state.rules().list(&filter).await?;
    Ok(Json(rules))
}

/// POST /api/pricing-rules - 创建规则版本
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<RuleCreate>,
) -> AppResult<Json<RuleCreated>> {
    let rule = state.rules().create(payload).await?;
    Ok(Json(RuleCreated { id: rule.id }))
}

/// GET /api/pricing-rules/active?typeAlias=&kind= - 当前生效规则
pub async fn get_active(
    State(state): State<ServerState>,
    Query(lookup): Query<ActiveLookup>,
) -> AppResult<Json<RuleRecord>> {
    if lookup.type_alias.trim().is_empty() {
        return Err(AppError::validation("typeAlias must not be blank"));
    }
    let kind = lookup
        .kind
        .unwrap_or_else(|| state.config.default_rule_kind.clone());
    let rule = state.rules().get_active(&lookup.type_alias, &kind).await?;
    Ok(Json(rule))
}

/// GET /api/pricing-rules/:id - 获取单个规则
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<RuleRecord>> {
    let rule = state.rules().get(id).await?;
    Ok(Json(rule))
}

/// POST /api/pricing-rules/:id/activate - 激活规则 (同类其余规则失效)
pub async fn activate(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<RuleActivated>> {
    let rule = state.rules().activate(id).await?;
    Ok(Json(RuleActivated::from(&rule)))
}
