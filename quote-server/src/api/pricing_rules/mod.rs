//! Pricing Rule API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/pricing-rules", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/active", get(handler::get_active))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/activate", post(handler::activate))
}
