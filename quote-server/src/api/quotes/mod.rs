//! Quote Pricing API 模块

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/quotes", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/price", post(handler::price))
        .route("/recompute", post(handler::recompute))
}
