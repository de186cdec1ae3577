//! REST endpoints for the gateway

pub mod health;
pub mod history;

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::state::GatewayState;

/// Create all REST routes
pub fn create_rest_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/chat/:hangout_id/messages", get(history::list_messages))
}
