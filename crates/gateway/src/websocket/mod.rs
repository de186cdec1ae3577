//! WebSocket endpoints for the gateway

pub mod chat;

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::state::GatewayState;

/// Create all WebSocket routes
pub fn create_websocket_routes() -> Router<Arc<GatewayState>> {
    Router::new().route("/ws/chat/:hangout_id", get(chat::chat_websocket_handler))
}
