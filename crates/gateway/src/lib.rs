//! # PourPal Gateway Crate
//!
//! The HTTP/WebSocket surface of the chat backend. Routes inbound
//! connections through the session authenticator and participant guard,
//! runs the per-connection chat session, and serves the participant-gated
//! history endpoint.

pub mod error;
pub mod middleware;
pub mod rest;
pub mod state;
pub mod websocket;

pub use error::{GatewayError, GatewayResult};
pub use state::GatewayState;

use axum::{http::Method, middleware as axum_middleware, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(rest::health::health, rest::history::list_messages),
    components(schemas(
        rest::health::HealthResponse,
        rest::history::ChatHistoryEntry,
        error::ErrorBody,
    )),
    tags(
        (name = "health", description = "Service liveness"),
        (name = "chat", description = "Chat history"),
    )
)]
struct ApiDoc;

/// Create the main application router with all routes
pub fn create_router(state: GatewayState) -> Router {
    let arc_state = Arc::new(state);

    Router::new()
        .merge(rest::create_rest_routes().with_state(arc_state.clone()))
        .merge(websocket::create_websocket_routes().with_state(arc_state))
        .route(
            "/api-docs/openapi.json",
            axum::routing::get(|| async { axum::Json(ApiDoc::openapi()) }),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers(Any),
        )
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
}
