//! Shared application state for the gateway

use std::sync::Arc;

use pourpal_chat::{ChatService, RoomFabric};
use pourpal_config::AuthConfig;
use pourpal_hangouts::ParticipantGuard;
use pourpal_users::SessionAuthenticator;
use sqlx::SqlitePool;

/// Shared application state containing all services.
///
/// The fabric is constructed here and torn down with the state, so every
/// server (and every test) owns its room membership map.
#[derive(Clone)]
pub struct GatewayState {
    pub pool: SqlitePool,
    /// Name of the cookie carrying the session credential
    pub session_cookie: String,
    pub authenticator: Arc<SessionAuthenticator>,
    pub guard: Arc<ParticipantGuard>,
    pub fabric: Arc<RoomFabric>,
    pub chat_service: Arc<ChatService>,
}

impl GatewayState {
    /// Create a new gateway state with all services initialized
    pub fn new(pool: SqlitePool, auth: &AuthConfig) -> Self {
        let fabric = Arc::new(RoomFabric::new());

        Self {
            authenticator: Arc::new(SessionAuthenticator::new(pool.clone())),
            guard: Arc::new(ParticipantGuard::new(pool.clone())),
            chat_service: Arc::new(ChatService::new(pool.clone(), fabric.clone())),
            session_cookie: auth.session_cookie.clone(),
            fabric,
            pool,
        }
    }
}
