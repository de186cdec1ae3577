//! Session credential resolution.
//!
//! The authenticator performs one bounded lookup against the session and
//! user stores and never surfaces an error into the connection handshake:
//! absent, malformed, unknown and expired tokens, as well as storage
//! failures, all resolve to [`AuthOutcome::Anonymous`]. The caller decides
//! what anonymous means for its surface.

use crate::identity::Identity;
use pourpal_database::{SessionRepository, UserRepository};
use sqlx::SqlitePool;
use tracing::{debug, warn};

/// Result of resolving an inbound session credential.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    Authenticated(Identity),
    Anonymous,
}

impl AuthOutcome {
    pub fn identity(self) -> Option<Identity> {
        match self {
            AuthOutcome::Authenticated(identity) => Some(identity),
            AuthOutcome::Anonymous => None,
        }
    }
}

/// Resolves opaque session tokens to identities.
pub struct SessionAuthenticator {
    sessions: SessionRepository,
    users: UserRepository,
}

impl SessionAuthenticator {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            sessions: SessionRepository::new(pool.clone()),
            users: UserRepository::new(pool),
        }
    }

    /// Resolve a credential to an identity, or anonymous.
    pub async fn resolve(&self, token: Option<&str>) -> AuthOutcome {
        let Some(token) = token else {
            return AuthOutcome::Anonymous;
        };

        if token.trim().is_empty() {
            return AuthOutcome::Anonymous;
        }

        let session = match self.sessions.find_by_token(token).await {
            Ok(Some(session)) => session,
            Ok(None) => {
                debug!("session token not found");
                return AuthOutcome::Anonymous;
            }
            Err(error) => {
                warn!(%error, "session lookup failed, treating connection as anonymous");
                return AuthOutcome::Anonymous;
            }
        };

        if session.is_expired(&chrono::Utc::now()) {
            debug!(user_id = session.user_id, "session expired");
            return AuthOutcome::Anonymous;
        }

        match self.users.find_by_id(session.user_id).await {
            Ok(Some(user)) => AuthOutcome::Authenticated(Identity {
                user_id: user.id,
                email: user.email,
                first_name: user.first_name,
                photo_url: user.photo_url,
            }),
            Ok(None) => {
                warn!(user_id = session.user_id, "session references missing user");
                AuthOutcome::Anonymous
            }
            Err(error) => {
                warn!(%error, "user lookup failed, treating connection as anonymous");
                AuthOutcome::Anonymous
            }
        }
    }
}
