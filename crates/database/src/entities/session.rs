//! Session entity definitions

use serde::{Deserialize, Serialize};

/// An opaque session credential minted by the login collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub token: String,
    pub user_id: i64,
    pub created_at: String,
    pub expires_at: String,
}

impl Session {
    /// Whether the session has passed its expiry instant.
    pub fn is_expired(&self, now: &chrono::DateTime<chrono::Utc>) -> bool {
        match chrono::DateTime::parse_from_rfc3339(&self.expires_at) {
            Ok(expires) => expires <= *now,
            // Unparseable expiry counts as expired.
            Err(_) => true,
        }
    }
}
