//! Authenticated identity and sender profile derivation.

use serde::{Deserialize, Serialize};

/// The identity behind one authenticated connection. Immutable for the life
/// of the connection once resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: i64,
    pub email: String,
    pub first_name: Option<String>,
    pub photo_url: Option<String>,
}

/// Display fields attached to every message a sender produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SenderProfile {
    pub display_name: String,
    pub photo_url: Option<String>,
}

impl Identity {
    /// Derive the sender profile: first name when set, otherwise the local
    /// part of the email address.
    pub fn sender_profile(&self) -> SenderProfile {
        SenderProfile {
            display_name: display_name(self.first_name.as_deref(), &self.email),
            photo_url: self.photo_url.clone(),
        }
    }
}

/// First name when present and non-empty, else the email local part.
pub fn display_name(first_name: Option<&str>, email: &str) -> String {
    match first_name {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => email.split('@').next().unwrap_or(email).to_string(),
    }
}
