//! User entity definitions

use serde::{Deserialize, Serialize};

/// An account row as written by the account collaborator. Read-only for the
/// chat core apart from development seeding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: String,
}
