//! Chat message entity definitions

use serde::{Deserialize, Serialize};

/// One persisted chat message. Append-only: rows are never updated or
/// deleted once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub hangout_id: i64,
    pub user_id: i64,
    pub message_text: String,
    pub created_at: String,
}

/// A message joined with the sender columns needed by history reads and
/// live enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessageWithSender {
    pub id: i64,
    pub hangout_id: i64,
    pub user_id: i64,
    pub message_text: String,
    pub created_at: String,
    pub sender_email: String,
    pub sender_first_name: Option<String>,
    pub sender_photo_url: Option<String>,
}
