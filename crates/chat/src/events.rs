//! Chat wire events and close codes.

use serde::{Deserialize, Serialize};

/// WebSocket close codes used when rejecting or tearing down a connection.
pub mod close_code {
    /// No resolvable session credential.
    pub const UNAUTHENTICATED: u16 = 4001;
    /// Authenticated but not a participant of the room.
    pub const FORBIDDEN: u16 = 4003;
    /// Any internal fault before or after accept.
    pub const INTERNAL_ERROR: u16 = 4000;
}

/// Client events received over the socket.
///
/// A single variant today; keeping it an enum keeps the session loop
/// exhaustive when new variants arrive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InboundEvent {
    Text { message: String },
}

/// A chat message as delivered to every member of a room, the sender
/// included. `timestamp` is byte-identical to the persisted row's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundEvent {
    pub message: String,
    pub user_id: i64,
    pub user_name: String,
    pub user_photo: Option<String>,
    pub timestamp: String,
}
