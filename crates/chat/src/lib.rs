//! # PourPal Chat Crate
//!
//! The real-time delivery core: the per-room pub/sub fabric, the chat wire
//! events, and the service that persists a message before fanning it out.

pub mod events;
pub mod fabric;
pub mod service;

pub use events::{close_code, InboundEvent, OutboundEvent};
pub use fabric::{RoomFabric, RoomKey, SessionId};
pub use service::{ChatError, ChatService};
