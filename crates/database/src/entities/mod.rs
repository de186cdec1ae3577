//! Entity definitions for the chat backend's storage layer

pub mod hangout;
pub mod message;
pub mod session;
pub mod user;

pub use hangout::Hangout;
pub use message::{ChatMessage, ChatMessageWithSender};
pub use session::Session;
pub use user::User;
