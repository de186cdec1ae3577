//! Repository implementations for data access

pub mod hangout_repository;
pub mod message_repository;
pub mod session_repository;
pub mod user_repository;

pub use hangout_repository::HangoutRepository;
pub use message_repository::MessageRepository;
pub use session_repository::SessionRepository;
pub use user_repository::UserRepository;
