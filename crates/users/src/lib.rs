//! # PourPal Users Crate
//!
//! Resolves inbound session credentials to identities and derives the
//! sender-facing profile fields (display name, avatar) used by both live
//! chat enrichment and history serialization.

pub mod authenticator;
pub mod identity;

pub use authenticator::{AuthOutcome, SessionAuthenticator};
pub use identity::{Identity, SenderProfile};
