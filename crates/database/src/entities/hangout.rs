//! Hangout entity definitions

use serde::{Deserialize, Serialize};

/// A coordination event. Its participant set is the authorization source for
/// the event's chat room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hangout {
    pub id: i64,
    pub title: String,
    pub venue_location: String,
    pub date_time: String,
    pub max_group_size: i64,
    pub description: String,
    pub creator_id: i64,
    pub created_at: String,
    pub updated_at: String,
}
