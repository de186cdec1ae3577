//! Message pipeline: persist, enrich, publish.

use std::collections::HashMap;
use std::sync::Arc;

use sqlx::SqlitePool;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use pourpal_database::{ChatMessageWithSender, MessageRepository, StorageError};
use pourpal_users::Identity;

use crate::events::OutboundEvent;
use crate::fabric::{RoomFabric, RoomKey};

/// Errors surfaced by the chat pipeline
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Persists inbound messages and fans them out through the fabric.
///
/// Posting holds a per-room lock across append and publish, so the order
/// events are published in always matches the order rows were persisted in
/// for that room. Persistence success is a precondition for broadcast: an
/// append failure means nothing is published.
pub struct ChatService {
    messages: MessageRepository,
    fabric: Arc<RoomFabric>,
    post_locks: Mutex<HashMap<RoomKey, Arc<Mutex<()>>>>,
}

impl ChatService {
    pub fn new(pool: SqlitePool, fabric: Arc<RoomFabric>) -> Self {
        Self {
            messages: MessageRepository::new(pool),
            fabric,
            post_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn fabric(&self) -> &Arc<RoomFabric> {
        &self.fabric
    }

    /// Persist a message and deliver it to every session in the room.
    ///
    /// The returned event carries the stored row's text and timestamp
    /// verbatim, so live delivery and history never diverge.
    pub async fn post_message(
        &self,
        room: RoomKey,
        identity: &Identity,
        body: &str,
    ) -> Result<OutboundEvent, ChatError> {
        let profile = identity.sender_profile();

        let post_lock = self.room_post_lock(room).await;
        let _guard = post_lock.lock().await;

        let stored = self.messages.append(room, identity.user_id, body).await?;

        let event = OutboundEvent {
            message: stored.message_text,
            user_id: identity.user_id,
            user_name: profile.display_name,
            user_photo: profile.photo_url,
            timestamp: stored.created_at,
        };

        let delivered = self.fabric.publish(room, &event).await;
        debug!(room, message_id = stored.id, delivered, "posted chat message");

        Ok(event)
    }

    /// Full message history for a room, oldest first.
    pub async fn history(&self, room: RoomKey) -> Result<Vec<ChatMessageWithSender>, ChatError> {
        Ok(self.messages.history(room).await?)
    }

    async fn room_post_lock(&self, room: RoomKey) -> Arc<Mutex<()>> {
        let mut locks = self.post_locks.lock().await;
        locks.entry(room).or_default().clone()
    }
}
