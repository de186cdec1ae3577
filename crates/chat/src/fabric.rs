//! Per-room broadcast fabric.
//!
//! Maps a room key to the set of live session delivery channels. The map is
//! partitioned: the outer lock is held only to look up or create a room
//! entry, so join/leave/publish on different rooms do not contend on each
//! other's room lock. Membership is purely in-memory and starts empty on
//! every process start; sessions re-join on reconnect.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tracing::debug;

use crate::events::OutboundEvent;

/// Room identifier (the hangout id).
pub type RoomKey = i64;

/// Process-unique handle for one live connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

#[derive(Default)]
struct RoomGroup {
    members: HashMap<SessionId, mpsc::UnboundedSender<OutboundEvent>>,
}

/// The broadcast mechanism distributing one published event to every
/// session joined to a room key.
#[derive(Default)]
pub struct RoomFabric {
    next_session: AtomicU64,
    rooms: RwLock<HashMap<RoomKey, Arc<RwLock<RoomGroup>>>>,
}

impl RoomFabric {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a handle for a new connection.
    pub fn next_session_id(&self) -> SessionId {
        SessionId(self.next_session.fetch_add(1, Ordering::Relaxed))
    }

    /// Add a session to a room and hand back its delivery channel.
    ///
    /// Idempotent under duplicate join: re-joining replaces the stored
    /// channel, closing the previous receiver.
    pub async fn join(
        &self,
        room: RoomKey,
        session: SessionId,
    ) -> mpsc::UnboundedReceiver<OutboundEvent> {
        let group = {
            let mut rooms = self.rooms.write().await;
            rooms.entry(room).or_default().clone()
        };

        let (tx, rx) = mpsc::unbounded_channel();
        let mut group = group.write().await;
        group.members.insert(session, tx);

        debug!(room, session = session.0, members = group.members.len(), "session joined room");
        rx
    }

    /// Remove a session from a room. Safe to call for a session that never
    /// joined; an empty room entry is dropped.
    pub async fn leave(&self, room: RoomKey, session: SessionId) {
        let mut rooms = self.rooms.write().await;
        let Some(group) = rooms.get(&room) else {
            return;
        };

        let empty = {
            let mut group = group.write().await;
            group.members.remove(&session);
            group.members.is_empty()
        };

        if empty {
            rooms.remove(&room);
        }

        debug!(room, session = session.0, "session left room");
    }

    /// Deliver an event to every current member of a room, the publisher
    /// included. A closed member channel is pruned, never an error for the
    /// rest. Returns the delivered count.
    pub async fn publish(&self, room: RoomKey, event: &OutboundEvent) -> usize {
        let group = { self.rooms.read().await.get(&room).cloned() };
        let Some(group) = group else {
            return 0;
        };

        let mut group = group.write().await;
        let mut delivered = 0;
        let mut dead = Vec::new();

        for (session, tx) in group.members.iter() {
            if tx.send(event.clone()).is_ok() {
                delivered += 1;
            } else {
                dead.push(*session);
            }
        }

        for session in dead {
            group.members.remove(&session);
        }

        debug!(room, delivered, "published event to room");
        delivered
    }

    /// Current member count of a room.
    pub async fn room_size(&self, room: RoomKey) -> usize {
        match self.rooms.read().await.get(&room) {
            Some(group) => group.read().await.members.len(),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(message: &str) -> OutboundEvent {
        OutboundEvent {
            message: message.to_string(),
            user_id: 1,
            user_name: "alice".to_string(),
            user_photo: None,
            timestamp: "2026-08-05T17:00:00+00:00".to_string(),
        }
    }

    #[tokio::test]
    async fn publish_reaches_all_members_including_publisher() {
        let fabric = RoomFabric::new();
        let a = fabric.next_session_id();
        let b = fabric.next_session_id();

        let mut rx_a = fabric.join(7, a).await;
        let mut rx_b = fabric.join(7, b).await;

        let delivered = fabric.publish(7, &event("hi")).await;
        assert_eq!(delivered, 2);

        assert_eq!(rx_a.recv().await.unwrap().message, "hi");
        assert_eq!(rx_b.recv().await.unwrap().message, "hi");
    }

    #[tokio::test]
    async fn rooms_are_isolated() {
        let fabric = RoomFabric::new();
        let a = fabric.next_session_id();
        let b = fabric.next_session_id();

        let mut rx_a = fabric.join(7, a).await;
        let mut rx_b = fabric.join(8, b).await;

        fabric.publish(7, &event("room seven")).await;

        assert_eq!(rx_a.recv().await.unwrap().message, "room seven");
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn leave_stops_delivery() {
        let fabric = RoomFabric::new();
        let a = fabric.next_session_id();
        let b = fabric.next_session_id();

        let mut rx_a = fabric.join(7, a).await;
        let _rx_b = fabric.join(7, b).await;

        fabric.leave(7, b).await;

        let delivered = fabric.publish(7, &event("after leave")).await;
        assert_eq!(delivered, 1);
        assert_eq!(rx_a.recv().await.unwrap().message, "after leave");
        assert_eq!(fabric.room_size(7).await, 1);
    }

    #[tokio::test]
    async fn leave_without_join_is_a_noop() {
        let fabric = RoomFabric::new();
        let stranger = fabric.next_session_id();

        fabric.leave(7, stranger).await;
        assert_eq!(fabric.room_size(7).await, 0);
    }

    #[tokio::test]
    async fn duplicate_join_replaces_the_channel() {
        let fabric = RoomFabric::new();
        let a = fabric.next_session_id();

        let mut stale_rx = fabric.join(7, a).await;
        let mut fresh_rx = fabric.join(7, a).await;

        assert_eq!(fabric.room_size(7).await, 1);

        fabric.publish(7, &event("once")).await;
        assert_eq!(fresh_rx.recv().await.unwrap().message, "once");
        assert!(stale_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn dropped_receiver_is_pruned_on_publish() {
        let fabric = RoomFabric::new();
        let a = fabric.next_session_id();
        let b = fabric.next_session_id();

        let mut rx_a = fabric.join(7, a).await;
        let rx_b = fabric.join(7, b).await;
        drop(rx_b);

        let delivered = fabric.publish(7, &event("still here")).await;
        assert_eq!(delivered, 1);
        assert_eq!(rx_a.recv().await.unwrap().message, "still here");
        assert_eq!(fabric.room_size(7).await, 1);
    }

    #[tokio::test]
    async fn empty_room_is_removed_after_last_leave() {
        let fabric = RoomFabric::new();
        let a = fabric.next_session_id();

        let _rx = fabric.join(7, a).await;
        fabric.leave(7, a).await;

        assert_eq!(fabric.room_size(7).await, 0);
        assert_eq!(fabric.publish(7, &event("nobody")).await, 0);
    }

    #[tokio::test]
    async fn publish_order_is_preserved_per_member() {
        let fabric = RoomFabric::new();
        let a = fabric.next_session_id();
        let mut rx = fabric.join(7, a).await;

        fabric.publish(7, &event("one")).await;
        fabric.publish(7, &event("two")).await;
        fabric.publish(7, &event("three")).await;

        assert_eq!(rx.recv().await.unwrap().message, "one");
        assert_eq!(rx.recv().await.unwrap().message, "two");
        assert_eq!(rx.recv().await.unwrap().message, "three");
    }
}
