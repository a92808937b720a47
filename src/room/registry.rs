use chrono::{Duration, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use super::models::{ClientSession, Outbox, Room};
use crate::game::{Dealer, DEFAULT_MAX_DEAL_ATTEMPTS};
use crate::shared::AppError;

/// Process-wide mapping from room id to room.
///
/// Every operation, including command dispatch through [`RoomRegistry::with_room`],
/// runs under one exclusive lock, so room state is linearizable across all rooms.
pub struct RoomRegistry {
    rooms: Mutex<HashMap<String, Room>>,
    max_deal_attempts: usize,
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEAL_ATTEMPTS)
    }
}

impl RoomRegistry {
    pub fn new(max_deal_attempts: usize) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            max_deal_attempts,
        }
    }

    fn entry<'a>(
        rooms: &'a mut HashMap<String, Room>,
        room_id: &str,
        max_deal_attempts: usize,
    ) -> &'a mut Room {
        rooms.entry(room_id.to_string()).or_insert_with(|| {
            info!(room_id = %room_id, "Creating room");
            Room::new(room_id, Dealer::from_clock(max_deal_attempts))
        })
    }

    /// Snapshot of the room, creating an empty pregame room if absent
    #[instrument(skip(self))]
    pub async fn get_or_create(&self, room_id: &str) -> Room {
        let mut rooms = self.rooms.lock().await;
        Self::entry(&mut rooms, room_id, self.max_deal_attempts).clone()
    }

    /// Adds a session to the room, creating the room on first reference
    #[instrument(skip(self, outbound))]
    pub async fn join(
        &self,
        room_id: &str,
        identity: &str,
        outbound: Outbox,
    ) -> Result<ClientSession, AppError> {
        let mut rooms = self.rooms.lock().await;
        let room = Self::entry(&mut rooms, room_id, self.max_deal_attempts);

        let session = ClientSession::new(identity, outbound);
        room.add_session(session.clone())?;
        room.touch();

        info!(
            room_id = %room_id,
            identity = %identity,
            player_count = room.player_count(),
            "Player joined room"
        );
        Ok(session)
    }

    /// Removes a session. Absent rooms or identities are a no-op.
    #[instrument(skip(self))]
    pub async fn remove(&self, room_id: &str, identity: &str) -> Option<ClientSession> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.get_mut(room_id)?;
        let removed = room.remove_session(identity);

        match &removed {
            Some(_) => {
                room.touch();
                info!(
                    room_id = %room_id,
                    identity = %identity,
                    player_count = room.player_count(),
                    "Player left room"
                );
            }
            None => debug!(room_id = %room_id, identity = %identity, "Player not in room"),
        }
        removed
    }

    /// Runs `f` against the room while holding the registry lock
    pub async fn with_room<T>(&self, room_id: &str, f: impl FnOnce(&mut Room) -> T) -> T {
        let mut rooms = self.rooms.lock().await;
        let room = Self::entry(&mut rooms, room_id, self.max_deal_attempts);
        room.touch();
        f(room)
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }

    /// Drops rooms that are empty and have been idle for at least `threshold`
    #[instrument(skip(self))]
    pub async fn reap_idle_rooms(&self, threshold: Duration) -> Vec<String> {
        let now = Utc::now();
        let mut rooms = self.rooms.lock().await;

        let idle: Vec<String> = rooms
            .values()
            .filter(|room| room.is_idle(threshold, now))
            .map(|room| room.id().to_string())
            .collect();

        for room_id in &idle {
            rooms.remove(room_id);
            debug!(room_id = %room_id, "Reaped idle room");
        }
        idle
    }
}
