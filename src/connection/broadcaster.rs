use tracing::{debug, warn};

use crate::room::models::{ClientSession, Room};

/// Fan-out of text lines to the sessions of one room.
///
/// Delivery is fire-and-forget: a failed recipient is logged and skipped, the
/// rest still receive the message, and the failing session stays in the room.
pub struct Broadcaster;

impl Broadcaster {
    pub fn to_one(room: &Room, identity: &str, message: &str) -> usize {
        match room.session(identity) {
            Some(session) => Self::deliver(room.id(), session, message) as usize,
            None => {
                debug!(room_id = %room.id(), identity = %identity, "No such recipient");
                0
            }
        }
    }

    pub fn to_others(room: &Room, sender: &str, message: &str) -> usize {
        room.sessions()
            .iter()
            .filter(|session| session.identity() != sender)
            .filter(|session| Self::deliver(room.id(), session, message))
            .count()
    }

    pub fn to_all(room: &Room, message: &str) -> usize {
        room.sessions()
            .iter()
            .filter(|session| Self::deliver(room.id(), session, message))
            .count()
    }

    fn deliver(room_id: &str, session: &ClientSession, message: &str) -> bool {
        match session.outbound().send(format!("{message}\n")) {
            Ok(()) => true,
            Err(_) => {
                warn!(
                    room_id = %room_id,
                    identity = %session.identity(),
                    "Error writing to connection"
                );
                false
            }
        }
    }
}
