use tracing::debug;

use crate::room::models::Room;
use crate::shared::AppError;

/// Extension point for what happens once every session in a room has bid.
///
/// Trump resolution, trick play and scoring plug in here. Implementations run
/// under the registry lock and may mutate the room freely.
pub trait RoundRules: Send + Sync {
    fn on_bids_complete(&self, room: &mut Room) -> Result<(), AppError>;
}

/// Rules used until a real bid resolution exists: the room stays in the bid phase
#[derive(Debug, Default, Clone, Copy)]
pub struct PendingRoundRules;

impl RoundRules for PendingRoundRules {
    fn on_bids_complete(&self, room: &mut Room) -> Result<(), AppError> {
        debug!(room_id = %room.id(), round = room.round(), "All bids submitted");
        Err(AppError::NotImplemented("bid resolution"))
    }
}
