use std::num::ParseIntError;
use tracing::{debug, info};

use crate::connection::{messages, Broadcaster, InboundCommand};
use crate::game::RoundRules;
use crate::room::models::Room;
use crate::shared::AppError;

/// Records the sender's bid card and runs the round rules once everyone has bid
pub(super) fn handle_bid(
    room: &mut Room,
    sender: &str,
    command: &InboundCommand,
    rules: &dyn RoundRules,
) -> Result<(), AppError> {
    let card_id = command
        .bid_payload()
        .parse::<i64>()
        .map_err(|e: ParseIntError| AppError::ParseError(e.to_string()))?;

    let was_complete = room.all_ready();
    let session = room.require_session_mut(sender)?;
    let card = session
        .find_card(card_id)
        .ok_or(AppError::CardNotFound(card_id))?;
    session.place_bid(card);
    session.set_ready(true);

    Broadcaster::to_one(room, sender, &messages::bid_confirmation(&card));
    Broadcaster::to_others(room, sender, &messages::bid_notice(sender));

    if !was_complete && room.all_ready() {
        info!(room_id = %room.id(), round = room.round(), "All bids submitted");
        match rules.on_bids_complete(room) {
            Ok(()) => {}
            Err(AppError::NotImplemented(what)) => {
                debug!(room_id = %room.id(), "{what} is not yet implemented");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

/// Play, score and postgame have no rules yet; they only announce the phase
pub(super) fn announce_phase(room: &Room, marker: &str) {
    debug!(room_id = %room.id(), phase = %marker, "Announcing phase");
    Broadcaster::to_all(room, marker);
}
