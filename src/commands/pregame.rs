use tracing::{error, info};

use crate::connection::{messages, Broadcaster, InboundCommand};
use crate::room::models::Room;
use crate::shared::AppError;

/// Commands understood while a room is waiting for its players
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PregameCommand {
    Ready,
    Check,
    Chat(String),
    Help,
}

impl PregameCommand {
    pub fn parse(command: &InboundCommand) -> Result<Self, AppError> {
        match command.command.as_str() {
            "/ready" => Ok(PregameCommand::Ready),
            "/check" => Ok(PregameCommand::Check),
            "/chat" => Ok(PregameCommand::Chat(command.metadata.clone())),
            "/help" => Ok(PregameCommand::Help),
            _ => Err(AppError::UnrecognizedCommand(command.raw.clone())),
        }
    }
}

pub(super) fn handle(room: &mut Room, sender: &str, command: PregameCommand) -> Result<(), AppError> {
    match command {
        PregameCommand::Ready => handle_ready(room, sender),
        PregameCommand::Check => {
            Broadcaster::to_one(room, sender, &messages::status_report(room));
            Ok(())
        }
        PregameCommand::Chat(text) => {
            info!(room_id = %room.id(), identity = %sender, "Chat message");
            Broadcaster::to_others(room, sender, &messages::chat(sender, &text));
            Ok(())
        }
        PregameCommand::Help => {
            Broadcaster::to_one(room, sender, messages::HELP_TEXT);
            Ok(())
        }
    }
}

fn handle_ready(room: &mut Room, sender: &str) -> Result<(), AppError> {
    room.require_session_mut(sender)?.set_ready(true);
    Broadcaster::to_one(room, sender, messages::READY_CONFIRMATION);
    Broadcaster::to_others(room, sender, &messages::ready_notice(sender));

    if room.ready_to_start() {
        start_game(room)?;
    }
    Ok(())
}

fn start_game(room: &mut Room) -> Result<(), AppError> {
    match room.start_game() {
        Ok(attempts) => {
            info!(room_id = %room.id(), attempts = attempts, "All players ready, game started");
            for session in room.sessions() {
                let message = messages::game_started(room, session)?;
                Broadcaster::to_one(room, session.identity(), &message);
            }
            Ok(())
        }
        Err(err) => {
            error!(room_id = %room.id(), error = %err, "Could not deal cards");
            room.reset_ready();
            Broadcaster::to_all(room, &messages::deal_failed(&err));
            Err(err.into())
        }
    }
}
