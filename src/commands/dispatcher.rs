use std::sync::Arc;
use tracing::{debug, instrument, warn};

use super::{ingame, pregame, PregameCommand};
use crate::connection::{Broadcaster, InboundCommand};
use crate::game::{PendingRoundRules, RoundRules};
use crate::room::models::{InnerState, Room, RoomState};
use crate::room::registry::RoomRegistry;
use crate::shared::AppError;

/// The room state machine: routes one command by room state and applies it
/// while holding the registry lock.
pub struct CommandDispatcher {
    registry: Arc<RoomRegistry>,
    rules: Arc<dyn RoundRules>,
}

impl CommandDispatcher {
    pub fn new(registry: Arc<RoomRegistry>, rules: Arc<dyn RoundRules>) -> Self {
        Self { registry, rules }
    }

    /// Dispatcher whose bid phase ends in the not-yet-implemented hook
    pub fn with_pending_rules(registry: Arc<RoomRegistry>) -> Self {
        Self::new(registry, Arc::new(PendingRoundRules))
    }

    /// Handles one command from `sender`.
    ///
    /// User-facing errors are replied to the sender only before being returned.
    #[instrument(skip(self, command), fields(command = %command.command))]
    pub async fn dispatch(
        &self,
        room_id: &str,
        sender: &str,
        command: &InboundCommand,
    ) -> Result<(), AppError> {
        self.registry
            .with_room(room_id, |room| {
                let result = self.apply(room, sender, command);
                if let Err(err) = &result {
                    if err.is_user_facing() {
                        debug!(error = %err, "Replying with error");
                        Broadcaster::to_one(room, sender, &err.to_string());
                    } else {
                        warn!(error = %err, "Command aborted");
                    }
                }
                result
            })
            .await
    }

    fn apply(&self, room: &mut Room, sender: &str, command: &InboundCommand) -> Result<(), AppError> {
        if !room.has_player(sender) {
            return Err(AppError::ClientNotFound {
                room_id: room.id().to_string(),
                identity: sender.to_string(),
            });
        }

        match room.state() {
            RoomState::Pregame => pregame::handle(room, sender, PregameCommand::parse(command)?),
            RoomState::Ingame(InnerState::Bid) => {
                ingame::handle_bid(room, sender, command, self.rules.as_ref())
            }
            RoomState::Ingame(inner) => {
                ingame::announce_phase(room, &inner.to_string());
                Ok(())
            }
            RoomState::Postgame => {
                let marker = room.state().to_string();
                ingame::announce_phase(room, &marker);
                Ok(())
            }
        }
    }
}
