use std::sync::Arc;
use thiserror::Error;

use crate::commands::CommandDispatcher;
use crate::game::DealError;
use crate::room::registry::RoomRegistry;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RoomRegistry>,
    pub dispatcher: Arc<CommandDispatcher>,
}

impl AppState {
    pub fn new(registry: Arc<RoomRegistry>, dispatcher: Arc<CommandDispatcher>) -> Self {
        Self {
            registry,
            dispatcher,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Sorry, the maximum number of players in a game has been reached.")]
    RoomFull { room_id: String },

    #[error("Sorry, the username '{identity}' is already taken in room {room_id}.")]
    DuplicateIdentity { room_id: String, identity: String },

    #[error("client {identity} not found in room {room_id}")]
    ClientNotFound { room_id: String, identity: String },

    #[error("Could not convert string to int: {0}")]
    ParseError(String),

    #[error("error: card with ID {0} not found")]
    CardNotFound(i64),

    #[error("Unrecognized command: '{0}'. For list of commands type /help")]
    UnrecognizedCommand(String),

    #[error("Invalid handshake: {0}")]
    InvalidHandshake(String),

    #[error("{0} is not yet implemented")]
    NotImplemented(&'static str),

    #[error("Could not deal cards: {0}")]
    Deal(#[from] DealError),

    #[error("Failed to encode message: {0}")]
    Encode(String),
}

impl AppError {
    /// Whether the error text is sent back to the connection that caused it.
    ///
    /// Deal failures are announced to the whole room by the pregame handler.
    pub fn is_user_facing(&self) -> bool {
        !matches!(
            self,
            AppError::ClientNotFound { .. }
                | AppError::NotImplemented(_)
                | AppError::Encode(_)
                | AppError::Deal(_)
        )
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Encode(err.to_string())
    }
}
