use serde::{Deserialize, Serialize};

use crate::game::{Card, DealError};
use crate::room::models::{ClientSession, Room};
use crate::shared::AppError;

/// First line sent by a client: who it is and which room it wants
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub username: String,
    pub socket_id: String,
}

impl JoinRequest {
    pub fn parse(line: &str) -> Result<Self, AppError> {
        let request: JoinRequest = serde_json::from_str(line.trim())
            .map_err(|e| AppError::InvalidHandshake(e.to_string()))?;

        if request.username.trim().is_empty() {
            return Err(AppError::InvalidHandshake("username is empty".to_string()));
        }
        if request.socket_id.trim().is_empty() {
            return Err(AppError::InvalidHandshake("socketId is empty".to_string()));
        }
        Ok(request)
    }
}

/// Wire form of every line after the handshake
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommandEnvelope {
    #[serde(default)]
    socket_id: Option<String>,
    #[serde(default)]
    command: String,
    #[serde(default)]
    metadata: String,
}

/// A command line received from a client.
///
/// Lines are JSON envelopes (`socketId`, `command`, `metadata`) or plain text
/// of the form `<command> [metadata]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundCommand {
    pub raw: String,
    pub socket_id: Option<String>,
    pub command: String,
    pub metadata: String,
}

impl InboundCommand {
    pub fn parse(line: &str) -> Self {
        let raw = line.trim_end_matches(['\r', '\n']).to_string();
        let trimmed = raw.trim();

        let envelope = if trimmed.starts_with('{') {
            serde_json::from_str::<CommandEnvelope>(trimmed).ok()
        } else {
            None
        };

        let CommandEnvelope {
            socket_id,
            command,
            metadata,
        } = envelope.unwrap_or_else(|| CommandEnvelope {
            command: trimmed.to_string(),
            ..Default::default()
        });

        let (command, metadata) = if metadata.is_empty() {
            match command.trim().split_once(char::is_whitespace) {
                Some((head, rest)) => (head.to_string(), rest.trim_start().to_string()),
                None => (command.trim().to_string(), metadata),
            }
        } else {
            (command.trim().to_string(), metadata)
        };

        Self {
            raw,
            socket_id,
            command,
            metadata,
        }
    }

    /// Card id text of a bid: the metadata, or the command itself for bare lines
    pub fn bid_payload(&self) -> &str {
        let metadata = self.metadata.trim();
        if metadata.is_empty() {
            self.command.trim()
        } else {
            metadata
        }
    }
}

/// Card as it appears in hand payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CardRecord {
    #[serde(rename = "ID")]
    pub id: u32,
    pub suit: &'static str,
    pub value: &'static str,
    pub suit_num: u8,
    pub value_num: u8,
}

impl From<&Card> for CardRecord {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id,
            suit: card.suit.symbol(),
            value: card.rank.label(),
            suit_num: card.suit.index(),
            value_num: card.rank.value(),
        }
    }
}

pub const HELP_TEXT: &str = "Enter\n\
'/ready' to signify readiness\n\
'/check' to check the status of the other players\n\
'/chat' followed by your message to chat\n\
'/help' to see these instructions again.";

pub const READY_CONFIRMATION: &str = "Yeay, you're ready!";

pub fn welcome(room_id: &str, identity: &str) -> String {
    format!("Welcome to room {room_id}, {identity}!")
}

pub fn ready_notice(identity: &str) -> String {
    format!("{identity} is ready")
}

pub fn chat(identity: &str, text: &str) -> String {
    format!("{identity}: {text}")
}

pub fn status_report(room: &Room) -> String {
    let mut report = format!("Checking status of players in room {}...", room.id());
    for session in room.sessions() {
        let status = if session.is_ready() {
            "is ready"
        } else {
            "is not ready yet"
        };
        report.push_str(&format!("\n{}: {}", session.identity(), status));
    }
    report
}

/// Private game-start message: own hand plus everyone else's card count
pub fn game_started(room: &Room, session: &ClientSession) -> Result<String, AppError> {
    let cards: Vec<CardRecord> = session.hand().iter().map(CardRecord::from).collect();
    let mut message = format!(
        "All players are ready, game has started. Here are your cards: {}",
        serde_json::to_string(&cards)?
    );
    for other in room
        .sessions()
        .iter()
        .filter(|other| other.identity() != session.identity())
    {
        message.push_str(&format!(
            "\nTotal cards {} has: {}",
            other.identity(),
            other.card_count()
        ));
    }
    Ok(message)
}

pub fn deal_failed(err: &DealError) -> String {
    format!("All players are ready, but the cards could not be dealt ({err}). Please /ready again.")
}

pub fn bid_confirmation(card: &Card) -> String {
    format!("successfully bid card {card}")
}

pub fn bid_notice(identity: &str) -> String {
    format!("{identity} has submitted a bid")
}
