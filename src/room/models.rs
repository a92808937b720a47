use chrono::{DateTime, Duration, Utc};
use std::fmt;
use strum_macros::Display;
use tokio::sync::mpsc;

use crate::game::{Card, DealError, Dealer, Suit};
use crate::shared::AppError;

/// Maximum number of sessions in one room
pub const MAX_PLAYERS: usize = 4;

/// Outbound line queue of one connection
pub type Outbox = mpsc::UnboundedSender<String>;

/// Sub-phase of a running game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum InnerState {
    Bid,
    Play,
    Score,
}

/// Phase of a room. The inner state only exists while a game is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomState {
    Pregame,
    Ingame(InnerState),
    Postgame,
}

impl fmt::Display for RoomState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomState::Pregame => write!(f, "pregame"),
            RoomState::Ingame(_) => write!(f, "ingame"),
            RoomState::Postgame => write!(f, "postgame"),
        }
    }
}

/// Server-side state of one connected participant
#[derive(Debug, Clone)]
pub struct ClientSession {
    identity: String,
    ready: bool,
    hand: Vec<Card>,
    pending_bid: Option<Card>,
    outbound: Outbox,
}

impl ClientSession {
    pub fn new(identity: impl Into<String>, outbound: Outbox) -> Self {
        Self {
            identity: identity.into(),
            ready: false,
            hand: Vec::new(),
            pending_bid: None,
            outbound,
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn card_count(&self) -> usize {
        self.hand.len()
    }

    /// Looks a card up in this session's own hand
    pub fn find_card(&self, card_id: i64) -> Option<Card> {
        self.hand
            .iter()
            .find(|card| i64::from(card.id) == card_id)
            .copied()
    }

    pub fn pending_bid(&self) -> Option<Card> {
        self.pending_bid
    }

    pub fn place_bid(&mut self, card: Card) {
        self.pending_bid = Some(card);
    }

    pub(crate) fn outbound(&self) -> &Outbox {
        &self.outbound
    }

    fn take_hand(&mut self, hand: Vec<Card>) {
        self.hand = hand;
        self.pending_bid = None;
        self.ready = false;
    }
}

/// One isolated game instance
#[derive(Debug, Clone)]
pub struct Room {
    id: String,
    sessions: Vec<ClientSession>,
    state: RoomState,
    round: u32,
    trump: Option<Suit>,
    dealer: Dealer,
    last_activity_at: DateTime<Utc>,
}

impl Room {
    pub fn new(id: impl Into<String>, dealer: Dealer) -> Self {
        Self {
            id: id.into(),
            sessions: Vec::with_capacity(MAX_PLAYERS),
            state: RoomState::Pregame,
            round: 1,
            trump: None,
            dealer,
            last_activity_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn sessions(&self) -> &[ClientSession] {
        &self.sessions
    }

    pub fn session(&self, identity: &str) -> Option<&ClientSession> {
        self.sessions.iter().find(|s| s.identity == identity)
    }

    pub fn session_mut(&mut self, identity: &str) -> Option<&mut ClientSession> {
        self.sessions.iter_mut().find(|s| s.identity == identity)
    }

    /// Same as `session_mut` but reports a miss as `ClientNotFound`
    pub fn require_session_mut(&mut self, identity: &str) -> Result<&mut ClientSession, AppError> {
        let room_id = self.id.clone();
        self.session_mut(identity)
            .ok_or_else(|| AppError::ClientNotFound {
                room_id,
                identity: identity.to_string(),
            })
    }

    pub fn state(&self) -> RoomState {
        self.state
    }

    /// Inner state, only while a game is running
    pub fn inner_state(&self) -> Option<InnerState> {
        match self.state {
            RoomState::Ingame(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn trump(&self) -> Option<Suit> {
        self.trump
    }

    pub fn set_trump(&mut self, trump: Option<Suit>) {
        self.trump = trump;
    }

    pub fn last_activity_at(&self) -> DateTime<Utc> {
        self.last_activity_at
    }

    pub fn touch(&mut self) {
        self.last_activity_at = Utc::now();
    }

    pub fn player_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Check if room is at capacity (4 players)
    pub fn is_full(&self) -> bool {
        self.sessions.len() >= MAX_PLAYERS
    }

    pub fn has_player(&self, identity: &str) -> bool {
        self.session(identity).is_some()
    }

    pub fn add_session(&mut self, session: ClientSession) -> Result<(), AppError> {
        if self.is_full() {
            return Err(AppError::RoomFull {
                room_id: self.id.clone(),
            });
        }
        if self.has_player(&session.identity) {
            return Err(AppError::DuplicateIdentity {
                room_id: self.id.clone(),
                identity: session.identity,
            });
        }
        self.sessions.push(session);
        Ok(())
    }

    pub fn remove_session(&mut self, identity: &str) -> Option<ClientSession> {
        let index = self.sessions.iter().position(|s| s.identity == identity)?;
        Some(self.sessions.remove(index))
    }

    pub fn reset_ready(&mut self) {
        for session in &mut self.sessions {
            session.ready = false;
        }
    }

    /// True when the room has members and every one of them is ready
    pub fn all_ready(&self) -> bool {
        !self.sessions.is_empty() && self.sessions.iter().all(|s| s.ready)
    }

    /// A game starts only from pregame with a full room of ready sessions
    pub fn ready_to_start(&self) -> bool {
        self.state == RoomState::Pregame
            && self.sessions.len() == MAX_PLAYERS
            && self.all_ready()
    }

    /// Deals a fresh hand to every session and enters the bid phase.
    ///
    /// On failure nothing is changed and the room stays in pregame.
    pub fn start_game(&mut self) -> Result<usize, DealError> {
        let deal = self.dealer.deal(self.sessions.len())?;

        for (session, hand) in self.sessions.iter_mut().zip(deal.hands) {
            session.take_hand(hand);
        }
        self.round = 1;
        self.trump = None;
        self.state = RoomState::Ingame(InnerState::Bid);

        Ok(deal.attempts)
    }

    /// Moves a running game to another sub-phase. Ignored outside a game.
    pub fn set_inner_state(&mut self, inner: InnerState) -> bool {
        match self.state {
            RoomState::Ingame(_) => {
                self.state = RoomState::Ingame(inner);
                true
            }
            _ => false,
        }
    }

    pub fn finish_game(&mut self) {
        self.state = RoomState::Postgame;
    }

    /// Empty and untouched for at least `threshold`
    pub fn is_idle(&self, threshold: Duration, now: DateTime<Utc>) -> bool {
        self.sessions.is_empty() && now - self.last_activity_at >= threshold
    }
}
