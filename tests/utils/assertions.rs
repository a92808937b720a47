//! Test assertion helpers - fluent API for verifying test expectations
#![allow(dead_code)] // Test utilities may not all be used in every test

use serde_json::Value;

use super::setup::TestSetup;

// ============================================================================
// Assertion Helpers
// ============================================================================

pub const GAME_STARTED_PREFIX: &str =
    "All players are ready, game has started. Here are your cards: ";

pub struct MessageAssertion<'a> {
    setup: &'a TestSetup,
    players: Vec<&'a str>,
}

impl<'a> MessageAssertion<'a> {
    /// Create an assertion for all players in the setup
    pub fn for_all_players(setup: &'a TestSetup) -> Self {
        let players = setup.players.iter().map(|s| s.as_str()).collect();
        Self { setup, players }
    }

    /// Create an assertion for specific players
    pub fn for_players(setup: &'a TestSetup, players: Vec<&'a str>) -> Self {
        Self { setup, players }
    }

    /// Assert that every player received exactly these messages (consumes them)
    pub fn received_exactly(self, expected: &[&str]) {
        for player in &self.players {
            let messages = self.setup.take_messages(player);
            assert_eq!(messages, expected, "{} received unexpected messages", player);
        }
    }

    /// Assert that players received no messages
    pub fn received_no_messages(self) {
        for player in &self.players {
            let messages = self.setup.take_messages(player);
            assert!(
                messages.is_empty(),
                "{} should not have received any messages, got {:?}",
                player,
                messages
            );
        }
    }

    /// Assert that each player's last message is its private game-start hand.
    /// Returns the hands in player order.
    pub fn received_hands(self) -> Vec<Vec<Value>> {
        let mut hands = Vec::new();
        for player in &self.players {
            let messages = self.setup.take_messages(player);
            let last = messages
                .last()
                .unwrap_or_else(|| panic!("{} should have received a hand", player));
            hands.push(parse_hand(last));
        }
        hands
    }
}

/// Extracts the card records from a game-start message
pub fn parse_hand(message: &str) -> Vec<Value> {
    let first_line = message.lines().next().unwrap_or_default();
    let json = first_line
        .strip_prefix(GAME_STARTED_PREFIX)
        .unwrap_or_else(|| panic!("not a game-start message: {message}"));
    serde_json::from_str(json).expect("hand payload should be a JSON array")
}
