use std::collections::HashSet;

use chrono::Utc;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use tracing::{debug, warn};

use super::basic::{Card, Suit};

pub const DECK_SIZE: usize = 52;
pub const HAND_SIZE: usize = 13;
pub const DEFAULT_MAX_DEAL_ATTEMPTS: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DealError {
    #[error("no valid deal found after {attempts} attempts")]
    Exhausted { attempts: usize },
    #[error("cannot deal {hands} hands of 13 cards from one deck")]
    TooManyHands { hands: usize },
}

/// A freshly shuffled 52-card deck
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Enumerates every (suit, rank) pair once, numbers them, then shuffles
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cards = Card::all_cards();
        cards.shuffle(rng);
        Self { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }
}

/// Result of a successful deal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    /// One sorted 13-card hand per seat, in seat order
    pub hands: Vec<Vec<Card>>,
    /// Cards left undealt, in shuffle order
    pub remainder: Vec<Card>,
    /// Number of shuffles it took to produce valid hands
    pub attempts: usize,
}

/// A hand is playable when it holds every suit and at least one card above ten
pub fn validate_hand(hand: &[Card]) -> bool {
    let suits: HashSet<Suit> = hand.iter().map(|card| card.suit).collect();
    suits.len() == 4 && hand.iter().any(|card| card.rank.is_face_or_ace())
}

#[derive(Debug, Clone)]
pub struct Dealer {
    rng: StdRng,
    max_attempts: usize,
}

impl Dealer {
    /// Dealer whose shuffles are seeded from the current time
    pub fn from_clock(max_attempts: usize) -> Self {
        let seed = Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64;
        Self::seeded(seed, max_attempts)
    }

    pub fn seeded(seed: u64, max_attempts: usize) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn create_deck(&mut self) -> Deck {
        Deck::shuffled(&mut self.rng)
    }

    /// Deals `hands` valid hands, reshuffling the whole deck whenever any hand is invalid
    pub fn deal(&mut self, hands: usize) -> Result<Deal, DealError> {
        self.deal_validated(hands, validate_hand)
    }

    pub fn deal_validated<F>(&mut self, hands: usize, validate: F) -> Result<Deal, DealError>
    where
        F: Fn(&[Card]) -> bool,
    {
        if hands * HAND_SIZE > DECK_SIZE {
            return Err(DealError::TooManyHands { hands });
        }

        for attempt in 1..=self.max_attempts {
            let mut cards = self.create_deck().into_cards();
            let remainder = cards.split_off(hands * HAND_SIZE);

            let dealt: Vec<Vec<Card>> = cards
                .chunks(HAND_SIZE)
                .map(|slice| {
                    let mut hand = slice.to_vec();
                    hand.sort();
                    hand
                })
                .collect();

            if dealt.iter().all(|hand| validate(hand)) {
                debug!(attempts = attempt, "Cards dealt");
                return Ok(Deal {
                    hands: dealt,
                    remainder,
                    attempts: attempt,
                });
            }

            debug!(attempt = attempt, "Invalid hand, dealing again");
        }

        warn!(
            attempts = self.max_attempts,
            "Giving up on dealing after too many invalid hands"
        );
        Err(DealError::Exhausted {
            attempts: self.max_attempts,
        })
    }
}
