// Public API
pub use cards::{
    validate_hand, Card, Deal, DealError, Dealer, Deck, Rank, Suit, DEFAULT_MAX_DEAL_ATTEMPTS,
};
pub use rules::{PendingRoundRules, RoundRules};

// Internal modules
pub mod cards;
mod rules;
