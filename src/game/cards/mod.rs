pub mod basic;
pub mod dealer;

pub use basic::{Card, Rank, Suit};
pub use dealer::{validate_hand, Deal, DealError, Dealer, Deck, DEFAULT_MAX_DEAL_ATTEMPTS};
