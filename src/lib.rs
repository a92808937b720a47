// Library crate for the card room server
// This file exposes the public API for integration tests and the binary

pub mod commands;
pub mod config;
pub mod connection;
pub mod game;
pub mod room;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use commands::CommandDispatcher;
pub use config::ServerConfig;
pub use connection::{serve, Broadcaster, InboundCommand};
pub use room::{ClientSession, InnerState, Room, RoomRegistry, RoomState};
pub use shared::{AppError, AppState};
