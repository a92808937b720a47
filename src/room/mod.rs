// Public API - what other modules can use
pub use cleanup_task::{cleanup_inactive_rooms, start_cleanup_task, CleanupConfig};
pub use models::{ClientSession, InnerState, Outbox, Room, RoomState, MAX_PLAYERS};
pub use registry::RoomRegistry;

// Internal modules
mod cleanup_task;
pub mod models;
pub mod registry;
