// Public API
pub use broadcaster::Broadcaster;
pub use handler::{handle_connection, serve};
pub use messages::{CardRecord, InboundCommand, JoinRequest};
pub use socket::Connection;

// Internal modules
mod broadcaster;
mod handler;
pub mod messages;
mod socket;
