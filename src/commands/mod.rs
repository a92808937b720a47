// Public API
pub use dispatcher::CommandDispatcher;
pub use pregame::PregameCommand;

// Internal modules
mod dispatcher;
mod ingame;
mod pregame;
