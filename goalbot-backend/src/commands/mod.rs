//! Command routing for the bot.
//!
//! The chat integration parses a message into an `IncomingCommand`; the
//! dispatcher turns it into a `Reply` of transport-sized chunks.

pub mod dispatcher;
pub mod types;

pub use dispatcher::CommandDispatcher;
pub use types::{IncomingCommand, Reply};
