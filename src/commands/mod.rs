//! Command handling module.
//!
//! Recognizes the `/start` command and builds the command menu and the
//! welcome reply with its action buttons.

mod types;
mod welcome;

pub use types::BotCommand;
pub use welcome::WelcomeMessage;
