//! Update classification.

use std::fmt;

use crate::commands::BotCommand;
use crate::telegram::{AccountIdentity, InboundUpdate};

/// What to do with one update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// A recognized command to answer in `chat_id`.
    Command { command: BotCommand, chat_id: i64 },

    /// An ordinary message to react to.
    React { chat_id: i64, message_id: i64 },

    /// Nothing to do.
    Skip(SkipReason),
}

/// Why an update was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The update carries no message payload.
    NoMessage,

    /// The message payload could not be decoded (e.g. non-numeric chat id).
    Malformed(String),

    /// The message has no id to attach a reaction to.
    NoMessageId,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMessage => f.write_str("no message payload"),
            Self::Malformed(e) => write!(f, "malformed message: {e}"),
            Self::NoMessageId => f.write_str("message has no id"),
        }
    }
}

/// Classifies an update for the bot named by `identity`.
#[must_use]
pub fn classify(update: &InboundUpdate, identity: &AccountIdentity) -> Disposition {
    let message = match update.message() {
        None => return Disposition::Skip(SkipReason::NoMessage),
        Some(Err(e)) => return Disposition::Skip(SkipReason::Malformed(e.to_string())),
        Some(Ok(message)) => message,
    };

    let text = message.text.as_deref().unwrap_or_default();
    if let Some(command) = BotCommand::parse(text, &identity.username) {
        return Disposition::Command {
            command,
            chat_id: message.chat.id,
        };
    }

    match message.message_id {
        Some(message_id) => Disposition::React {
            chat_id: message.chat.id,
            message_id,
        },
        None => Disposition::Skip(SkipReason::NoMessageId),
    }
}
