//! Command types and definitions.

use std::fmt;

use crate::telegram::BotCommandSpec;

/// Commands the bots respond to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    /// Show the welcome message with action buttons.
    Start,
}

impl BotCommand {
    /// Every command, in menu order.
    pub const ALL: [Self; 1] = [Self::Start];

    /// Parses a command from a message text.
    ///
    /// Text is trimmed and case-folded before matching. Besides the bare
    /// `/start`, the group form `/start@<bot_username>` is accepted when it
    /// names this bot; the same command addressed to another bot is not a
    /// command for us.
    ///
    /// Returns `None` if the message is not a command.
    #[must_use]
    pub fn parse(text: &str, bot_username: &str) -> Option<Self> {
        let normalized = text.trim().to_lowercase();

        Self::ALL.into_iter().find(|cmd| {
            let token = cmd.token();
            if normalized == token {
                return true;
            }
            normalized
                .strip_prefix(token)
                .and_then(|rest| rest.strip_prefix('@'))
                .is_some_and(|addressee| {
                    !bot_username.is_empty() && addressee == bot_username.to_lowercase()
                })
        })
    }

    /// Returns the command name as registered in the menu.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
        }
    }

    /// Returns the literal token users type.
    #[must_use]
    pub const fn token(&self) -> &'static str {
        match self {
            Self::Start => "/start",
        }
    }

    /// Returns the command description for the menu.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Start => "Show welcome message and commands",
        }
    }

    /// Builds the command menu registered with `setMyCommands`.
    #[must_use]
    pub fn menu() -> Vec<BotCommandSpec> {
        Self::ALL
            .iter()
            .map(|cmd| BotCommandSpec {
                command: cmd.name().to_owned(),
                description: cmd.description().to_owned(),
            })
            .collect()
    }
}

impl fmt::Display for BotCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
