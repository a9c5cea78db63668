//! Bot API transport seam.

use async_trait::async_trait;
use thiserror::Error;

use super::types::{
    AccountIdentity, BotCommandSpec, InboundUpdate, OutgoingMessage, SetReactionRequest,
};
use crate::config::AccountCredential;

/// Errors that can occur while talking to the Bot API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, TLS, ...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// A response arrived but its body could not be decoded.
    #[error("Malformed response: {0}")]
    Decode(String),

    /// The API answered with `ok: false`.
    #[error("Telegram rejected {method} ({code}): {description}")]
    Rejected {
        method: &'static str,
        code: i64,
        description: String,
    },

    /// `getMe` succeeded but the bot has no username.
    #[error("Bot account has no username")]
    MissingUsername,

    #[error("HTTP client setup failed: {0}")]
    Setup(String),
}

impl ApiError {
    /// Whether retrying the same request could plausibly succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Decode(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL embeds the bot token.
        let err = err.without_url();
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Raw Bot API operations, one network call each.
///
/// Implementations apply per-call timeouts but no retries and no
/// concurrency; [`RemoteClient`](super::RemoteClient) layers policy on top.
#[async_trait]
pub trait BotApi: Send + Sync {
    /// `getMe`: resolves the bot's username.
    async fn get_me(&self, credential: &AccountCredential) -> Result<AccountIdentity, ApiError>;

    /// `setMyCommands`: registers the command menu.
    async fn set_my_commands(
        &self,
        credential: &AccountCredential,
        commands: &[BotCommandSpec],
    ) -> Result<(), ApiError>;

    /// `getUpdates`: long-polls message updates starting at `offset`.
    async fn get_updates(
        &self,
        credential: &AccountCredential,
        offset: Option<i64>,
    ) -> Result<Vec<InboundUpdate>, ApiError>;

    /// `sendMessage`.
    async fn send_message(
        &self,
        credential: &AccountCredential,
        message: &OutgoingMessage,
    ) -> Result<(), ApiError>;

    /// `setMessageReaction`.
    async fn set_message_reaction(
        &self,
        credential: &AccountCredential,
        reaction: &SetReactionRequest,
    ) -> Result<(), ApiError>;
}
