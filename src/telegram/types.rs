//! Bot API wire types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response envelope shared by every Bot API method.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
}

/// The bot user returned by `getMe`.
#[derive(Debug, Clone, Deserialize)]
pub struct BotUser {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

/// Resolved handle of a bot account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountIdentity {
    pub username: String,
}

impl AccountIdentity {
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

impl std::fmt::Display for AccountIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.username)
    }
}

/// One event from `getUpdates`.
///
/// The message payload stays as raw JSON so that a malformed message only
/// affects its own update; it is decoded by [`InboundUpdate::message`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InboundUpdate {
    pub update_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
}

impl InboundUpdate {
    /// Decodes the message payload.
    ///
    /// Returns `None` when the update carries no message, and an error when
    /// the payload exists but does not have the expected shape.
    pub fn message(&self) -> Option<Result<IncomingMessage, serde_json::Error>> {
        self.message
            .as_ref()
            .map(|raw| IncomingMessage::deserialize(raw))
    }
}

/// The message fields the fleet cares about.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub message_id: Option<i64>,
    pub chat: ChatRef,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatRef {
    pub id: i64,
}

/// One entry of the command menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BotCommandSpec {
    pub command: String,
    pub description: String,
}

/// Text formatting mode for `sendMessage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    #[serde(rename = "HTML")]
    Html,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub url: String,
}

impl InlineKeyboardButton {
    #[must_use]
    pub fn link(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

/// Body of a `sendMessage` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMessage {
    pub chat_id: i64,
    pub text: String,
    pub parse_mode: ParseMode,
    pub reply_markup: InlineKeyboardMarkup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReactionType {
    Emoji { emoji: String },
}

/// Body of a `setMessageReaction` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetReactionRequest {
    pub chat_id: i64,
    pub message_id: i64,
    pub reaction: Vec<ReactionType>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SetCommandsRequest<'a> {
    pub commands: &'a [BotCommandSpec],
}
