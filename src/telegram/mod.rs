//! Telegram Bot API client module.
//!
//! Provides the raw HTTP transport behind the [`BotApi`] seam, the wire
//! types it speaks, and the [`RemoteClient`] policy layer the workers use.

mod api;
mod client;
mod http;
mod retry;
mod types;

pub use api::{ApiError, BotApi};
pub use client::{ReactionEvent, RemoteClient};
pub use http::HttpBotApi;
pub use retry::RetryPolicy;
pub use types::{
    AccountIdentity, ApiResponse, BotCommandSpec, BotUser, ChatRef, IncomingMessage,
    InboundUpdate, InlineKeyboardButton, InlineKeyboardMarkup, OutgoingMessage, ParseMode,
    ReactionType, SetReactionRequest,
};
