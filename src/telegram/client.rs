//! Policy layer over the Bot API.
//!
//! Each operation here decides what a failure means for the caller:
//! - `identify` reports failure, since the account cannot run without it
//! - `fetch_updates` retries transient failures and falls back to an empty batch
//! - sends (command menu, welcome, reaction) log and swallow every failure

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::api::{ApiError, BotApi};
use super::retry::RetryPolicy;
use super::types::{
    AccountIdentity, BotCommandSpec, InboundUpdate, OutgoingMessage, ReactionType,
    SetReactionRequest,
};
use crate::config::AccountCredential;

/// A reaction to attach to one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionEvent {
    pub credential: AccountCredential,
    pub chat_id: i64,
    pub message_id: i64,
    pub emoji: &'static str,
}

/// Stateless Bot API client with timeout and retry policy applied.
#[derive(Clone)]
pub struct RemoteClient {
    api: Arc<dyn BotApi>,
    fetch_retry: RetryPolicy,
}

impl RemoteClient {
    #[must_use]
    pub fn new(api: Arc<dyn BotApi>, fetch_retry: RetryPolicy) -> Self {
        Self { api, fetch_retry }
    }

    /// Resolves the bot's username. Never retried.
    pub async fn identify(
        &self,
        credential: &AccountCredential,
    ) -> Result<AccountIdentity, ApiError> {
        debug!("Fetching username for bot {}", credential);
        self.api.get_me(credential).await
    }

    /// Registers the command menu; failures are logged only.
    pub async fn configure_command_menu(
        &self,
        credential: &AccountCredential,
        commands: &[BotCommandSpec],
    ) {
        match self.api.set_my_commands(credential, commands).await {
            Ok(()) => info!("Command menu set for bot {}", credential),
            Err(e) => warn!("Error setting commands for bot {}: {}", credential, e),
        }
    }

    /// Long-polls for updates starting at `offset`.
    ///
    /// Transient failures are retried per the fetch policy; once attempts
    /// are exhausted, or if Telegram rejects the call, an empty batch is
    /// returned so the caller's loop keeps running.
    pub async fn fetch_updates(
        &self,
        credential: &AccountCredential,
        offset: Option<i64>,
    ) -> Vec<InboundUpdate> {
        let what = format!("fetching updates for bot {credential}");
        let result = self
            .fetch_retry
            .run(&what, |_| async move {
                match self.api.get_updates(credential, offset).await {
                    Err(e) if !e.is_transient() => {
                        warn!("Updates for bot {} not served: {}", credential, e);
                        Ok(Vec::new())
                    }
                    other => other,
                }
            })
            .await;

        result.unwrap_or_else(|e| {
            warn!(
                "Giving up on updates for bot {} after {} attempts: {}",
                credential,
                self.fetch_retry.max_attempts(),
                e
            );
            Vec::new()
        })
    }

    /// Sends a message; failures are logged only.
    pub async fn send_message(&self, credential: &AccountCredential, message: &OutgoingMessage) {
        match self.api.send_message(credential, message).await {
            Ok(()) => info!("Message sent to chat {}", message.chat_id),
            Err(e) => warn!(
                "Error sending message to chat {} for bot {}: {}",
                message.chat_id, credential, e
            ),
        }
    }

    /// Attaches a reaction; failures are logged only.
    pub async fn react(&self, event: &ReactionEvent) {
        let request = SetReactionRequest {
            chat_id: event.chat_id,
            message_id: event.message_id,
            reaction: vec![ReactionType::Emoji {
                emoji: event.emoji.to_owned(),
            }],
        };

        match self.api.set_message_reaction(&event.credential, &request).await {
            Ok(()) => debug!(
                "Reaction '{}' sent to message {} in chat {}",
                event.emoji, event.message_id, event.chat_id
            ),
            Err(e) => warn!(
                "Failed to react to message {} in chat {}: {}",
                event.message_id, event.chat_id, e
            ),
        }
    }
}

impl std::fmt::Debug for RemoteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteClient")
            .field("fetch_retry", &self.fetch_retry)
            .finish_non_exhaustive()
    }
}
