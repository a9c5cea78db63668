//! In-memory Bot API used by unit tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Semaphore;

use crate::config::AccountCredential;
use crate::telegram::{
    AccountIdentity, ApiError, BotApi, BotCommandSpec, InboundUpdate, OutgoingMessage,
    ReactionType, SetReactionRequest,
};

/// A recorded Bot API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    GetMe {
        token: String,
    },
    SetCommands {
        token: String,
        commands: Vec<BotCommandSpec>,
    },
    GetUpdates {
        token: String,
        offset: Option<i64>,
    },
    SendMessage {
        token: String,
        message: OutgoingMessage,
    },
    React {
        token: String,
        chat_id: i64,
        message_id: i64,
        emoji: String,
    },
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    identities: HashMap<String, String>,
    batches: HashMap<String, VecDeque<Vec<InboundUpdate>>>,
    fetch_failures: HashMap<String, u32>,
    rejected_fetches: HashSet<String>,
    fail_sends: bool,
}

/// Scriptable fake of [`BotApi`].
///
/// Reactions can be held back behind a gate to observe in-flight behaviour.
#[derive(Default)]
pub(crate) struct MockBotApi {
    state: Mutex<State>,
    reaction_gate: Option<Arc<Semaphore>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockBotApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A mock whose reactions block until [`release_reactions`](Self::release_reactions).
    pub(crate) fn with_reaction_gate() -> Self {
        Self {
            reaction_gate: Some(Arc::new(Semaphore::new(0))),
            ..Self::default()
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub(crate) fn add_identity(&self, cred: &AccountCredential, username: &str) {
        self.state()
            .identities
            .insert(cred.expose().to_owned(), username.to_owned());
    }

    pub(crate) fn push_updates(&self, cred: &AccountCredential, batch: Vec<InboundUpdate>) {
        self.state()
            .batches
            .entry(cred.expose().to_owned())
            .or_default()
            .push_back(batch);
    }

    /// Makes the next `count` fetches fail with a transport error.
    pub(crate) fn fail_fetches(&self, cred: &AccountCredential, count: u32) {
        self.state()
            .fetch_failures
            .insert(cred.expose().to_owned(), count);
    }

    pub(crate) fn reject_fetches(&self, cred: &AccountCredential) {
        self.state()
            .rejected_fetches
            .insert(cred.expose().to_owned());
    }

    pub(crate) fn fail_sends(&self) {
        self.state().fail_sends = true;
    }

    pub(crate) fn release_reactions(&self, count: usize) {
        if let Some(gate) = &self.reaction_gate {
            gate.add_permits(count);
        }
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub(crate) fn fetch_count(&self, cred: &AccountCredential) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| matches!(c, Call::GetUpdates { token, .. } if token == cred.expose()))
            .count()
    }

    /// Completed reactions as `(chat_id, message_id, emoji)`.
    pub(crate) fn reactions(&self) -> Vec<(i64, i64, String)> {
        self.state()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::React {
                    chat_id,
                    message_id,
                    emoji,
                    ..
                } => Some((*chat_id, *message_id, emoji.clone())),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn reactions_for(&self, cred: &AccountCredential) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| matches!(c, Call::React { token, .. } if token == cred.expose()))
            .count()
    }

    pub(crate) fn sent_messages(&self) -> Vec<OutgoingMessage> {
        self.state()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::SendMessage { message, .. } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, call: Call) {
        self.state().calls.push(call);
    }

    fn send_outcome(&self) -> Result<(), ApiError> {
        if self.state().fail_sends {
            Err(ApiError::Transport("connection reset".to_owned()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BotApi for MockBotApi {
    async fn get_me(&self, credential: &AccountCredential) -> Result<AccountIdentity, ApiError> {
        let token = credential.expose().to_owned();
        self.record(Call::GetMe {
            token: token.clone(),
        });
        self.state()
            .identities
            .get(&token)
            .map(AccountIdentity::new)
            .ok_or(ApiError::Rejected {
                method: "getMe",
                code: 401,
                description: "Unauthorized".to_owned(),
            })
    }

    async fn set_my_commands(
        &self,
        credential: &AccountCredential,
        commands: &[BotCommandSpec],
    ) -> Result<(), ApiError> {
        self.record(Call::SetCommands {
            token: credential.expose().to_owned(),
            commands: commands.to_vec(),
        });
        self.send_outcome()
    }

    async fn get_updates(
        &self,
        credential: &AccountCredential,
        offset: Option<i64>,
    ) -> Result<Vec<InboundUpdate>, ApiError> {
        let token = credential.expose().to_owned();
        let mut state = self.state();
        state.calls.push(Call::GetUpdates {
            token: token.clone(),
            offset,
        });

        if state.rejected_fetches.contains(&token) {
            return Err(ApiError::Rejected {
                method: "getUpdates",
                code: 409,
                description: "Conflict: terminated by other getUpdates request".to_owned(),
            });
        }

        if let Some(remaining) = state.fetch_failures.get_mut(&token)
            && *remaining > 0
        {
            *remaining -= 1;
            return Err(ApiError::Transport("operation timed out".to_owned()));
        }

        Ok(state
            .batches
            .get_mut(&token)
            .and_then(VecDeque::pop_front)
            .unwrap_or_default())
    }

    async fn send_message(
        &self,
        credential: &AccountCredential,
        message: &OutgoingMessage,
    ) -> Result<(), ApiError> {
        self.record(Call::SendMessage {
            token: credential.expose().to_owned(),
            message: message.clone(),
        });
        self.send_outcome()
    }

    async fn set_message_reaction(
        &self,
        credential: &AccountCredential,
        reaction: &SetReactionRequest,
    ) -> Result<(), ApiError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(gate) = &self.reaction_gate {
            gate.acquire().await.unwrap().forget();
        }

        let emoji = reaction
            .reaction
            .iter()
            .map(|r| match r {
                ReactionType::Emoji { emoji } => emoji.clone(),
            })
            .next()
            .unwrap_or_default();
        self.record(Call::React {
            token: credential.expose().to_owned(),
            chat_id: reaction.chat_id,
            message_id: reaction.message_id,
            emoji,
        });

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.send_outcome()
    }
}

/// Builds an update with a raw message payload.
pub(crate) fn update(update_id: i64, message: Value) -> InboundUpdate {
    InboundUpdate {
        update_id,
        message: Some(message),
    }
}

/// Builds a text message update.
pub(crate) fn text_update(update_id: i64, chat_id: i64, message_id: i64, text: &str) -> InboundUpdate {
    update(
        update_id,
        json!({"chat": {"id": chat_id}, "message_id": message_id, "text": text}),
    )
}
