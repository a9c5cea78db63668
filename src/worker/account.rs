//! Account worker: identify, configure, then poll forever.
//!
//! The running loop follows a simple cycle:
//! 1. Fetch updates at the current cursor
//! 2. Classify each update in update-id order:
//!    - `/start` → send the welcome reply inline
//!    - ordinary message with an id → queue a random reaction
//!    - anything else → skip
//! 3. Advance the cursor past the batch
//! 4. Sleep for the poll interval
//!
//! The cursor lives on the loop's stack and is only advanced after the whole
//! batch has been handled, so an interrupted batch is fetched again.

use std::convert::Infallible;

use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::classify::{Disposition, classify};
use super::cursor::UpdateCursor;
use super::reactions::ReactionDispatcher;
use super::state::{CycleReport, WorkerState};
use crate::commands::{BotCommand, WelcomeMessage};
use crate::config::{AccountCredential, EmojiPalette, WorkerSettings};
use crate::telegram::{AccountIdentity, ApiError, InboundUpdate, ReactionEvent, RemoteClient};

/// Why a worker stopped.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The account's identity could not be resolved.
    #[error("failed to fetch bot username: {0}")]
    Identify(#[source] ApiError),
}

/// Polling worker for one bot account.
pub struct AccountWorker {
    credential: AccountCredential,
    client: RemoteClient,
    welcome: WelcomeMessage,
    palette: EmojiPalette,
    settings: WorkerSettings,
    rng: StdRng,
    state: WorkerState,
}

impl AccountWorker {
    /// Creates a worker with the default emoji palette.
    #[must_use]
    pub fn new(
        credential: AccountCredential,
        client: RemoteClient,
        welcome: WelcomeMessage,
        settings: WorkerSettings,
    ) -> Self {
        Self {
            credential,
            client,
            welcome,
            palette: EmojiPalette::default(),
            settings,
            rng: StdRng::from_entropy(),
            state: WorkerState::default(),
        }
    }

    /// Seeds the emoji picker, for reproducible runs.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Credential this worker polls for.
    #[must_use]
    pub const fn credential(&self) -> &AccountCredential {
        &self.credential
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> WorkerState {
        self.state
    }

    /// Runs the worker.
    ///
    /// Only returns if setup fails; once running, the loop has no exit and
    /// the task is expected to be aborted from outside.
    pub async fn run(&mut self) -> Result<Infallible, WorkerError> {
        let identity = self.setup().await?;

        let dispatcher = ReactionDispatcher::spawn(
            self.client.clone(),
            self.settings.reaction_concurrency,
            self.settings.reaction_queue_capacity,
        );
        let mut cursor = UpdateCursor::start();

        info!("Bot {} is running...", identity);

        loop {
            let report = self.poll_cycle(&identity, cursor, &dispatcher).await;
            if !report.is_idle() {
                debug!(
                    "Bot {}: {} updates, {} welcomed, {} reactions queued, {} dropped, {} skipped, cursor {}",
                    identity,
                    report.fetched,
                    report.welcomed,
                    report.reactions_queued,
                    report.reactions_dropped,
                    report.skipped,
                    report.cursor
                );
            }
            cursor = report.cursor;

            tokio::time::sleep(self.settings.poll_interval).await;
        }
    }

    /// Identifies the account and registers its command menu.
    ///
    /// A failed identification leaves the worker in [`WorkerState::Failed`].
    /// A failed menu registration is logged and ignored.
    pub async fn setup(&mut self) -> Result<AccountIdentity, WorkerError> {
        self.transition(WorkerState::Identifying);
        let identity = match self.client.identify(&self.credential).await {
            Ok(identity) => identity,
            Err(e) => {
                self.transition(WorkerState::Failed);
                warn!(
                    "Skipping bot {} (username fetch failed): {}",
                    self.credential, e
                );
                return Err(WorkerError::Identify(e));
            }
        };
        info!("Bot {} resolved to {}", self.credential, identity);

        self.transition(WorkerState::Configuring);
        self.client
            .configure_command_menu(&self.credential, &BotCommand::menu())
            .await;

        self.transition(WorkerState::Running);
        Ok(identity)
    }

    /// Runs one fetch, dispatch and advance cycle starting at `cursor`.
    pub async fn poll_cycle(
        &mut self,
        identity: &AccountIdentity,
        cursor: UpdateCursor,
        dispatcher: &ReactionDispatcher,
    ) -> CycleReport {
        let mut updates = self
            .client
            .fetch_updates(&self.credential, cursor.offset())
            .await;
        updates.sort_by_key(|u| u.update_id);

        let mut report = CycleReport {
            fetched: updates.len(),
            ..CycleReport::default()
        };

        for update in &updates {
            self.handle_update(update, identity, dispatcher, &mut report)
                .await;
        }

        report.cursor = cursor.advance(&updates);
        report
    }

    async fn handle_update(
        &mut self,
        update: &InboundUpdate,
        identity: &AccountIdentity,
        dispatcher: &ReactionDispatcher,
        report: &mut CycleReport,
    ) {
        match classify(update, identity) {
            Disposition::Command {
                command: BotCommand::Start,
                chat_id,
            } => {
                info!("/start received in chat {} for {}", chat_id, identity);
                let message = self.welcome.render(chat_id, identity);
                self.client.send_message(&self.credential, &message).await;
                report.welcomed += 1;
            }
            Disposition::React {
                chat_id,
                message_id,
            } => {
                let emoji = self.palette.choose(&mut self.rng);
                let event = ReactionEvent {
                    credential: self.credential.clone(),
                    chat_id,
                    message_id,
                    emoji,
                };
                match dispatcher.submit(event) {
                    Ok(()) => {
                        debug!(
                            "Queued reaction '{}' for message {} in chat {}",
                            emoji, message_id, chat_id
                        );
                        report.reactions_queued += 1;
                    }
                    Err(e) => {
                        warn!(
                            "Dropping reaction for message {} in chat {}: {}",
                            message_id, chat_id, e
                        );
                        report.reactions_dropped += 1;
                    }
                }
            }
            Disposition::Skip(reason) => {
                debug!("Skipping update {}: {}", update.update_id, reason);
                report.skipped += 1;
            }
        }
    }

    fn transition(&mut self, next: WorkerState) {
        debug_assert!(
            self.state.can_move_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        debug!("Bot {}: {} -> {}", self.credential, self.state, next);
        self.state = next;
    }
}

impl std::fmt::Debug for AccountWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountWorker")
            .field("credential", &self.credential)
            .field("state", &self.state)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
