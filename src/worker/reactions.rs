//! Bounded fire-and-forget reaction dispatch.
//!
//! Each account owns one dispatcher: a bounded queue drained by a single
//! task that keeps at most `concurrency` reaction calls in flight. Submitting
//! never waits; when the queue is full the reaction is dropped.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, warn};

use crate::telegram::{ReactionEvent, RemoteClient};

/// Why a reaction was not accepted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("reaction queue is full")]
    QueueFull,

    #[error("reaction dispatcher has stopped")]
    Closed,
}

/// Handle to one account's reaction dispatcher.
#[derive(Debug)]
pub struct ReactionDispatcher {
    tx: mpsc::Sender<ReactionEvent>,
    task: JoinHandle<()>,
}

impl ReactionDispatcher {
    /// Starts the dispatcher task.
    ///
    /// Must be called from within a tokio runtime. Zero values for
    /// `concurrency` or `capacity` are treated as one.
    #[must_use]
    pub fn spawn(client: RemoteClient, concurrency: usize, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let task = tokio::spawn(run_dispatch_loop(rx, client, concurrency.max(1)));
        Self { tx, task }
    }

    /// Queues a reaction without waiting.
    pub fn submit(&self, event: ReactionEvent) -> Result<(), SubmitError> {
        self.tx.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SubmitError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => SubmitError::Closed,
        })
    }

    /// Closes the queue and waits for queued and in-flight reactions.
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(e) = self.task.await {
            warn!("Reaction dispatcher ended abnormally: {}", e);
        }
    }
}

async fn run_dispatch_loop(
    mut rx: mpsc::Receiver<ReactionEvent>,
    client: RemoteClient,
    concurrency: usize,
) {
    let permits = Arc::new(Semaphore::new(concurrency));
    let mut in_flight = JoinSet::new();

    while let Some(event) = rx.recv().await {
        let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
            break;
        };

        let client = client.clone();
        in_flight.spawn(async move {
            let _permit = permit;
            client.react(&event).await;
        });

        // Reap finished tasks so the set does not grow with traffic.
        while let Some(result) = in_flight.try_join_next() {
            if let Err(e) = result {
                warn!("Reaction task failed: {}", e);
            }
        }
    }

    debug!("Reaction queue closed, waiting for {} in-flight", in_flight.len());
    while let Some(result) = in_flight.join_next().await {
        if let Err(e) = result {
            warn!("Reaction task failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::AccountCredential;
    use crate::telegram::RetryPolicy;
    use crate::testing::MockBotApi;

    fn event(message_id: i64) -> ReactionEvent {
        ReactionEvent {
            credential: AccountCredential::new("A"),
            chat_id: 1,
            message_id,
            emoji: "👍",
        }
    }

    fn client(mock: &Arc<MockBotApi>) -> RemoteClient {
        RemoteClient::new(mock.clone(), RetryPolicy::no_retry())
    }

    #[tokio::test]
    async fn test_submitted_reactions_are_sent() {
        let mock = Arc::new(MockBotApi::new());
        let dispatcher = ReactionDispatcher::spawn(client(&mock), 4, 16);

        for id in 1..=3 {
            dispatcher.submit(event(id)).unwrap();
        }
        dispatcher.shutdown().await;

        let mut sent: Vec<i64> = mock.reactions().iter().map(|r| r.1).collect();
        sent.sort_unstable();
        assert_eq!(sent, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_submit_does_not_wait_for_completion() {
        let mock = Arc::new(MockBotApi::with_reaction_gate());
        let dispatcher = ReactionDispatcher::spawn(client(&mock), 1, 16);

        dispatcher.submit(event(1)).unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(mock.reactions().is_empty());

        mock.release_reactions(1);
        dispatcher.shutdown().await;
        assert_eq!(mock.reactions().len(), 1);
    }

    #[tokio::test]
    async fn test_in_flight_is_bounded() {
        let mock = Arc::new(MockBotApi::with_reaction_gate());
        let dispatcher = ReactionDispatcher::spawn(client(&mock), 2, 16);

        for id in 1..=6 {
            dispatcher.submit(event(id)).unwrap();
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(mock.max_in_flight(), 2);

        mock.release_reactions(6);
        dispatcher.shutdown().await;
        assert_eq!(mock.reactions().len(), 6);
        assert!(mock.max_in_flight() <= 2);
    }

    #[tokio::test]
    async fn test_full_queue_drops_reaction() {
        let mock = Arc::new(MockBotApi::new());
        let dispatcher = ReactionDispatcher::spawn(client(&mock), 1, 1);

        // The dispatcher task has not run yet on this single-threaded runtime.
        assert_eq!(dispatcher.submit(event(1)), Ok(()));
        assert_eq!(dispatcher.submit(event(2)), Err(SubmitError::QueueFull));

        dispatcher.shutdown().await;
        assert_eq!(mock.reactions().len(), 1);
    }

    #[tokio::test]
    async fn test_single_executor_preserves_submission_order() {
        let mock = Arc::new(MockBotApi::new());
        let dispatcher = ReactionDispatcher::spawn(client(&mock), 1, 16);

        for id in [3, 1, 2] {
            dispatcher.submit(event(id)).unwrap();
        }
        dispatcher.shutdown().await;

        let sent: Vec<i64> = mock.reactions().iter().map(|r| r.1).collect();
        assert_eq!(sent, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_failed_reactions_do_not_stop_dispatcher() {
        let mock = Arc::new(MockBotApi::new());
        mock.fail_sends();
        let dispatcher = ReactionDispatcher::spawn(client(&mock), 2, 8);

        dispatcher.submit(event(1)).unwrap();
        dispatcher.submit(event(2)).unwrap();
        dispatcher.shutdown().await;

        assert_eq!(mock.reactions().len(), 2);
    }
}
