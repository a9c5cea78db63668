//! Fleet supervisor: one task per bot account.

use std::fmt;

use tokio::task::{AbortHandle, JoinSet};
use tracing::{error, info, warn};

use crate::commands::WelcomeMessage;
use crate::config::{AccountCredential, FleetConfig};
use crate::telegram::RemoteClient;
use crate::worker::{AccountWorker, WorkerError};

/// How a worker task ended.
#[derive(Debug)]
pub enum WorkerExit {
    /// Setup failed; the account is not polled.
    SetupFailed {
        credential: AccountCredential,
        error: WorkerError,
    },

    /// The worker panicked.
    Panicked { credential: AccountCredential },

    /// The worker was aborted by [`FleetSupervisor::shutdown`].
    Cancelled { credential: AccountCredential },
}

impl WorkerExit {
    /// Credential of the worker that exited.
    #[must_use]
    pub const fn credential(&self) -> &AccountCredential {
        match self {
            Self::SetupFailed { credential, .. }
            | Self::Panicked { credential }
            | Self::Cancelled { credential } => credential,
        }
    }
}

impl fmt::Display for WorkerExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetupFailed { credential, error } => {
                write!(f, "bot {credential} stopped during setup: {error}")
            }
            Self::Panicked { credential } => write!(f, "bot {credential} panicked"),
            Self::Cancelled { credential } => write!(f, "bot {credential} was cancelled"),
        }
    }
}

/// Runs one [`AccountWorker`] per account and waits for them.
///
/// Each worker runs in its own task, so a failure or panic in one account
/// never reaches another. Workers that stop are not restarted.
pub struct FleetSupervisor {
    watchers: JoinSet<WorkerExit>,
    workers: Vec<AbortHandle>,
}

impl FleetSupervisor {
    /// Starts a worker for every configured credential.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn start(config: &FleetConfig, client: &RemoteClient) -> Self {
        let welcome = WelcomeMessage::new(config.links.clone());
        let workers = config.credentials.iter().map(|credential| {
            AccountWorker::new(
                credential.clone(),
                client.clone(),
                welcome.clone(),
                config.worker,
            )
        });
        Self::spawn_all(workers)
    }

    /// Starts the given workers.
    #[must_use]
    pub fn spawn_all(workers: impl IntoIterator<Item = AccountWorker>) -> Self {
        let mut supervisor = Self {
            watchers: JoinSet::new(),
            workers: Vec::new(),
        };

        for worker in workers {
            supervisor.spawn(worker);
        }

        supervisor
    }

    fn spawn(&mut self, mut worker: AccountWorker) {
        let credential = worker.credential().clone();
        info!("Started worker for bot {}", credential);

        let task = tokio::spawn(async move { worker.run().await });
        self.workers.push(task.abort_handle());

        // The watcher turns the worker's outcome into an exit record that
        // still knows which account it belongs to.
        self.watchers.spawn(async move {
            match task.await {
                Ok(Ok(never)) => match never {},
                Ok(Err(error)) => WorkerExit::SetupFailed { credential, error },
                Err(e) if e.is_panic() => WorkerExit::Panicked { credential },
                Err(_) => WorkerExit::Cancelled { credential },
            }
        });
    }

    /// Number of workers started.
    #[must_use]
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Returns `true` if no worker was started.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Number of workers that have not exited yet.
    #[must_use]
    pub fn running(&self) -> usize {
        self.watchers.len()
    }

    /// Waits for the next worker to exit and logs it.
    ///
    /// Returns `None` once every worker has exited.
    pub async fn next_exit(&mut self) -> Option<WorkerExit> {
        loop {
            match self.watchers.join_next().await? {
                Ok(exit) => {
                    log_exit(&exit);
                    return Some(exit);
                }
                Err(e) => error!("Worker watcher failed: {}", e),
            }
        }
    }

    /// Blocks until every worker has exited.
    ///
    /// Running workers never exit on their own, so in practice this only
    /// returns when every account failed setup.
    pub async fn wait(&mut self) -> Vec<WorkerExit> {
        let mut exits = Vec::with_capacity(self.running());
        while let Some(exit) = self.next_exit().await {
            exits.push(exit);
        }
        exits
    }

    /// Aborts every worker and waits for them to stop.
    pub async fn shutdown(mut self) {
        for worker in &self.workers {
            worker.abort();
        }
        let exits = self.wait().await;
        info!("Stopped {} workers", exits.len());
    }
}

fn log_exit(exit: &WorkerExit) {
    match exit {
        WorkerExit::SetupFailed { .. } => warn!("Worker exited: {}", exit),
        WorkerExit::Panicked { .. } => error!("Worker exited: {}", exit),
        WorkerExit::Cancelled { .. } => info!("Worker exited: {}", exit),
    }
}

impl fmt::Debug for FleetSupervisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FleetSupervisor")
            .field("started", &self.workers.len())
            .field("running", &self.watchers.len())
            .finish()
    }
}
