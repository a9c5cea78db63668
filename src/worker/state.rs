//! Account worker lifecycle state.

use std::fmt;

use super::cursor::UpdateCursor;

/// Lifecycle of one account worker.
///
/// ```text
/// Uninitialized -> Identifying -> Failed
///                              -> Configuring -> Running
/// ```
///
/// `Failed` is terminal. `Running` has no exit under normal operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WorkerState {
    #[default]
    Uninitialized,
    Identifying,
    Failed,
    Configuring,
    Running,
}

impl WorkerState {
    /// Whether `next` is a legal successor of this state.
    #[must_use]
    pub const fn can_move_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Uninitialized, Self::Identifying)
                | (Self::Identifying, Self::Failed | Self::Configuring)
                | (Self::Configuring, Self::Running)
        )
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Identifying => "identifying",
            Self::Failed => "failed",
            Self::Configuring => "configuring",
            Self::Running => "running",
        };
        f.write_str(name)
    }
}

/// Outcome of one fetch, dispatch and advance cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Updates returned by the fetch.
    pub fetched: usize,

    /// Welcome replies attempted.
    pub welcomed: usize,

    /// Reactions handed to the dispatcher.
    pub reactions_queued: usize,

    /// Reactions the dispatcher refused.
    pub reactions_dropped: usize,

    /// Updates that needed no action or could not be read.
    pub skipped: usize,

    /// Cursor after the batch.
    pub cursor: UpdateCursor,
}

impl CycleReport {
    /// Returns `true` if the fetch returned nothing.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.fetched == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        assert_eq!(WorkerState::default(), WorkerState::Uninitialized);
    }

    #[test]
    fn test_legal_transitions() {
        assert!(WorkerState::Uninitialized.can_move_to(WorkerState::Identifying));
        assert!(WorkerState::Identifying.can_move_to(WorkerState::Failed));
        assert!(WorkerState::Identifying.can_move_to(WorkerState::Configuring));
        assert!(WorkerState::Configuring.can_move_to(WorkerState::Running));
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!WorkerState::Uninitialized.can_move_to(WorkerState::Running));
        assert!(!WorkerState::Failed.can_move_to(WorkerState::Identifying));
        assert!(!WorkerState::Running.can_move_to(WorkerState::Failed));
        assert!(!WorkerState::Configuring.can_move_to(WorkerState::Failed));
    }

    #[test]
    fn test_empty_report_is_idle() {
        assert!(CycleReport::default().is_idle());
    }
}
