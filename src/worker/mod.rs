//! Per-account polling worker.
//!
//! Owns the update cursor, classifies fetched updates and hands reactions
//! to a bounded per-account dispatcher.

mod account;
mod classify;
mod cursor;
mod reactions;
mod state;

pub use account::{AccountWorker, WorkerError};
pub use classify::{Disposition, SkipReason, classify};
pub use cursor::UpdateCursor;
pub use reactions::{ReactionDispatcher, SubmitError};
pub use state::{CycleReport, WorkerState};
