//! Fleet supervision.
//!
//! Starts one polling worker per configured bot account and keeps track of
//! them until they exit or the process shuts down.

mod supervisor;

pub use supervisor::{FleetSupervisor, WorkerExit};
