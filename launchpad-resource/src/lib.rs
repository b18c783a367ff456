//! Launchpad Resource
//!
//! Lifecycle management of a job launched from a job template on an automation
//! platform.
//!
//! Architecture:
//! - Configuration: Client connection settings and poller tuning
//! - Launch: Builds and submits launch requests
//! - Scheduler: Polls launched jobs until they reach a final state
//! - Services: Create/read/update/delete composed from the above
//!
//! Create and update always launch a new job. If the resource asks to wait for
//! completion, the call blocks until the job reaches a final state, the configured
//! timeout passes, or the caller cancels.

pub mod config;
pub mod error;
pub mod launch;
pub mod scheduler;
pub mod service;

#[cfg(test)]
mod testing;

pub use config::{ClientConfig, PollConfig};
pub use error::{JobError, Result};
pub use launch::LaunchController;
pub use scheduler::CompletionPoller;
pub use service::{JobLifecycle, LifecycleResponse, StandardJobLifecycle, StateChange};
