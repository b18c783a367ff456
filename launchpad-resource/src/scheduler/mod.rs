//! Scheduler layer
//!
//! This layer handles waiting on launched jobs: polling the platform for
//! their status until they reach a final state, time out or are cancelled.

pub mod poller;

pub use poller::{CompletionPoller, PollClass, PollStep};
