//! Service layer
//!
//! Services contain the lifecycle logic of the job resource. They orchestrate
//! the launch controller and the completion poller and turn their errors into
//! diagnostics.
//!
//! All services are trait-based to enable testing and dependency injection.

mod lifecycle;

// Re-export traits
pub use lifecycle::JobLifecycle;

// Re-export implementations
pub use lifecycle::{LifecycleResponse, StandardJobLifecycle, StateChange};
