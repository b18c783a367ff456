//! Data transfer objects
//!
//! Wire models for the automation platform API and the declarative resource
//! configuration consumed by the lifecycle service.

pub mod job;
pub mod resource;
