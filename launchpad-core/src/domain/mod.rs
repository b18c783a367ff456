//! Core domain types
//!
//! This module contains the core domain structures used across Launchpad crates.
//! These types represent the managed job resource and are shared between the
//! lifecycle service (which produces them) and the CLI (which persists and prints them).

pub mod diagnostic;
pub mod extra_vars;
pub mod job;
pub mod status;
