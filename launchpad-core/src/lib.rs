//! Launchpad Core
//!
//! Core types and abstractions for launching and tracking remote automation jobs.
//!
//! This crate contains:
//! - Domain types: Job records, job status vocabulary, extra variables, diagnostics
//! - DTOs: Wire models for the automation platform API and the resource configuration
//! - Ignored-field reporting for fields the platform declined to honor

pub mod domain;
pub mod dto;
pub mod ignored;
