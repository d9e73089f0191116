//! Shared test utilities for the pack-installer workspace.
//!
//! This crate provides standardised pack fixtures so crate test suites do not
//! each hand-roll a pack tree. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`pack`]: [`TestPack`] builder for a pack source tree and a target project

pub mod pack;

pub use pack::TestPack;
