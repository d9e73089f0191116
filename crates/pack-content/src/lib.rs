//! Structured editing of host configuration documents
//!
//! Host configurations keep a registry section (e.g. `expansionPacks`) with
//! one entry per installed pack. The handlers in this crate read and upsert
//! such entries in YAML, JSON and TOML documents while leaving the rest of
//! the document alone.

pub mod diff;
pub mod error;
pub mod format;
pub mod handlers;

pub use diff::{DiffStats, unified_diff};
pub use error::{Error, Result};
pub use format::{Format, RegistryHandler};
pub use handlers::{JsonHandler, TomlHandler, YamlHandler};
