//! Metadata for expansion packs.
//!
//! This crate loads and validates the pack descriptor (`config.yaml`) and
//! provides the data-driven table of content categories the installer
//! iterates over.

pub mod category;
pub mod descriptor;
pub mod error;

pub use category::{CategorySpec, default_categories};
pub use descriptor::{Declared, PackDescriptor};
pub use error::{Error, Result};
