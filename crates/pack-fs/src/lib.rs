//! Filesystem abstraction for the expansion pack installer
//!
//! Provides normalized path handling, content fingerprinting, safe I/O
//! operations and the on-disk layout of an installation.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod layout;
pub mod path;

pub use checksum::{Fingerprint, fingerprint_bytes, fingerprint_file};
pub use config::ConfigStore;
pub use constants::{DEFAULT_HOST_CONFIGS, PackPath};
pub use error::{Error, Result};
pub use layout::InstallLayout;
pub use path::{NormalizedPath, is_plain_file_name};
