//! Content fingerprints for drift detection
//!
//! A fingerprint is a fixed-length (16 lowercase hex characters) identifier of
//! a byte sequence. It depends on content only, never on file metadata, and is
//! used to notice that an installed file changed. It is not a security
//! primitive.

use std::fmt;
use std::hash::Hasher;
use std::path::Path;
use std::str::FromStr;

use fxhash::FxHasher64;
use serde::{Deserialize, Serialize};

/// Number of hex characters in a rendered fingerprint.
pub const FINGERPRINT_LEN: usize = 16;

/// A content fingerprint, rendered as 16 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Get the hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Fingerprint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != FINGERPRINT_LEN {
            return Err(format!(
                "fingerprint must be {FINGERPRINT_LEN} hex characters, got {:?}",
                s
            ));
        }
        if !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("fingerprint contains non-hex characters: {:?}", s));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Fingerprint> for String {
    fn from(value: Fingerprint) -> Self {
        value.0
    }
}

/// Compute the fingerprint of a byte slice.
pub fn fingerprint_bytes(content: &[u8]) -> Fingerprint {
    let mut hasher = FxHasher64::default();
    hasher.write(content);
    // Trailing zero bytes are otherwise absorbed by the tail handling.
    hasher.write_u64(content.len() as u64);
    Fingerprint(format!("{:016x}", hasher.finish()))
}

/// Compute the fingerprint of a file's contents.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn fingerprint_file(path: &Path) -> std::io::Result<Fingerprint> {
    let content = std::fs::read(path)?;
    Ok(fingerprint_bytes(&content))
}
