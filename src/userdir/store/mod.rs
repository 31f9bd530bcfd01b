//! # Storage Layer
//!
//! Local persistence is modeled as an opaque key-value blob store: a key maps to
//! one string value, `get` reads it back, `set` overwrites it. Nothing above this
//! layer knows whether the blob lives in a file, in memory, or elsewhere.
//!
//! ## Implementations
//!
//! - [`fs::FsBlobStore`]: Production storage, one JSON file per key inside the
//!   data directory. Writes go to a temp file first and are renamed into place,
//!   so a crash never leaves a half-written blob behind.
//! - [`memory::MemBlobStore`]: In-memory storage for testing, with a switch to
//!   simulate write faults.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── users.json          # Serialized user collection (key "users")
//! └── config.json         # Directory configuration
//! ```
//!
//! Interpretation of the blob (JSON decoding, corruption handling) belongs to
//! [`crate::persistence`], not to the stores.

use crate::error::{DirectoryError, Result};

pub mod fs;
pub mod memory;

/// Abstract interface for durable key-value blob storage.
pub trait BlobStore {
    /// Read the value stored under `key`.
    /// Returns `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<B: BlobStore + ?Sized> BlobStore for &B {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// Keys double as file names, so keep them to a safe alphabet.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(DirectoryError::Store(format!("Invalid storage key: {:?}", key)))
    }
}
