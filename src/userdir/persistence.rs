//! Persistence adapter: the user collection as one JSON snapshot in a [`BlobStore`].
//!
//! Faults never reach the caller. A missing, unreadable, or corrupt blob loads as
//! an empty collection, and a failed write leaves the in-memory collection as the
//! only copy for the rest of the session. Both cases are logged.

use crate::model::User;
use crate::store::BlobStore;
use std::collections::HashSet;
use tracing::warn;

pub const DEFAULT_STORAGE_KEY: &str = "users";

pub struct UserPersistence<B: BlobStore> {
    backend: B,
    key: String,
}

impl<B: BlobStore> UserPersistence<B> {
    pub fn new(backend: B) -> Self {
        Self::with_key(backend, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Load the persisted collection. Never fails.
    pub fn load(&self) -> Vec<User> {
        let raw = match self.backend.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to read persisted users");
                return Vec::new();
            }
        };

        let users: Vec<User> = match serde_json::from_str(&raw) {
            Ok(users) => users,
            Err(e) => {
                warn!(key = %self.key, error = %e, "persisted users are corrupt, starting empty");
                return Vec::new();
            }
        };

        dedupe_by_id(users)
    }

    /// Overwrite the persisted collection. Returns whether the write landed.
    pub fn save<'a, I>(&self, users: I) -> bool
    where
        I: IntoIterator<Item = &'a User>,
    {
        let snapshot: Vec<&User> = users.into_iter().collect();
        let encoded = match serde_json::to_string(&snapshot) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to encode users");
                return false;
            }
        };

        match self.backend.set(&self.key, &encoded) {
            Ok(()) => true,
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to persist users");
                false
            }
        }
    }
}

fn dedupe_by_id(users: Vec<User>) -> Vec<User> {
    let mut seen = HashSet::with_capacity(users.len());
    let total = users.len();
    let unique: Vec<User> = users.into_iter().filter(|u| seen.insert(u.id)).collect();
    if unique.len() != total {
        warn!(
            dropped = total - unique.len(),
            "persisted users contained duplicate ids"
        );
    }
    unique
}
