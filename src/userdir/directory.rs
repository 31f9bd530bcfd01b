//! # User Store
//!
//! [`UserStore`] holds the authoritative in-memory collection for a session and
//! is the only thing allowed to mutate it. Every successful mutation and every
//! successful merge is written through to [`UserPersistence`] before the call
//! returns.
//!
//! ## Collection
//!
//! Users live in an `IndexMap` keyed by id: insertion order is display order,
//! membership checks during a merge are O(1), and id uniqueness is structural.
//!
//! ## Refresh and Merge
//!
//! A refresh fetches the remote collection and merges it into the local one:
//!
//! ```text
//! merged = local ∪ { u ∈ remote : u.id ∉ ids(local) }
//! ```
//!
//! Local records always win on an id conflict, remote-only records are appended
//! in the order the server returned them, and nothing local is ever removed.
//!
//! A refresh has two halves, [`UserStore::begin_refresh`] and
//! [`UserStore::complete_refresh`], so callers can keep mutating while the fetch
//! is in flight. [`UserStore::refresh`] runs both around a [`UserSource`] call.
//! Each refresh carries a generation number. Completions always merge against
//! the collection as it is *now*, so mutations made during the flight survive.
//! Only the newest refresh gets to set `status`; an older one finishing late
//! still merges and persists but leaves the status alone.

use crate::error::{DirectoryError, Result};
use crate::model::{NewUser, User, UserId};
use crate::persistence::UserPersistence;
use crate::remote::{FetchError, UserSource};
use crate::store::BlobStore;
use chrono::Utc;
use indexmap::IndexMap;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStatus {
    Idle,
    Loading,
    Error,
}

/// Handle for one in-flight refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a refresh ticket must be passed to complete_refresh"]
pub struct RefreshTicket {
    generation: u64,
}

impl RefreshTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Outcome of a successful merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Remote users appended to the collection.
    pub added: usize,
    /// Remote users skipped because their id was already present.
    pub skipped: usize,
}

pub struct UserStore<B: BlobStore> {
    users: IndexMap<UserId, User>,
    status: StoreStatus,
    last_error: Option<String>,
    persistence: UserPersistence<B>,
    generation: u64,
    last_issued_id: UserId,
}

impl<B: BlobStore> UserStore<B> {
    /// Build the store from whatever is persisted. Never fails; an absent or
    /// corrupt blob yields an empty collection.
    pub fn initialize(persistence: UserPersistence<B>) -> Self {
        let users: IndexMap<UserId, User> = persistence
            .load()
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        debug!(count = users.len(), "user store initialized");
        Self {
            users,
            status: StoreStatus::Idle,
            last_error: None,
            persistence,
            generation: 0,
            last_issued_id: 0,
        }
    }

    // --- Read access ---

    pub fn users(&self) -> impl ExactSizeIterator<Item = &User> + '_ {
        self.users.values()
    }

    pub fn to_vec(&self) -> Vec<User> {
        self.users.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn status(&self) -> StoreStatus {
        self.status
    }

    /// Present only while `status` is `Error`.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn find(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn persistence(&self) -> &UserPersistence<B> {
        &self.persistence
    }

    // --- Mutations ---

    /// Append a new user under a fresh id and persist.
    ///
    /// A preferred id on `input` is honored only when no user holds it yet.
    pub fn add_user(&mut self, input: NewUser) -> User {
        let id = match input.id {
            Some(id) if !self.users.contains_key(&id) => id,
            _ => self.next_id(),
        };
        self.last_issued_id = self.last_issued_id.max(id);
        let user = input.into_user(id);
        self.users.insert(id, user.clone());
        self.persist();
        user
    }

    /// Replace the user with `record.id` in place and persist.
    ///
    /// An unknown id leaves the collection untouched and nothing is written.
    pub fn edit_user(&mut self, record: User) -> Result<()> {
        let slot = self
            .users
            .get_mut(&record.id)
            .ok_or(DirectoryError::UserNotFound(record.id))?;
        *slot = record;
        self.persist();
        Ok(())
    }

    /// Remove the user with `id`, keeping the order of the rest, and persist.
    pub fn delete_user(&mut self, id: UserId) -> Result<User> {
        let removed = self
            .users
            .shift_remove(&id)
            .ok_or(DirectoryError::UserNotFound(id))?;
        self.persist();
        Ok(removed)
    }

    // --- Refresh ---

    /// Mark a refresh as started.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.generation += 1;
        self.status = StoreStatus::Loading;
        self.last_error = None;
        info!(generation = self.generation, "refresh started");
        RefreshTicket {
            generation: self.generation,
        }
    }

    /// Apply the result of the fetch started by `ticket`.
    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        fetched: std::result::Result<Vec<User>, FetchError>,
    ) -> std::result::Result<MergeReport, FetchError> {
        let is_latest = ticket.generation == self.generation;
        if !is_latest {
            debug!(
                generation = ticket.generation,
                latest = self.generation,
                "stale refresh completed"
            );
        }

        match fetched {
            Ok(remote) => {
                let report = self.merge(remote);
                self.persist();
                if is_latest {
                    self.status = StoreStatus::Idle;
                    self.last_error = None;
                }
                info!(
                    added = report.added,
                    skipped = report.skipped,
                    "refresh finished"
                );
                Ok(report)
            }
            Err(error) => {
                if is_latest {
                    self.status = StoreStatus::Error;
                    self.last_error = Some(error.user_message());
                }
                info!(error = %error, "refresh failed");
                Err(error)
            }
        }
    }

    /// Fetch from `source` and merge the result into the collection.
    pub async fn refresh<S: UserSource + ?Sized>(
        &mut self,
        source: &S,
    ) -> std::result::Result<MergeReport, FetchError> {
        let ticket = self.begin_refresh();
        let fetched = source.fetch_all().await;
        self.complete_refresh(ticket, fetched)
    }

    fn merge(&mut self, remote: Vec<User>) -> MergeReport {
        let mut report = MergeReport::default();
        for user in remote {
            if self.users.contains_key(&user.id) {
                report.skipped += 1;
            } else {
                self.users.insert(user.id, user);
                report.added += 1;
            }
        }
        report
    }

    fn persist(&self) {
        self.persistence.save(self.users.values());
    }

    fn next_id(&mut self) -> UserId {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let mut candidate = now.max(self.last_issued_id.saturating_add(1));
        while self.users.contains_key(&candidate) {
            match candidate.checked_add(1) {
                Some(next) => candidate = next,
                None => return self.lowest_free_id(),
            }
        }
        self.last_issued_id = candidate;
        candidate
    }

    /// Smallest positive id nobody holds, for when the upward search overflows.
    fn lowest_free_id(&self) -> UserId {
        let mut candidate: UserId = 1;
        while self.users.contains_key(&candidate) {
            candidate += 1;
        }
        debug!(id = candidate, "id space exhausted above, reusing a low id");
        candidate
    }
}
