//! # API Facade
//!
//! The API layer is a thin facade over the command layer and the single entry
//! point for every directory operation, whatever UI sits on top.
//!
//! It dispatches to `commands/*.rs` and returns structured `CmdResult`s. It does
//! no terminal I/O and holds no business logic of its own.
//!
//! `DirectoryApi<B, S>` is generic over both seams:
//! - Production: `DirectoryApi<FsBlobStore, HttpUserSource>`
//! - Testing: `DirectoryApi<MemBlobStore, StaticSource>`

use crate::commands;
use crate::directory::UserStore;
use crate::error::Result;
use crate::model::{NewUser, UserId, UserPatch};
use crate::query::UserQuery;
use crate::remote::UserSource;
use crate::store::BlobStore;
use std::path::{Path, PathBuf};

pub struct DirectoryApi<B: BlobStore, S: UserSource> {
    store: UserStore<B>,
    source: S,
    config_dir: PathBuf,
}

impl<B: BlobStore, S: UserSource> DirectoryApi<B, S> {
    pub fn new(store: UserStore<B>, source: S, config_dir: PathBuf) -> Self {
        Self {
            store,
            source,
            config_dir,
        }
    }

    pub fn store(&self) -> &UserStore<B> {
        &self.store
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn add_user(&mut self, input: NewUser, force: bool) -> Result<commands::CmdResult> {
        commands::add::run(&mut self.store, input, force)
    }

    pub fn edit_user(
        &mut self,
        id: UserId,
        patch: &UserPatch,
        force: bool,
    ) -> Result<commands::CmdResult> {
        commands::edit::run(&mut self.store, id, patch, force)
    }

    pub fn delete_users(&mut self, ids: &[UserId]) -> Result<commands::CmdResult> {
        commands::delete::run(&mut self.store, ids)
    }

    pub fn list_users(&self, query: &UserQuery) -> Result<commands::CmdResult> {
        commands::list::run(&self.store, query)
    }

    /// `remote_fallback` allows a `GET /users/{id}` when the id is not local.
    pub async fn view_user(&self, id: UserId, remote_fallback: bool) -> Result<commands::CmdResult> {
        let remote = if remote_fallback {
            Some(&self.source)
        } else {
            None
        };
        commands::view::run(&self.store, remote, id).await
    }

    pub async fn refresh(&mut self) -> Result<commands::CmdResult> {
        commands::refresh::run(&mut self.store, &self.source).await
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.config_dir, action)
    }
}

pub use crate::commands::config::ConfigAction;
pub use crate::directory::{MergeReport, StoreStatus};
pub use crate::query::{SortKey, SortOrder};
pub use commands::{CmdMessage, CmdResult, MessageLevel};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewUser;
    use crate::persistence::UserPersistence;
    use crate::remote::fixtures::StaticSource;
    use crate::store::memory::MemBlobStore;
    use tempfile::TempDir;

    fn api(remote: Vec<crate::model::User>) -> (TempDir, DirectoryApi<MemBlobStore, StaticSource>) {
        let dir = TempDir::new().unwrap();
        let store = UserStore::initialize(UserPersistence::new(MemBlobStore::new()));
        let api = DirectoryApi::new(
            store,
            StaticSource::users(remote),
            dir.path().to_path_buf(),
        );
        (dir, api)
    }

    #[tokio::test]
    async fn add_then_refresh_keeps_local_fields() {
        let (_dir, mut api) = api(vec![
            NewUser::new("Leanne", "leanne@x.com").into_user(1),
            NewUser::new("Ann Remote", "other@x.com").into_user(999),
        ]);

        api.add_user(NewUser::new("Ann", "ann@x.com").with_id(999), false)
            .unwrap();
        api.refresh().await.unwrap();

        let listed = api.list_users(&UserQuery::default()).unwrap().listed_users;
        let summary: Vec<_> = listed.iter().map(|u| (u.id, u.email.as_str())).collect();
        assert_eq!(summary, vec![(999, "ann@x.com"), (1, "leanne@x.com")]);
        assert_eq!(api.store().status(), StoreStatus::Idle);
    }

    #[tokio::test]
    async fn view_without_fallback_does_not_hit_remote() {
        let (_dir, api) = api(vec![NewUser::new("Leanne", "l@x.com").into_user(1)]);
        assert!(api.view_user(1, false).await.is_err());
        assert!(api.view_user(1, true).await.is_ok());
    }

    #[test]
    fn dispatches_edit_and_delete() {
        let (_dir, mut api) = api(vec![]);
        let created = api
            .add_user(NewUser::new("Ann", "ann@x.com"), false)
            .unwrap()
            .affected_users
            .remove(0);

        let patch = UserPatch {
            name: Some("Anne".into()),
            ..UserPatch::default()
        };
        api.edit_user(created.id, &patch, false).unwrap();
        assert_eq!(api.store().find(created.id).unwrap().name, "Anne");

        api.delete_users(&[created.id]).unwrap();
        assert!(api.store().is_empty());
    }

    #[test]
    fn config_reads_from_config_dir() {
        let (_dir, api) = api(vec![]);
        api.config(ConfigAction::Set("auto-refresh".into(), "false".into()))
            .unwrap();
        let shown = api
            .config(ConfigAction::ShowKey("auto-refresh".into()))
            .unwrap();
        assert_eq!(shown.messages[0].content, "false");
    }
}
