use crate::commands::{report_issues, CmdMessage, CmdResult};
use crate::directory::UserStore;
use crate::error::{DirectoryError, Result};
use crate::model::{UserId, UserPatch};
use crate::store::BlobStore;
use crate::validate::validate_user;

pub fn run<B: BlobStore>(
    store: &mut UserStore<B>,
    id: UserId,
    patch: &UserPatch,
    force: bool,
) -> Result<CmdResult> {
    let mut user = store
        .find(id)
        .cloned()
        .ok_or(DirectoryError::UserNotFound(id))?;
    let mut result = CmdResult::default();

    if patch.is_empty() {
        result.add_message(CmdMessage::info(format!("Nothing to change for user {}", id)));
        return Ok(result);
    }

    patch.apply(&mut user);
    if report_issues(&mut result, &validate_user(&user), force) {
        return Ok(result);
    }

    store.edit_user(user.clone())?;
    result.add_message(CmdMessage::success(format!(
        "User updated ({}): {}",
        user.id, user.name
    )));
    result.affected_users.push(user);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewUser;
    use crate::persistence::UserPersistence;
    use crate::store::memory::MemBlobStore;

    fn store_with_ann() -> (UserStore<MemBlobStore>, UserId) {
        let mut store = UserStore::initialize(UserPersistence::new(MemBlobStore::new()));
        let ann = store.add_user(NewUser::new("Ann", "ann@x.com"));
        (store, ann.id)
    }

    #[test]
    fn applies_patch_and_persists() {
        let (mut store, id) = store_with_ann();
        let patch = UserPatch {
            phone: Some("555-0100".into()),
            ..UserPatch::default()
        };
        run(&mut store, id, &patch, false).unwrap();

        assert_eq!(store.find(id).unwrap().phone, "555-0100");
        assert_eq!(store.persistence().load()[0].phone, "555-0100");
    }

    #[test]
    fn unknown_id_is_not_found() {
        let (mut store, _) = store_with_ann();
        let patch = UserPatch {
            name: Some("Ghost".into()),
            ..UserPatch::default()
        };
        let result = run(&mut store, 12345, &patch, false);
        assert!(matches!(result, Err(DirectoryError::UserNotFound(12345))));
    }

    #[test]
    fn invalid_patch_is_not_saved() {
        let (mut store, id) = store_with_ann();
        let patch = UserPatch {
            email: Some("".into()),
            ..UserPatch::default()
        };
        let result = run(&mut store, id, &patch, false).unwrap();

        assert!(result.has_errors());
        assert_eq!(store.find(id).unwrap().email, "ann@x.com");
    }

    #[test]
    fn empty_patch_is_a_no_op() {
        let (mut store, id) = store_with_ann();
        let writes = store.persistence().backend().write_count();
        let result = run(&mut store, id, &UserPatch::default(), false).unwrap();

        assert!(result.affected_users.is_empty());
        assert_eq!(store.persistence().backend().write_count(), writes);
    }
}
