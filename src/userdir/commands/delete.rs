use crate::commands::{CmdMessage, CmdResult};
use crate::directory::UserStore;
use crate::error::{DirectoryError, Result};
use crate::model::UserId;
use crate::store::BlobStore;

pub fn run<B: BlobStore>(store: &mut UserStore<B>, ids: &[UserId]) -> Result<CmdResult> {
    // All or nothing: an unknown id aborts before anything is removed.
    if let Some(&missing) = ids.iter().find(|&&id| store.find(id).is_none()) {
        return Err(DirectoryError::UserNotFound(missing));
    }

    let mut result = CmdResult::default();

    for &id in ids {
        if result.affected_users.iter().any(|u| u.id == id) {
            continue;
        }
        let user = store.delete_user(id)?;
        result.add_message(CmdMessage::success(format!(
            "User deleted ({}): {}",
            user.id, user.name
        )));
        result.affected_users.push(user);
    }

    Ok(result)
}
