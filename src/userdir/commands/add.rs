use crate::commands::{report_issues, CmdMessage, CmdResult};
use crate::directory::UserStore;
use crate::error::Result;
use crate::model::NewUser;
use crate::store::BlobStore;
use crate::validate::validate_user;

pub fn run<B: BlobStore>(store: &mut UserStore<B>, input: NewUser, force: bool) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    // Validate a draft; the real id is only allocated on submit.
    let draft = input.clone().into_user(input.id.unwrap_or_default());
    if report_issues(&mut result, &validate_user(&draft), force) {
        return Ok(result);
    }

    let user = store.add_user(input);
    result.add_message(CmdMessage::success(format!(
        "User added ({}): {}",
        user.id, user.name
    )));
    result.affected_users.push(user);
    Ok(result)
}
