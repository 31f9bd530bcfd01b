use crate::commands::{CmdMessage, CmdResult};
use crate::directory::UserStore;
use crate::error::{DirectoryError, Result};
use crate::model::UserId;
use crate::remote::UserSource;
use crate::store::BlobStore;

/// Look a user up locally, falling back to the remote API when `remote` is given.
///
/// A remote hit is shown but not added to the collection.
pub async fn run<B, S>(store: &UserStore<B>, remote: Option<&S>, id: UserId) -> Result<CmdResult>
where
    B: BlobStore,
    S: UserSource + ?Sized,
{
    if let Some(user) = store.find(id) {
        return Ok(CmdResult::default().with_listed_users(vec![user.clone()]));
    }

    let Some(source) = remote else {
        return Err(DirectoryError::UserNotFound(id));
    };

    match source.fetch_one(id).await? {
        Some(user) => {
            let mut result = CmdResult::default().with_listed_users(vec![user]);
            result.add_message(CmdMessage::info(
                "Not in the local directory; showing the remote record.",
            ));
            Ok(result)
        }
        None => Err(DirectoryError::UserNotFound(id)),
    }
}
