use crate::commands::{CmdMessage, CmdResult};
use crate::directory::UserStore;
use crate::error::Result;
use crate::remote::UserSource;
use crate::store::BlobStore;

/// Pull the remote collection into the store.
///
/// A failed fetch is not an `Err`: it is reported as an error message carrying
/// the store's `last_error`, and the caller may simply run this again.
pub async fn run<B, S>(store: &mut UserStore<B>, source: &S) -> Result<CmdResult>
where
    B: BlobStore,
    S: UserSource + ?Sized,
{
    let mut result = CmdResult::default();

    match store.refresh(source).await {
        Ok(report) => {
            let message = match report.added {
                0 => "Directory is up to date".to_string(),
                1 => "Fetched 1 new user".to_string(),
                n => format!("Fetched {} new users", n),
            };
            result.add_message(CmdMessage::success(message));
        }
        Err(error) => {
            let summary = store
                .last_error()
                .map(str::to_string)
                .unwrap_or_else(|| error.user_message());
            result.add_message(CmdMessage::error(summary));
            result.add_message(CmdMessage::info(format!(
                "({}) Run `userdir refresh` to try again.",
                error
            )));
        }
    }

    Ok(result)
}
