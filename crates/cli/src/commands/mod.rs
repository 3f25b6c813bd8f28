//! List commands shared by members and users.
//!
//! Every command loads the collection first and then works through a
//! [`ListStore`], so the CLI goes through exactly the same paths as any other
//! front end.

pub mod delete;
pub mod edit;
pub mod list;

use std::io::{self, Write};

use rollcall_admin::components::TableRow;
use rollcall_admin::{
    CollectionClient, ConfigError, ListStore, NoticeLevel, RecordClient, RecordService, SyncError,
};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A load, edit or delete failed.
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// Writing output failed.
    #[error("Output error: {0}")]
    Io(#[from] io::Error),

    /// `edit` was called without any field to change.
    #[error("Nothing to change: pass at least one field to update")]
    NothingToEdit,
}

/// Store for `R` backed by the HTTP client.
pub type Store<R> = ListStore<R, CollectionClient<R>>;

/// Create a store for `R` and load the collection into it.
///
/// # Errors
///
/// Returns the load error.
pub async fn open<R: TableRow>(client: &RecordClient) -> Result<Store<R>, CliError> {
    let store = ListStore::new(client.collection::<R>());
    store.load().await?;
    Ok(store)
}

/// Write and drain the store's notices.
///
/// # Errors
///
/// Returns error if stdout cannot be written.
pub fn print_notices<R: TableRow, S: RecordService<R>>(
    store: &ListStore<R, S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    for notice in store.take_notices()? {
        match notice.level {
            NoticeLevel::Success => writeln!(out, "{notice}")?,
            NoticeLevel::Error => tracing::warn!("{notice}"),
        }
    }
    Ok(())
}
