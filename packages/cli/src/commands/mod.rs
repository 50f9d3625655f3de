pub mod apply;
pub mod documents;
pub mod init;
pub mod migrate;
pub mod validate;

pub use apply::{apply, ApplyArgs};
pub use documents::{delete, list, new, show, DeleteArgs, NewArgs, ShowArgs};
pub use init::{init, InitArgs};
pub use migrate::{migrate, MigrateArgs};
pub use validate::{validate, ValidateArgs};

use anyhow::Result;
use mailcraft_workspace::{FileStore, Workspace};

use crate::config::Config;

/// Workspace over the configured file store
pub(crate) async fn open_workspace(config: &Config, cwd: &str) -> Result<Workspace<FileStore>> {
    let store = FileStore::open(config.get_store_dir(cwd)).await?;
    Ok(Workspace::with_options(store, config.workspace_options()))
}
