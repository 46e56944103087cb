//! devdash subcommand implementations.

pub mod group;
pub mod project;
pub mod screenshot;
pub mod transfer;

use anyhow::Result;
use devdash_store::ProjectStore;

use crate::paths;

/// Open the store under the user's home. Opening never fails; only a missing
/// home directory does.
pub(crate) fn open_store() -> Result<ProjectStore> {
    Ok(ProjectStore::open_at(&paths::data_dir()?))
}
