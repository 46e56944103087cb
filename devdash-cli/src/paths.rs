//! DevDash filesystem layout.
//!
//! ```text
//! <home>/.devdash/
//!   projects.json      (durable state — owned by devdash-store)
//!   sync/slot.json     (sync mirror — owned by devdash-store)
//!   settings.json      (CLI settings)
//!   thumbnails/
//!     <project-id>.png
//! ```
//!
//! Every helper has an `_at(home)` form; tests always use those with a
//! `TempDir` home and never touch the real `dirs::home_dir()`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use devdash_core::ProjectId;

/// `<home>/.devdash/` — handed to [`devdash_store::ProjectStore::open_at`].
pub fn data_dir_at(home: &Path) -> PathBuf {
    home.join(".devdash")
}

pub fn data_dir() -> Result<PathBuf> {
    Ok(data_dir_at(&home()?))
}

/// `<home>/.devdash/settings.json`
pub fn settings_path_at(home: &Path) -> PathBuf {
    data_dir_at(home).join("settings.json")
}

pub fn settings_path() -> Result<PathBuf> {
    Ok(settings_path_at(&home()?))
}

/// `<home>/.devdash/thumbnails/<project-id>.png`
pub fn thumbnail_path_at(home: &Path, id: &ProjectId) -> PathBuf {
    data_dir_at(home)
        .join("thumbnails")
        .join(format!("{}.png", id.0))
}

pub fn thumbnail_path(id: &ProjectId) -> Result<PathBuf> {
    Ok(thumbnail_path_at(&home()?, id))
}

fn home() -> Result<PathBuf> {
    dirs::home_dir().context("cannot determine home directory; set $HOME or equivalent")
}
