//! `devdash export` and `devdash import`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use super::open_store;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Destination file.
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Source file. Replaces the dashboard state wholesale — this is not a
    /// merge.
    pub path: PathBuf,
}

impl ExportArgs {
    pub fn run(self) -> Result<()> {
        let store = open_store()?;
        store
            .export_to(&self.path)
            .with_context(|| format!("failed to export to {}", self.path.display()))?;
        println!("✓ Exported to {}", self.path.display());
        Ok(())
    }
}

impl ImportArgs {
    pub fn run(self) -> Result<()> {
        let mut store = open_store()?;
        store
            .import_from(&self.path)
            .with_context(|| format!("failed to import from {}", self.path.display()))?;
        let state = store.state();
        println!(
            "✓ Imported {} project(s), {} group(s)",
            state.projects.len(),
            state.groups.len()
        );
        Ok(())
    }
}
