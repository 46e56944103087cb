//! `devdash screenshot` — capture browser thumbnails.
//!
//! Single mode captures one project by id; `--missing` walks every project
//! that has a URL but no thumbnail artifact yet, capped per run, skipping
//! individual failures.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use devdash_capture::{take_screenshot, NoPicker, ScreenshotRequest};
use devdash_core::Project;
use devdash_store::ProjectStore;

use super::{open_store, project::find_project};
use crate::{paths, settings::Settings};

#[derive(Args, Debug)]
pub struct ScreenshotArgs {
    /// Project id to capture.
    #[arg(conflicts_with = "missing")]
    pub id: Option<String>,

    /// Capture every project that has a URL but no thumbnail yet.
    #[arg(long)]
    pub missing: bool,

    /// URL to capture; stored on the project before capturing.
    #[arg(long, conflicts_with = "missing")]
    pub url: Option<String>,

    /// Window size as WIDTHxHEIGHT (defaults from settings).
    #[arg(long = "window-size")]
    pub window_size: Option<String>,

    /// Subprocess lifetime bound in milliseconds (defaults from settings).
    #[arg(long = "timeout-ms")]
    pub timeout_ms: Option<u64>,

    /// Explicit browser binary, overriding discovery.
    #[arg(long)]
    pub browser: Option<PathBuf>,

    /// Cap on captures per --missing run (defaults from settings).
    #[arg(long, requires = "missing")]
    pub max: Option<usize>,
}

impl ScreenshotArgs {
    pub fn run(self) -> Result<()> {
        let settings = Settings::load_at(&paths::settings_path()?);
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to build async runtime")?;

        let mut store = open_store()?;
        if self.missing {
            runtime.block_on(self.capture_missing(&mut store, &settings))
        } else {
            runtime.block_on(self.capture_single(&mut store, &settings))
        }
    }

    async fn capture_single(&self, store: &mut ProjectStore, settings: &Settings) -> Result<()> {
        let Some(id) = &self.id else {
            bail!("pass a project id, or --missing to fill in absent thumbnails");
        };
        let mut project = find_project(store.state(), id)?.clone();

        let url = match self.url.clone().or_else(|| project.url.clone()) {
            Some(url) => url,
            None => bail!("project '{id}' has no URL; pass --url"),
        };
        // An explicitly provided URL is persisted before the capture runs.
        if self.url.is_some() && project.url.as_deref() != Some(url.as_str()) {
            project.url = Some(url.clone());
            store.upsert_project(project.clone());
        }

        let dest = paths::thumbnail_path(&project.id)?;
        self.capture(&url, dest.clone(), settings).await?;

        project.thumbnail_uri = Some(dest.display().to_string());
        store.upsert_project(project);
        println!("✓ Screenshot saved to {}", dest.display());
        Ok(())
    }

    async fn capture_missing(&self, store: &mut ProjectStore, settings: &Settings) -> Result<()> {
        let cap = self.max.unwrap_or(settings.auto_screenshot_max_per_load);
        if cap == 0 {
            println!("Nothing to capture (cap is 0).");
            return Ok(());
        }

        let mut candidates: Vec<Project> = store.state().projects.to_vec();
        candidates.sort_by_key(|p| p.order);

        let mut captured = 0usize;
        for mut project in candidates {
            if captured >= cap {
                break;
            }
            let Some(url) = project.url.clone() else {
                continue;
            };
            let dest = paths::thumbnail_path(&project.id)?;
            if dest.exists() {
                continue;
            }
            match self.capture(&url, dest.clone(), settings).await {
                Ok(()) => {
                    project.thumbnail_uri = Some(dest.display().to_string());
                    store.upsert_project(project);
                    captured += 1;
                }
                Err(err) => {
                    tracing::warn!(
                        project = %project.id,
                        error = %err,
                        "skipping project after failed capture"
                    );
                }
            }
        }

        if captured == 0 {
            println!("Nothing to capture.");
        } else {
            println!("✓ Captured {captured} thumbnail(s)");
        }
        Ok(())
    }

    async fn capture(&self, url: &str, dest: PathBuf, settings: &Settings) -> Result<()> {
        if let Some(dir) = dest.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }

        let request = ScreenshotRequest {
            url: url.to_string(),
            out_path: dest,
            window_size: self
                .window_size
                .clone()
                .unwrap_or_else(|| settings.screenshot.window_size.clone()),
            custom_paths: self.custom_paths(settings)?,
            timeout_ms: Some(self.timeout_ms.unwrap_or(settings.screenshot.timeout_ms)),
        };
        take_screenshot(&request, &NoPicker).await?;
        Ok(())
    }

    /// Settings-level browser overrides, with `--browser` layered on top for
    /// the current platform.
    fn custom_paths(&self, settings: &Settings) -> Result<Option<HashMap<String, PathBuf>>> {
        let mut paths = settings.screenshot.browser_paths.clone();
        if let Some(browser) = &self.browser {
            if !browser.exists() {
                bail!("browser binary {} does not exist", browser.display());
            }
            paths
                .get_or_insert_with(HashMap::new)
                .insert(std::env::consts::OS.to_string(), browser.clone());
        }
        Ok(paths)
    }
}
