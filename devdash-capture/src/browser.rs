//! Browser binary discovery.
//!
//! Resolution order: caller-supplied per-platform override (accepted only if
//! the path exists), then a fixed platform candidate list (known install
//! paths on the desktop-GUI platforms, command names elsewhere), then the
//! interactive picker. A candidate is accepted if it exists as a file path
//! or resolves on the executable search path.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::CaptureError;
use crate::picker::BrowserPicker;

/// Locate a browser binary capable of headless capture.
///
/// `custom` maps platform names (`std::env::consts::OS` values: `"macos"`,
/// `"windows"`, `"linux"`, ...) to explicit binary paths.
pub fn find_browser_binary(
    custom: Option<&HashMap<String, PathBuf>>,
    picker: &dyn BrowserPicker,
) -> Result<PathBuf, CaptureError> {
    resolve(
        std::env::consts::OS,
        &platform_candidates(std::env::consts::OS),
        custom,
        picker,
    )
}

fn resolve(
    os: &str,
    candidates: &[PathBuf],
    custom: Option<&HashMap<String, PathBuf>>,
    picker: &dyn BrowserPicker,
) -> Result<PathBuf, CaptureError> {
    if let Some(override_path) = custom.and_then(|paths| paths.get(os)) {
        if override_path.exists() {
            return Ok(override_path.clone());
        }
        tracing::debug!(
            path = %override_path.display(),
            "configured browser override does not exist, falling back"
        );
    }

    for candidate in candidates {
        if resolves_to_binary(candidate) {
            return Ok(candidate.clone());
        }
    }

    if !picker.can_pick() {
        return Err(CaptureError::BrowserNotFound);
    }
    picker.pick_browser().ok_or(CaptureError::NoBrowserSelected)
}

/// A candidate counts if it exists on disk or resolves via the platform's
/// executable search path.
fn resolves_to_binary(candidate: &Path) -> bool {
    candidate.exists() || which::which(candidate).is_ok()
}

fn platform_candidates(os: &str) -> Vec<PathBuf> {
    match os {
        "macos" => vec![
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"),
            PathBuf::from("/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge"),
        ],
        "windows" => {
            let local = std::env::var_os("LOCALAPPDATA")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("C:/Users/Default/AppData/Local"));
            vec![
                local.join("Google/Chrome/Application/chrome.exe"),
                local.join("Microsoft/Edge/Application/msedge.exe"),
                PathBuf::from("chrome.exe"),
                PathBuf::from("msedge.exe"),
            ]
        }
        _ => vec![
            PathBuf::from("google-chrome"),
            PathBuf::from("chromium"),
            PathBuf::from("chromium-browser"),
        ],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
