//! CLI settings — `<home>/.devdash/settings.json`.
//!
//! Loading is lenient: a missing or malformed file yields the defaults, so
//! the settings file can never break a command. CLI flags override settings;
//! settings override the built-in defaults.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use devdash_capture::{DEFAULT_TIMEOUT_MS, DEFAULT_WINDOW_SIZE};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub screenshot: ScreenshotSettings,
    /// Cap on captures per `screenshot --missing` run.
    pub auto_screenshot_max_per_load: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScreenshotSettings {
    /// `WIDTHxHEIGHT` hint passed to the capture subprocess.
    pub window_size: String,
    pub timeout_ms: u64,
    /// Per-platform browser overrides, keyed by `std::env::consts::OS` names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_paths: Option<HashMap<String, PathBuf>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screenshot: ScreenshotSettings::default(),
            auto_screenshot_max_per_load: 3,
        }
    }
}

impl Default for ScreenshotSettings {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            browser_paths: None,
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults on any failure.
    pub fn load_at(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&contents) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "settings file unreadable, using defaults"
                );
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load_at(&tmp.path().join("settings.json"));
        assert_eq!(settings.screenshot.window_size, "1280x800");
        assert_eq!(settings.screenshot.timeout_ms, 15_000);
        assert_eq!(settings.auto_screenshot_max_per_load, 3);
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        std::fs::write(&path, "{nope").unwrap();
        let settings = Settings::load_at(&path);
        assert_eq!(settings.screenshot.window_size, "1280x800");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"screenshot": {"windowSize": "1024x768"}, "autoScreenshotMaxPerLoad": 5}"#,
        )
        .unwrap();
        let settings = Settings::load_at(&path);
        assert_eq!(settings.screenshot.window_size, "1024x768");
        assert_eq!(settings.screenshot.timeout_ms, 15_000, "default kept");
        assert_eq!(settings.auto_screenshot_max_per_load, 5);
    }

    #[test]
    fn browser_paths_deserialize_by_platform() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"screenshot": {"browserPaths": {"linux": "/opt/chromium/chrome"}}}"#,
        )
        .unwrap();
        let settings = Settings::load_at(&path);
        let paths = settings.screenshot.browser_paths.expect("paths");
        assert_eq!(paths["linux"], PathBuf::from("/opt/chromium/chrome"));
    }
}
