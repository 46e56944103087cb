//! Headless screenshot invocation with bounded subprocess lifetime.
//!
//! The capture writes directly to the target file, so the subprocess runs
//! with every stdio stream discarded. Success requires BOTH a zero exit
//! code AND the target file existing afterwards; either condition failing
//! alone is a capture failure carrying the exit code.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::browser::find_browser_binary;
use crate::error::CaptureError;
use crate::picker::BrowserPicker;

/// Default bounded lifetime for a capture subprocess.
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// Default window-size hint.
pub const DEFAULT_WINDOW_SIZE: &str = "1280x800";

/// One capture invocation. Invocations are independent: each gets its own
/// subprocess and timer, and no state is shared between them.
#[derive(Debug, Clone)]
pub struct ScreenshotRequest {
    pub url: String,
    pub out_path: PathBuf,
    /// `WIDTHxHEIGHT`, e.g. `"1280x800"`.
    pub window_size: String,
    /// Per-platform browser overrides, keyed by `std::env::consts::OS` names.
    pub custom_paths: Option<HashMap<String, PathBuf>>,
    /// Overrides [`DEFAULT_TIMEOUT_MS`].
    pub timeout_ms: Option<u64>,
}

/// Parse a `WIDTHxHEIGHT` hint into two positive integers.
pub fn parse_window_size(hint: &str) -> Result<(u32, u32), CaptureError> {
    let invalid = || CaptureError::InvalidWindowSize(hint.to_string());
    let (w, h) = hint.split_once('x').ok_or_else(invalid)?;
    let width: u32 = w.trim().parse().map_err(|_| invalid())?;
    let height: u32 = h.trim().parse().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(invalid());
    }
    Ok((width, height))
}

/// Produce an image file at `req.out_path` by driving a locally available
/// browser in headless capture mode.
pub async fn take_screenshot(
    req: &ScreenshotRequest,
    picker: &dyn BrowserPicker,
) -> Result<(), CaptureError> {
    let (width, height) = parse_window_size(&req.window_size)?;
    let browser = find_browser_binary(req.custom_paths.as_ref(), picker)?;
    let args = capture_args(width, height, &req.out_path, &req.url);
    let timeout = Duration::from_millis(req.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS));

    tracing::debug!(
        browser = %browser.display(),
        url = %req.url,
        out = %req.out_path.display(),
        "spawning capture subprocess"
    );
    run_capture(&browser, &args, &req.out_path, timeout).await
}

fn capture_args(width: u32, height: u32, out_path: &Path, url: &str) -> Vec<OsString> {
    let mut screenshot_arg = OsString::from("--screenshot=");
    screenshot_arg.push(out_path);
    vec![
        OsString::from("--headless=new"),
        OsString::from("--disable-gpu"),
        OsString::from("--hide-scrollbars"),
        OsString::from(format!("--window-size={width},{height}")),
        screenshot_arg,
        OsString::from(url),
    ]
}

/// Spawn `binary` and supervise it: the exit notification races the timeout,
/// first to fire wins. On expiry the child receives a hard kill (SIGKILL on
/// Unix) which is awaited before the timeout is reported, so no zombie
/// outlives the call.
async fn run_capture(
    binary: &Path,
    args: &[OsString],
    out_path: &Path,
    timeout: Duration,
) -> Result<(), CaptureError> {
    let mut child = Command::new(binary)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(CaptureError::Spawn)?;

    let status = match tokio::time::timeout(timeout, child.wait()).await {
        Ok(waited) => waited.map_err(CaptureError::Wait)?,
        Err(_elapsed) => {
            if let Err(err) = child.kill().await {
                tracing::warn!(error = %err, "failed to kill timed-out capture subprocess");
            }
            return Err(CaptureError::Timeout {
                timeout_ms: timeout.as_millis() as u64,
            });
        }
    };

    if status.success() && out_path.exists() {
        Ok(())
    } else {
        Err(CaptureError::ProcessFailed {
            code: status.code(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
