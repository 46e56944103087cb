//! Error types for devdash-capture.

use thiserror::Error;

/// All errors that can arise from a capture invocation. Every variant is
/// surfaced per-invocation to the caller, which decides whether to notify
/// the user — one project's failed capture never affects another's.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The window-size hint was not `WIDTHxHEIGHT` with positive integers.
    #[error("invalid window size '{0}'; expected WIDTHxHEIGHT, e.g. 1280x800")]
    InvalidWindowSize(String),

    /// No candidate browser resolved and no interactive picker is available.
    #[error("no browser available for screenshots; install Chrome, Chromium or Edge, or configure a browser path")]
    BrowserNotFound,

    /// An interactive picker was offered and the user declined to choose.
    #[error("no browser selected for screenshots")]
    NoBrowserSelected,

    /// The browser process could not be spawned (binary not executable,
    /// missing, etc.). Surfaces immediately; no timer is left running.
    #[error("failed to launch browser process: {0}")]
    Spawn(#[source] std::io::Error),

    /// Waiting on the spawned process failed at the OS level.
    #[error("failed waiting for browser process: {0}")]
    Wait(#[source] std::io::Error),

    /// The process outlived its bounded lifetime and was force-killed.
    #[error("screenshot timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    /// The process exited abnormally, or exited cleanly without producing
    /// the target file.
    #[error("screenshot failed (exit code {})", fmt_code(.code))]
    ProcessFailed { code: Option<i32> },
}

fn fmt_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_failed_message_includes_exit_code() {
        let err = CaptureError::ProcessFailed { code: Some(21) };
        assert!(err.to_string().contains("exit code 21"));

        let signalled = CaptureError::ProcessFailed { code: None };
        assert!(signalled.to_string().contains("unknown"));
    }

    #[test]
    fn timeout_message_includes_bound() {
        let err = CaptureError::Timeout { timeout_ms: 15000 };
        assert!(err.to_string().contains("15000 ms"));
    }
}
