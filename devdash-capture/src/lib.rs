//! DevDash capture — browser discovery and the screenshot subprocess manager.
//!
//! Given a URL, a target file path and a window-size hint, produce an image
//! file at that path using a locally available browser's headless capture
//! mode, or fail with a clear reason. Each invocation supervises exactly one
//! subprocess with a bounded lifetime; concurrent invocations are fully
//! independent.

pub mod browser;
pub mod error;
pub mod picker;
pub mod screenshot;

pub use browser::find_browser_binary;
pub use error::CaptureError;
pub use picker::{BrowserPicker, NoPicker};
pub use screenshot::{
    parse_window_size, take_screenshot, ScreenshotRequest, DEFAULT_TIMEOUT_MS,
    DEFAULT_WINDOW_SIZE,
};
