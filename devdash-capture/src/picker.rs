//! Host-UI collaborator contract for manual browser selection.
//!
//! When automatic discovery exhausts its candidates, the capture manager
//! falls back to asking the embedding host to let the user pick a binary
//! interactively. The host side of that conversation is out of scope here;
//! this trait is its interface boundary.

use std::path::PathBuf;

/// Lets the user choose a browser executable when discovery fails.
pub trait BrowserPicker {
    /// Whether this picker can actually offer a selection. Discovery treats
    /// a non-interactive picker as "no browser available" rather than
    /// "selection declined".
    fn can_pick(&self) -> bool {
        true
    }

    /// Ask the user for a browser executable. `None` means cancelled.
    fn pick_browser(&self) -> Option<PathBuf>;
}

/// The no-op picker for non-interactive hosts.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPicker;

impl BrowserPicker for NoPicker {
    fn can_pick(&self) -> bool {
        false
    }

    fn pick_browser(&self) -> Option<PathBuf> {
        None
    }
}
