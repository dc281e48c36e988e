//! OS-level window commands and keystroke injection, resolved by
//! process rather than through the accessibility tree.

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use crate::errors::AutomationError;
use crate::patterns::WindowVisualState;

/// A process that owns a visible top-level window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessWindow {
    pub pid: u32,
    /// Human-readable process description, e.g. "notepad.exe (4242)".
    pub description: String,
    /// Title of the process's main window.
    pub title: String,
}

/// Window-manager primitives consumed by the session.
pub trait WindowBridge: Send + Sync {
    /// Enumerate processes that own a visible top-level window.
    fn list_windows(&self) -> Result<Vec<ProcessWindow>, AutomationError>;

    /// Issue the OS show-window command for the process's main window.
    fn set_visual_state(&self, pid: u32, state: WindowVisualState)
        -> Result<(), AutomationError>;

    /// Ask the process to close its main window gracefully.
    fn request_close(&self, pid: u32) -> Result<(), AutomationError>;
}

/// Injects keystrokes into the currently focused target, blocking
/// until dispatched.
pub trait KeystrokeInjector: Send + Sync {
    fn send(&self, text: &str) -> Result<(), AutomationError>;
}

/// Find the first window whose process description matches `pattern`
/// as a case-insensitive regex.
pub(crate) fn find_window_by_process(
    windows: &[ProcessWindow],
    pattern: &str,
) -> Result<ProcessWindow, AutomationError> {
    let matcher = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| {
            AutomationError::InvalidArgument(format!("Bad process pattern '{pattern}': {e}"))
        })?;

    windows
        .iter()
        .find(|w| matcher.is_match(&w.description))
        .cloned()
        .ok_or_else(|| {
            AutomationError::ElementNotFound(format!(
                "No visible window for a process matching '{pattern}'"
            ))
        })
}
