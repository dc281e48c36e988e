//! Platform backends for the accessibility-tree provider, the
//! window/process bridge and keystroke injection.

use std::sync::Arc;

use crate::bridge::{KeystrokeInjector, WindowBridge};
use crate::errors::AutomationError;
use crate::provider::UiTreeProvider;

#[cfg(target_os = "windows")]
pub mod windows;

/// The three collaborators a session is assembled from.
pub type PlatformParts = (
    Arc<dyn UiTreeProvider>,
    Arc<dyn WindowBridge>,
    Arc<dyn KeystrokeInjector>,
);

/// Construct the platform's provider, window bridge and keystroke
/// injector. The provider connection lives as long as the returned
/// handles.
#[cfg(target_os = "windows")]
pub fn create_platform() -> Result<PlatformParts, AutomationError> {
    let provider = Arc::new(windows::WindowsProvider::new()?);
    Ok((
        provider,
        Arc::new(windows::WindowsBridge::new()),
        Arc::new(windows::WindowsKeyboard),
    ))
}

#[cfg(not(target_os = "windows"))]
pub fn create_platform() -> Result<PlatformParts, AutomationError> {
    Err(AutomationError::PlatformError(
        "No accessibility provider is available on this platform".to_string(),
    ))
}
