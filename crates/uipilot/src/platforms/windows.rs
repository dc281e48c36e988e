//! Windows backend for UI automation
//!
//! Implements the provider over the Windows UI Automation API through
//! the uiautomation crate, the window bridge over `ShowWindow` /
//! `WM_CLOSE`, and keystroke injection over SendInput.

use std::any::Any;
use std::sync::Arc;

use sysinfo::System;
use tracing::debug;
use uiautomation::patterns::{
    UIExpandCollapsePattern, UIInvokePattern, UISelectionItemPattern, UITransformPattern,
    UIValuePattern, UIVirtualizedItemPattern, UIWindowPattern,
};
use uiautomation::types::UIProperty;
use uiautomation::variants::Variant;
use uiautomation::{UIAutomation, UIElement as UiaElement};
use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetWindowTextLengthW, GetWindowTextW, GetWindowThreadProcessId, IsWindowVisible,
    PostMessageW, ShowWindow, SW_MAXIMIZE, SW_MINIMIZE, SW_SHOWNORMAL, WM_CLOSE,
};

use crate::bridge::{KeystrokeInjector, ProcessWindow, WindowBridge};
use crate::errors::AutomationError;
use crate::patterns::{PatternOp, TransformCapabilities, WindowVisualState};
use crate::provider::{ElementHandle, ElementImpl, TreeScope, UiTreeProvider};
use crate::query::{Property, PropertyQuery};

fn map_uia_error(e: uiautomation::Error) -> AutomationError {
    AutomationError::PlatformError(format!("UI Automation error: {e}"))
}

/// A search that matches nothing completes with a null result, which
/// the COM layer surfaces as an error still carrying the success
/// code. Real failures keep their failing HRESULT.
fn is_no_match(e: &uiautomation::Error) -> bool {
    e.code() == 0
}

fn pattern_unsupported(property: &str, e: uiautomation::Error) -> AutomationError {
    AutomationError::PatternUnsupported(format!("{property}: {e}"))
}

fn uia_property(property: Property) -> UIProperty {
    match property {
        Property::Name => UIProperty::Name,
        Property::ClassName => UIProperty::ClassName,
        Property::LocalizedControlType => UIProperty::LocalizedControlType,
        Property::AutomationId => UIProperty::AutomationId,
        Property::ControlType => UIProperty::ControlType,
        Property::AriaRole => UIProperty::AriaRole,
        Property::FrameworkId => UIProperty::FrameworkId,
    }
}

fn uia_scope(scope: TreeScope) -> uiautomation::types::TreeScope {
    match scope {
        TreeScope::Descendants => uiautomation::types::TreeScope::Descendants,
        TreeScope::Children => uiautomation::types::TreeScope::Children,
    }
}

fn uia_visual_state(state: WindowVisualState) -> uiautomation::types::WindowVisualState {
    match state {
        WindowVisualState::Minimized => uiautomation::types::WindowVisualState::Minimized,
        WindowVisualState::Maximized => uiautomation::types::WindowVisualState::Maximized,
        WindowVisualState::Normal => uiautomation::types::WindowVisualState::Normal,
    }
}

/// A live UIA element wrapped for the provider-agnostic core.
struct WindowsElement {
    raw: UiaElement,
}

impl ElementImpl for WindowsElement {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn attribute(&self, property: Property) -> Result<String, AutomationError> {
        match property {
            Property::Name => self.raw.get_name().map_err(map_uia_error),
            Property::ClassName => self.raw.get_classname().map_err(map_uia_error),
            Property::LocalizedControlType => self
                .raw
                .get_localized_control_type()
                .map_err(map_uia_error),
            Property::AutomationId => self.raw.get_automation_id().map_err(map_uia_error),
            Property::ControlType => self
                .raw
                .get_control_type()
                .map(|t| (t as i32).to_string())
                .map_err(map_uia_error),
            Property::AriaRole => self.raw.get_aria_role().map_err(map_uia_error),
            Property::FrameworkId => self.raw.get_framework_id().map_err(map_uia_error),
        }
    }
}

/// Accessibility-tree provider over the UI Automation COM API.
///
/// The automation connection and the desktop root are acquired once
/// at construction and held for the provider's lifetime.
pub struct WindowsProvider {
    automation: UIAutomation,
    root: UiaElement,
}

impl WindowsProvider {
    pub fn new() -> Result<Self, AutomationError> {
        let automation = UIAutomation::new().map_err(map_uia_error)?;
        let root = automation.get_root_element().map_err(map_uia_error)?;
        Ok(Self { automation, root })
    }

    /// Translate the conjunction into a native AND condition.
    ///
    /// ControlType values are numeric on the wire; everything else is
    /// matched as a string.
    fn build_condition(
        &self,
        query: &PropertyQuery,
    ) -> Result<uiautomation::conditions::UICondition, AutomationError> {
        let mut condition = self
            .automation
            .create_true_condition()
            .map_err(map_uia_error)?;
        for (property, value) in query.clauses() {
            let variant = match property {
                Property::ControlType => match value.parse::<i32>() {
                    Ok(id) => Variant::from(id),
                    Err(_) => Variant::from(value.as_str()),
                },
                _ => Variant::from(value.as_str()),
            };
            let clause = self
                .automation
                .create_property_condition(uia_property(*property), variant, None)
                .map_err(map_uia_error)?;
            condition = self
                .automation
                .create_and_condition(condition, clause)
                .map_err(map_uia_error)?;
        }
        Ok(condition)
    }

    fn anchor_element<'a>(
        &'a self,
        anchor: Option<&'a ElementHandle>,
    ) -> Result<&'a UiaElement, AutomationError> {
        match anchor {
            Some(handle) => handle
                .imp()
                .as_any()
                .downcast_ref::<WindowsElement>()
                .map(|e| &e.raw)
                .ok_or_else(|| {
                    AutomationError::PlatformError(
                        "Element handle does not belong to this provider".to_string(),
                    )
                }),
            None => Ok(&self.root),
        }
    }

    fn wrap(raw: UiaElement) -> ElementHandle {
        ElementHandle::new(Arc::new(WindowsElement { raw }))
    }
}

impl UiTreeProvider for WindowsProvider {
    fn find_first(
        &self,
        scope: TreeScope,
        anchor: Option<&ElementHandle>,
        query: &PropertyQuery,
    ) -> Result<Option<ElementHandle>, AutomationError> {
        let condition = self.build_condition(query)?;
        let base = self.anchor_element(anchor)?;
        match base.find_first(uia_scope(scope), &condition) {
            Ok(found) => Ok(Some(Self::wrap(found))),
            Err(e) if is_no_match(&e) => Ok(None),
            Err(e) => Err(map_uia_error(e)),
        }
    }

    fn find_all(
        &self,
        scope: TreeScope,
        anchor: Option<&ElementHandle>,
        query: &PropertyQuery,
    ) -> Result<Vec<ElementHandle>, AutomationError> {
        let condition = self.build_condition(query)?;
        let base = self.anchor_element(anchor)?;
        let found = match base.find_all(uia_scope(scope), &condition) {
            Ok(found) => found,
            Err(e) if is_no_match(&e) => Vec::new(),
            Err(e) => return Err(map_uia_error(e)),
        };
        Ok(found.into_iter().map(Self::wrap).collect())
    }

    fn perform(&self, element: &ElementHandle, op: &PatternOp) -> Result<(), AutomationError> {
        let raw = match element.imp().as_any().downcast_ref::<WindowsElement>() {
            Some(e) => &e.raw,
            None => {
                return Err(AutomationError::PlatformError(
                    "Element handle does not belong to this provider".to_string(),
                ))
            }
        };
        let pattern = op.pattern();
        match op {
            PatternOp::Invoke => {
                let invoke: UIInvokePattern = raw
                    .get_pattern()
                    .map_err(|e| pattern_unsupported("Invoke", e))?;
                invoke.invoke().map_err(map_uia_error)
            }
            PatternOp::Expand => {
                let ec: UIExpandCollapsePattern = raw
                    .get_pattern()
                    .map_err(|e| pattern_unsupported("ExpandCollapse", e))?;
                ec.expand().map_err(map_uia_error)
            }
            PatternOp::Collapse => {
                let ec: UIExpandCollapsePattern = raw
                    .get_pattern()
                    .map_err(|e| pattern_unsupported("ExpandCollapse", e))?;
                ec.collapse().map_err(map_uia_error)
            }
            PatternOp::Select => {
                let item: UISelectionItemPattern = raw
                    .get_pattern()
                    .map_err(|e| pattern_unsupported("SelectionItem", e))?;
                item.select().map_err(map_uia_error)
            }
            PatternOp::Realize => {
                let virt: UIVirtualizedItemPattern = raw
                    .get_pattern()
                    .map_err(|e| pattern_unsupported("VirtualizedItem", e))?;
                virt.realize().map_err(map_uia_error)
            }
            PatternOp::Move { x, y } => {
                let transform: UITransformPattern = raw
                    .get_pattern()
                    .map_err(|e| pattern_unsupported("Transform", e))?;
                transform.move_to(*x, *y).map_err(map_uia_error)
            }
            PatternOp::Resize { width, height } => {
                let transform: UITransformPattern = raw
                    .get_pattern()
                    .map_err(|e| pattern_unsupported("Transform", e))?;
                transform.resize(*width, *height).map_err(map_uia_error)
            }
            PatternOp::Rotate { degrees } => {
                let transform: UITransformPattern = raw
                    .get_pattern()
                    .map_err(|e| pattern_unsupported("Transform", e))?;
                transform.rotate(*degrees).map_err(map_uia_error)
            }
            PatternOp::SetValue(text) => {
                let value: UIValuePattern = raw
                    .get_pattern()
                    .map_err(|e| pattern_unsupported("Value", e))?;
                value.set_value(text).map_err(map_uia_error)
            }
            PatternOp::SetWindowState(state) => {
                let window: UIWindowPattern = raw
                    .get_pattern()
                    .map_err(|e| pattern_unsupported("Window", e))?;
                window
                    .set_window_visual_state(uia_visual_state(*state))
                    .map_err(map_uia_error)
            }
        }
        .inspect(|_| debug!(?pattern, "pattern operation performed"))
    }

    fn transform_capabilities(
        &self,
        element: &ElementHandle,
    ) -> Result<TransformCapabilities, AutomationError> {
        let raw = element
            .imp()
            .as_any()
            .downcast_ref::<WindowsElement>()
            .map(|e| &e.raw)
            .ok_or_else(|| {
                AutomationError::PlatformError(
                    "Element handle does not belong to this provider".to_string(),
                )
            })?;
        let transform: UITransformPattern = raw
            .get_pattern()
            .map_err(|e| pattern_unsupported("Transform", e))?;
        Ok(TransformCapabilities {
            can_move: transform.can_move().map_err(map_uia_error)?,
            can_resize: transform.can_resize().map_err(map_uia_error)?,
            can_rotate: transform.can_rotate().map_err(map_uia_error)?,
        })
    }
}

/// One visible top-level window discovered by `EnumWindows`.
struct TopLevelWindow {
    hwnd: isize,
    pid: u32,
    title: String,
}

unsafe extern "system" fn enum_windows_callback(
    hwnd: HWND,
    lparam: LPARAM,
) -> windows::core::BOOL {
    let windows_vec = &mut *(lparam.0 as *mut Vec<TopLevelWindow>);
    if IsWindowVisible(hwnd).as_bool() {
        let len = GetWindowTextLengthW(hwnd);
        if len > 0 {
            let mut buf = vec![0u16; len as usize + 1];
            let copied = GetWindowTextW(hwnd, &mut buf);
            let title = String::from_utf16_lossy(&buf[..copied as usize]);
            let mut pid = 0u32;
            GetWindowThreadProcessId(hwnd, Some(&mut pid));
            if pid != 0 {
                windows_vec.push(TopLevelWindow {
                    hwnd: hwnd.0 as isize,
                    pid,
                    title,
                });
            }
        }
    }
    true.into()
}

fn enumerate_top_level_windows() -> Vec<TopLevelWindow> {
    let mut found: Vec<TopLevelWindow> = Vec::new();
    unsafe {
        let _ = EnumWindows(
            Some(enum_windows_callback),
            LPARAM(&mut found as *mut _ as isize),
        );
    }
    found
}

/// Window bridge over `ShowWindow` and `WM_CLOSE`.
pub struct WindowsBridge;

impl WindowsBridge {
    pub fn new() -> Self {
        Self
    }

    fn main_window(pid: u32) -> Result<TopLevelWindow, AutomationError> {
        enumerate_top_level_windows()
            .into_iter()
            .find(|w| w.pid == pid)
            .ok_or_else(|| {
                AutomationError::ElementNotFound(format!("No visible window for pid {pid}"))
            })
    }
}

impl Default for WindowsBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowBridge for WindowsBridge {
    fn list_windows(&self) -> Result<Vec<ProcessWindow>, AutomationError> {
        let mut system = System::new();
        system.refresh_processes(sysinfo::ProcessesToUpdate::All, true);
        let windows = enumerate_top_level_windows()
            .into_iter()
            .map(|w| {
                let name = system
                    .process(sysinfo::Pid::from_u32(w.pid))
                    .map(|p| p.name().to_string_lossy().to_string())
                    .unwrap_or_default();
                ProcessWindow {
                    pid: w.pid,
                    description: format!("{name} ({})", w.pid),
                    title: w.title,
                }
            })
            .collect();
        Ok(windows)
    }

    fn set_visual_state(
        &self,
        pid: u32,
        state: WindowVisualState,
    ) -> Result<(), AutomationError> {
        let window = Self::main_window(pid)?;
        let command = match state {
            WindowVisualState::Minimized => SW_MINIMIZE,
            WindowVisualState::Maximized => SW_MAXIMIZE,
            WindowVisualState::Normal => SW_SHOWNORMAL,
        };
        unsafe {
            let _ = ShowWindow(HWND(window.hwnd as _), command);
        }
        Ok(())
    }

    fn request_close(&self, pid: u32) -> Result<(), AutomationError> {
        let window = Self::main_window(pid)?;
        unsafe {
            PostMessageW(
                Some(HWND(window.hwnd as _)),
                WM_CLOSE,
                WPARAM(0),
                LPARAM(0),
            )
            .map_err(|e| AutomationError::PlatformError(format!("WM_CLOSE failed: {e}")))?;
        }
        Ok(())
    }
}

/// Keystroke injection into the focused target.
pub struct WindowsKeyboard;

impl KeystrokeInjector for WindowsKeyboard {
    fn send(&self, text: &str) -> Result<(), AutomationError> {
        uiautomation::inputs::Keyboard::default()
            .send_keys(text)
            .map_err(map_uia_error)
    }
}
