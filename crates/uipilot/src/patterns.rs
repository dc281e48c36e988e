//! Control-pattern vocabulary and the tagged operations dispatched
//! through it.

use serde::{Deserialize, Serialize};

use crate::errors::AutomationError;

/// Control-pattern identifiers, mapped to the provider's native
/// pattern ids.
///
/// <https://learn.microsoft.com/en-us/previous-versions/dd757483(v=vs.85)>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum PatternId {
    Invoke = 10000,
    Selection = 10001,
    Value = 10002,
    ExpandCollapse = 10005,
    Window = 10009,
    SelectionItem = 10010,
    Transform = 10016,
    ScrollItem = 10017,
    LegacyIAccessible = 10018,
    VirtualizedItem = 10020,
}

impl PatternId {
    /// The provider-native numeric identifier for this pattern.
    pub fn native_id(self) -> i32 {
        self as i32
    }
}

/// Window visual states accepted by the window pattern and the
/// OS-level bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowVisualState {
    Minimized,
    Maximized,
    Normal,
}

impl WindowVisualState {
    /// Parse the caller-facing state literal, case-insensitively.
    /// Allowed: "min", "max", "normal".
    pub fn parse(state: &str) -> Result<Self, AutomationError> {
        match state.to_lowercase().as_str() {
            "min" => Ok(Self::Minimized),
            "max" => Ok(Self::Maximized),
            "normal" => Ok(Self::Normal),
            other => Err(AutomationError::InvalidArgument(format!(
                "Visual state '{other}' does not exist. Allowed: min, max or normal"
            ))),
        }
    }
}

/// A single control-pattern operation, tagged with the pattern that
/// carries it.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternOp {
    /// Invoke the element's primary action (click-equivalent).
    Invoke,
    Expand,
    Collapse,
    /// Mark the element selected.
    Select,
    /// Force a virtualized item to materialize in the tree.
    Realize,
    Move { x: f64, y: f64 },
    Resize { width: f64, height: f64 },
    Rotate { degrees: f64 },
    /// Set the element's value.
    SetValue(String),
    SetWindowState(WindowVisualState),
}

impl PatternOp {
    /// The control pattern this operation is dispatched through.
    pub fn pattern(&self) -> PatternId {
        match self {
            PatternOp::Invoke => PatternId::Invoke,
            PatternOp::Expand | PatternOp::Collapse => PatternId::ExpandCollapse,
            PatternOp::Select => PatternId::SelectionItem,
            PatternOp::Realize => PatternId::VirtualizedItem,
            PatternOp::Move { .. } | PatternOp::Resize { .. } | PatternOp::Rotate { .. } => {
                PatternId::Transform
            }
            PatternOp::SetValue(_) => PatternId::Value,
            PatternOp::SetWindowState(_) => PatternId::Window,
        }
    }
}

/// A requested geometric transform.
///
/// Unset components keep the NAN sentinel; a group counts as
/// requested only when every one of its components is set. When more
/// than one group is set, move wins over resize and resize over
/// rotate, so at most one operation is ever applied.
#[derive(Debug, Clone, Copy)]
pub struct TransformRequest {
    pub move_x: f64,
    pub move_y: f64,
    pub resize_width: f64,
    pub resize_height: f64,
    pub rotate_degrees: f64,
}

impl Default for TransformRequest {
    fn default() -> Self {
        Self {
            move_x: f64::NAN,
            move_y: f64::NAN,
            resize_width: f64::NAN,
            resize_height: f64::NAN,
            rotate_degrees: f64::NAN,
        }
    }
}

impl TransformRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        self.move_x = x;
        self.move_y = y;
        self
    }

    pub fn resize(mut self, width: f64, height: f64) -> Self {
        self.resize_width = width;
        self.resize_height = height;
        self
    }

    pub fn rotate(mut self, degrees: f64) -> Self {
        self.rotate_degrees = degrees;
        self
    }

    /// The single operation this request selects, if any.
    pub fn operation(&self) -> Option<PatternOp> {
        if !self.move_x.is_nan() && !self.move_y.is_nan() {
            Some(PatternOp::Move {
                x: self.move_x,
                y: self.move_y,
            })
        } else if !self.resize_width.is_nan() && !self.resize_height.is_nan() {
            Some(PatternOp::Resize {
                width: self.resize_width,
                height: self.resize_height,
            })
        } else if !self.rotate_degrees.is_nan() {
            Some(PatternOp::Rotate {
                degrees: self.rotate_degrees,
            })
        } else {
            None
        }
    }
}

/// Capability flags of an element's transform pattern, read back
/// after a transform request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformCapabilities {
    pub can_move: bool,
    pub can_resize: bool,
    pub can_rotate: bool,
}
