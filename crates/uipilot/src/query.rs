use serde::{Deserialize, Serialize};

use crate::errors::AutomationError;

/// Element attributes understood by the locator, mapped to the
/// provider's native automation property identifiers.
///
/// <https://learn.microsoft.com/en-us/windows/win32/winauto/uiauto-automation-element-propids>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum Property {
    Name = 30005,
    ClassName = 30012,
    LocalizedControlType = 30004,
    AutomationId = 30011,
    ControlType = 30003,
    AriaRole = 30101,
    FrameworkId = 30024,
}

impl Property {
    /// The provider-native numeric identifier for this attribute.
    pub fn native_id(self) -> i32 {
        self as i32
    }
}

/// An ordered conjunction of attribute/value clauses describing
/// "the element I want".
///
/// Insertion order is preserved for diagnostics but does not affect
/// matching. Re-adding an attribute that is already present is a
/// configuration error, never a silent overwrite.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyQuery {
    clauses: Vec<(Property, String)>,
}

impl PropertyQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for a single-clause query.
    pub fn single(property: Property, value: impl Into<String>) -> Self {
        Self {
            clauses: vec![(property, value.into())],
        }
    }

    /// Add one attribute/value clause to the conjunction.
    ///
    /// Fails with [`AutomationError::InvalidQuery`] when `property`
    /// is already present; the existing clause stays untouched.
    pub fn insert(
        &mut self,
        property: Property,
        value: impl Into<String>,
    ) -> Result<(), AutomationError> {
        if self.clauses.iter().any(|(p, _)| *p == property) {
            return Err(AutomationError::InvalidQuery(format!(
                "Property {property:?} is already present in the query"
            )));
        }
        self.clauses.push((property, value.into()));
        Ok(())
    }

    /// Unconditionally empty the conjunction.
    pub fn clear(&mut self) {
        self.clauses.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// The clauses of the conjunction, in insertion order.
    pub fn clauses(&self) -> &[(Property, String)] {
        &self.clauses
    }
}
