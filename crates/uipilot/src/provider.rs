//! The accessibility-tree provider surface consumed by the locator
//! and pattern dispatcher.
//!
//! The provider owns the live tree; this crate only composes search
//! conditions against it and dispatches pattern operations on the
//! handles it returns.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::errors::AutomationError;
use crate::patterns::{PatternOp, TransformCapabilities};
use crate::query::{Property, PropertyQuery};

/// The subset of the tree a search considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeScope {
    /// Every descendant of the search anchor, in tree order.
    Descendants,
    /// Direct children of the search anchor only.
    Children,
}

/// Provider-side view of a live tree node.
pub trait ElementImpl: Send + Sync {
    fn as_any(&self) -> &dyn Any;

    /// Read one attribute of the element as a display string.
    fn attribute(&self, property: Property) -> Result<String, AutomationError>;
}

/// An opaque, time-bounded reference to a node in the live
/// accessibility tree.
///
/// Handles are owned by the provider and the tree can mutate between
/// calls, so a handle is used for a single locate-act round trip and
/// then discarded, never persisted.
#[derive(Clone)]
pub struct ElementHandle(Arc<dyn ElementImpl>);

impl ElementHandle {
    pub fn new(imp: Arc<dyn ElementImpl>) -> Self {
        Self(imp)
    }

    pub fn attribute(&self, property: Property) -> Result<String, AutomationError> {
        self.0.attribute(property)
    }

    /// The element's display name.
    pub fn name(&self) -> Result<String, AutomationError> {
        self.attribute(Property::Name)
    }

    pub(crate) fn imp(&self) -> &dyn ElementImpl {
        self.0.as_ref()
    }
}

impl fmt::Debug for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ElementHandle({})",
            self.name().unwrap_or_else(|_| "<unnamed>".to_string())
        )
    }
}

/// An accessibility-tree provider: something that can search the live
/// tree with a conjunctive condition and drive control patterns on
/// the elements it finds.
///
/// Implementations translate each clause of the [`PropertyQuery`]
/// into a native equality condition and combine them with logical
/// AND. "First" always means first in tree order.
pub trait UiTreeProvider: Send + Sync {
    /// Find the first element matching the conjunction under `anchor`
    /// (the tree root when `None`).
    fn find_first(
        &self,
        scope: TreeScope,
        anchor: Option<&ElementHandle>,
        query: &PropertyQuery,
    ) -> Result<Option<ElementHandle>, AutomationError>;

    /// Find every element matching the conjunction, materialized
    /// eagerly, in tree order. An empty conjunction matches every
    /// element in scope.
    fn find_all(
        &self,
        scope: TreeScope,
        anchor: Option<&ElementHandle>,
        query: &PropertyQuery,
    ) -> Result<Vec<ElementHandle>, AutomationError>;

    /// Obtain the control pattern required by `op` from the element
    /// and perform the operation. Fails with
    /// [`AutomationError::PatternUnsupported`] when the element does
    /// not expose that pattern.
    fn perform(&self, element: &ElementHandle, op: &PatternOp) -> Result<(), AutomationError>;

    /// Current capability flags of the element's transform pattern.
    fn transform_capabilities(
        &self,
        element: &ElementHandle,
    ) -> Result<TransformCapabilities, AutomationError>;
}
