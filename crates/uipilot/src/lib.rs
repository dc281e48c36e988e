//! Desktop UI automation through accessibility APIs
//!
//! Find-then-act automation for running desktop applications:
//! describe the element you want with declarative property matching,
//! optionally wait for it to appear, then drive it through its
//! control patterns, with no walking of the accessibility tree by
//! hand.
//!
//! ```no_run
//! use uipilot::{Property, Session};
//!
//! fn main() -> Result<(), uipilot::AutomationError> {
//!     let mut session = Session::new()?;
//!     session.add_property(Property::Name, "Submit")?;
//!     session.wait_until_exists(10)?;
//!     session.add_property(Property::Name, "Submit")?;
//!     session.invoke()?;
//!     Ok(())
//! }
//! ```

pub mod bridge;
pub mod errors;
pub mod locator;
pub mod patterns;
pub mod platforms;
pub mod provider;
pub mod query;
#[cfg(test)]
mod tests;

pub use bridge::{KeystrokeInjector, ProcessWindow, WindowBridge};
pub use errors::AutomationError;
pub use locator::{Locator, DEFAULT_POLL_INTERVAL};
pub use patterns::{
    PatternId, PatternOp, TransformCapabilities, TransformRequest, WindowVisualState,
};
pub use provider::{ElementHandle, ElementImpl, TreeScope, UiTreeProvider};
pub use query::{Property, PropertyQuery};

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, instrument};

/// How a session operation disposes of the in-progress query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryDisposition {
    /// Take the query out of the session, leaving it empty.
    Consume,
    /// Copy the query, leaving the session's state untouched.
    Keep,
}

/// The main entry point for UI automation.
///
/// A session owns the provider connection, the in-progress property
/// query and the post-action settle delay. Every locate-or-check
/// operation consumes the query, so each located action starts from a
/// freshly built one.
///
/// The model is single-threaded and blocking throughout: searches,
/// pattern calls and the wait loop all run to completion on the
/// caller's thread, and waiting is a thread-blocking sleep between
/// polls. Concurrent callers must each own their own session.
pub struct Session {
    locator: Locator,
    bridge: Arc<dyn WindowBridge>,
    keyboard: Arc<dyn KeystrokeInjector>,
    query: PropertyQuery,
    settle_delay: Duration,
}

impl Session {
    /// Connect to the platform accessibility provider with no settle
    /// delay.
    pub fn new() -> Result<Self, AutomationError> {
        Self::with_delay(Duration::ZERO)
    }

    /// Connect to the platform accessibility provider. `settle_delay`
    /// elapses after every mutating action to let the UI settle.
    pub fn with_delay(settle_delay: Duration) -> Result<Self, AutomationError> {
        let (provider, bridge, keyboard) = platforms::create_platform()?;
        Ok(Self::from_parts(provider, bridge, keyboard, settle_delay))
    }

    /// Assemble a session from explicit collaborators. Used by tests
    /// and embedders that bring their own provider.
    pub fn from_parts(
        provider: Arc<dyn UiTreeProvider>,
        bridge: Arc<dyn WindowBridge>,
        keyboard: Arc<dyn KeystrokeInjector>,
        settle_delay: Duration,
    ) -> Self {
        Self {
            locator: Locator::new(provider),
            bridge,
            keyboard,
            query: PropertyQuery::new(),
            settle_delay,
        }
    }

    /// Override the wait/retry cadence (default one second).
    pub fn set_poll_interval(&mut self, interval: Duration) {
        self.locator = self.locator.clone().with_poll_interval(interval);
    }

    // ---- query builder ----

    /// Add one attribute/value clause to the in-progress query.
    ///
    /// Fails with [`AutomationError::InvalidQuery`] when the
    /// attribute is already present; the existing clause is never
    /// overwritten.
    pub fn add_property(
        &mut self,
        property: Property,
        value: impl Into<String>,
    ) -> Result<&mut Self, AutomationError> {
        self.query.insert(property, value)?;
        Ok(self)
    }

    /// Unconditionally empty the in-progress query.
    pub fn clear_properties(&mut self) {
        self.query.clear();
    }

    /// Hand out the in-progress query.
    ///
    /// `Consume` leaves the session's query empty; every resolution
    /// attempt uses this disposition, so query state never leaks into
    /// the next call. `Keep` copies it for callers that want to retry
    /// with the same criteria.
    pub fn query(&mut self, disposition: QueryDisposition) -> PropertyQuery {
        match disposition {
            QueryDisposition::Consume => std::mem::take(&mut self.query),
            QueryDisposition::Keep => self.query.clone(),
        }
    }

    // ---- location ----

    /// Resolve the current query to its first match in tree order.
    /// The query is consumed regardless of outcome.
    pub fn resolve_first(&mut self) -> Result<ElementHandle, AutomationError> {
        let query = self.query(QueryDisposition::Consume);
        self.locator.resolve_first(&query)
    }

    /// Whether any element matches the current query. Consumes the
    /// query; matching semantics are identical to
    /// [`Session::resolve_first`].
    pub fn exists(&mut self) -> Result<bool, AutomationError> {
        let query = self.query(QueryDisposition::Consume);
        self.locator.exists(&query)
    }

    /// Wait for the current query to match, polling once per poll
    /// interval up to `timeout_secs` failed attempts.
    ///
    /// The query is consumed once, on entry; every retry re-resolves
    /// the same snapshot.
    pub fn wait_until_exists(&mut self, timeout_secs: u32) -> Result<(), AutomationError> {
        let query = self.query(QueryDisposition::Consume);
        self.locator.wait_until_exists(&query, timeout_secs)
    }

    /// Resolve the current query as an anchor, then collect
    /// `attribute` from every direct child matching `filter`, in tree
    /// order. An empty filter matches every child. Consumes the
    /// anchor query.
    pub fn children(
        &mut self,
        filter: &PropertyQuery,
        attribute: Property,
    ) -> Result<Vec<String>, AutomationError> {
        let anchor = self.query(QueryDisposition::Consume);
        self.locator.children(&anchor, filter, attribute)
    }

    /// Display names of every direct child matching `filter`.
    pub fn child_names(&mut self, filter: &PropertyQuery) -> Result<Vec<String>, AutomationError> {
        self.children(filter, Property::Name)
    }

    // ---- pattern dispatch ----

    /// Resolve the current query, perform `op` on the match, then let
    /// the settle delay elapse.
    fn act(&mut self, op: PatternOp) -> Result<(), AutomationError> {
        let element = self.resolve_first()?;
        self.locator.provider().perform(&element, &op)?;
        self.settle();
        Ok(())
    }

    fn settle(&self) {
        if !self.settle_delay.is_zero() {
            thread::sleep(self.settle_delay);
        }
    }

    /// Invoke the element's primary action (click-equivalent).
    #[instrument(skip(self))]
    pub fn invoke(&mut self) -> Result<(), AutomationError> {
        self.act(PatternOp::Invoke)
    }

    #[instrument(skip(self))]
    pub fn expand(&mut self) -> Result<(), AutomationError> {
        self.act(PatternOp::Expand)
    }

    #[instrument(skip(self))]
    pub fn collapse(&mut self) -> Result<(), AutomationError> {
        self.act(PatternOp::Collapse)
    }

    /// Mark the element selected.
    #[instrument(skip(self))]
    pub fn select_item(&mut self) -> Result<(), AutomationError> {
        self.act(PatternOp::Select)
    }

    /// Force a virtualized item to materialize in the tree.
    #[instrument(skip(self))]
    pub fn realize(&mut self) -> Result<(), AutomationError> {
        self.act(PatternOp::Realize)
    }

    /// Set the element's value to `text`.
    #[instrument(skip(self, text))]
    pub fn write(&mut self, text: &str) -> Result<(), AutomationError> {
        self.act(PatternOp::SetValue(text.to_string()))
    }

    /// Apply at most one geometric transform to the element.
    ///
    /// Move wins over resize, resize over rotate; a request with
    /// every group unset applies nothing. Returns the element's
    /// current transform capability flags either way, read after the
    /// settle delay.
    #[instrument(skip(self))]
    pub fn transform(
        &mut self,
        request: TransformRequest,
    ) -> Result<TransformCapabilities, AutomationError> {
        let element = self.resolve_first()?;
        if let Some(op) = request.operation() {
            self.locator.provider().perform(&element, &op)?;
        }
        self.settle();
        self.locator.provider().transform_capabilities(&element)
    }

    /// Set the window's visual state through the element's window
    /// pattern. `state` is one of "min", "max", "normal",
    /// case-insensitive; anything else fails before any provider
    /// call.
    #[instrument(skip(self))]
    pub fn set_window_state(&mut self, state: &str) -> Result<(), AutomationError> {
        let state = WindowVisualState::parse(state)?;
        self.act(PatternOp::SetWindowState(state))
    }

    // ---- window/process bridge ----

    /// Resolve a window by matching `process` against process
    /// descriptions (case-insensitive regex), then issue the OS-level
    /// show-window command.
    ///
    /// The state literal is validated first, so an unrecognized state
    /// never reaches the bridge.
    #[instrument(skip(self))]
    pub fn set_window_state_by_process(
        &self,
        process: &str,
        state: &str,
    ) -> Result<(), AutomationError> {
        let state = WindowVisualState::parse(state)?;
        let windows = self.bridge.list_windows()?;
        let window = bridge::find_window_by_process(&windows, process)?;
        debug!(pid = window.pid, title = %window.title, "resolved window for process pattern");
        self.bridge.set_visual_state(window.pid, state)?;
        self.settle();
        Ok(())
    }

    /// Request a graceful close on every process whose main window
    /// title equals `title` exactly. A title that matches nothing is
    /// a no-op, not an error.
    #[instrument(skip(self))]
    pub fn close_window(&self, title: &str) -> Result<(), AutomationError> {
        let windows = self.bridge.list_windows()?;
        let mut closed = 0usize;
        for window in windows.iter().filter(|w| w.title == title) {
            self.bridge.request_close(window.pid)?;
            closed += 1;
        }
        debug!(closed, title, "close requested");
        Ok(())
    }

    /// Inject keystrokes into the currently focused target, bracketed
    /// by the settle delay on both sides.
    #[instrument(skip(self, text))]
    pub fn send_keys(&self, text: &str) -> Result<(), AutomationError> {
        self.settle();
        self.keyboard.send(text)?;
        self.settle();
        Ok(())
    }
}
