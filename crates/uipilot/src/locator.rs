use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, instrument};

use crate::errors::AutomationError;
use crate::provider::{ElementHandle, TreeScope, UiTreeProvider};
use crate::query::{Property, PropertyQuery};

/// Default cadence of the wait/retry loop.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Resolves declarative property queries against the live
/// accessibility tree.
///
/// Every operation takes the query as an explicit value; the locator
/// holds no query state of its own, so nothing here can leak stale
/// criteria into the next search.
#[derive(Clone)]
pub struct Locator {
    provider: Arc<dyn UiTreeProvider>,
    poll_interval: Duration,
}

impl Locator {
    pub fn new(provider: Arc<dyn UiTreeProvider>) -> Self {
        Self {
            provider,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the wait/retry cadence. Meant for tests; production
    /// callers keep the one-second default.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Shared search used by both `resolve_first` and `exists`, so
    /// the two can never drift apart in matching semantics.
    fn find_first_descendant(
        &self,
        query: &PropertyQuery,
    ) -> Result<Option<ElementHandle>, AutomationError> {
        if query.is_empty() {
            // An empty top-level conjunction is under-determined;
            // "match anything on the desktop" is never what the
            // caller meant.
            return Err(AutomationError::InvalidQuery(
                "Empty query; add at least one property before resolving".to_string(),
            ));
        }
        self.provider.find_first(TreeScope::Descendants, None, query)
    }

    /// Resolve the query to the first matching descendant of the tree
    /// root, in tree order.
    #[instrument(level = "debug", skip(self))]
    pub fn resolve_first(&self, query: &PropertyQuery) -> Result<ElementHandle, AutomationError> {
        self.find_first_descendant(query)?.ok_or_else(|| {
            AutomationError::ElementNotFound(format!("No element matches {query:?}"))
        })
    }

    /// Report whether any descendant matches the query.
    ///
    /// Matching semantics are identical to [`Locator::resolve_first`];
    /// only the failure reporting differs.
    #[instrument(level = "debug", skip(self))]
    pub fn exists(&self, query: &PropertyQuery) -> Result<bool, AutomationError> {
        Ok(self.find_first_descendant(query)?.is_some())
    }

    /// Resolve `anchor`, then collect `attribute` from every direct
    /// child matching `filter`, in tree order.
    ///
    /// The child filter may be empty, in which case every direct
    /// child matches. The result is materialized eagerly.
    #[instrument(level = "debug", skip(self))]
    pub fn children(
        &self,
        anchor: &PropertyQuery,
        filter: &PropertyQuery,
        attribute: Property,
    ) -> Result<Vec<String>, AutomationError> {
        let element = self.resolve_first(anchor)?;
        let matches = self
            .provider
            .find_all(TreeScope::Children, Some(&element), filter)?;
        debug!(count = matches.len(), "matched direct children");
        matches
            .iter()
            .map(|child| child.attribute(attribute))
            .collect()
    }

    /// Poll [`Locator::exists`] until the element appears or the
    /// retry budget is exhausted.
    ///
    /// `timeout_secs` is a maximum failed-poll count, not a
    /// wall-clock deadline: `0` polls exactly once and never sleeps,
    /// `N > 0` fails only after N polls came up empty, sleeping one
    /// poll interval between attempts.
    #[instrument(level = "debug", skip(self))]
    pub fn wait_until_exists(
        &self,
        query: &PropertyQuery,
        timeout_secs: u32,
    ) -> Result<(), AutomationError> {
        let budget = timeout_secs.max(1);
        let mut failed = 0u32;
        loop {
            if self.exists(query)? {
                return Ok(());
            }
            failed += 1;
            if failed >= budget {
                return Err(AutomationError::Timeout(format!(
                    "Timeout threshold {timeout_secs} reached waiting for {query:?}"
                )));
            }
            thread::sleep(self.poll_interval);
        }
    }

    pub(crate) fn provider(&self) -> &Arc<dyn UiTreeProvider> {
        &self.provider
    }
}
