use thiserror::Error;

/// Errors raised by element location, pattern dispatch and the
/// window/process bridge.
#[derive(Error, Debug)]
pub enum AutomationError {
    /// The in-progress query is malformed: a duplicate property key,
    /// or an empty conjunction where one is required.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// No descendant, child or process matched the composed condition.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// The wait loop exhausted its retry budget.
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// A caller-supplied literal was not understood (window-state
    /// literal, malformed process pattern).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The element does not expose the requested control pattern.
    /// Propagated from the provider without translation.
    #[error("Pattern not supported: {0}")]
    PatternUnsupported(String),

    /// Provider or OS-level failure outside the taxonomy above.
    #[error("Platform error: {0}")]
    PlatformError(String),
}
