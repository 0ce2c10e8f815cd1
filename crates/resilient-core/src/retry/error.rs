//! Errors surfaced by the retry controller.

use thiserror::Error;

/// Fault propagated out of a retry loop.
///
/// Running out of attempts or time is not an error: the controller reports it
/// as `Ok(None)`.
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// The work item faulted and no fault action took it (no table, no
    /// matching entry, or an explicit `Accept` entry).
    #[error("unhandled fault: {0}")]
    Unhandled(#[source] E),
    /// An action handler raised a fault of its own.
    #[error("action raised a fault: {0}")]
    Action(#[source] E),
    /// The blocking bridge could not start its runtime. Raised before the
    /// first attempt.
    #[error("failed to start retry runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

impl<E> RetryError<E> {
    /// The fault raised by the work item or an action, if there is one.
    pub fn into_fault(self) -> Option<E> {
        match self {
            RetryError::Unhandled(e) | RetryError::Action(e) => Some(e),
            RetryError::Runtime(_) => None,
        }
    }

    /// True if the work item's fault had no action.
    pub fn is_unhandled(&self) -> bool {
        matches!(self, RetryError::Unhandled(_))
    }
}
