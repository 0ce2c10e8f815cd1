//! Structured events emitted by the retry loop.
//!
//! The controller never logs on its own. It reports each step to an
//! [`Observer`]; [`NoopObserver`] is the default and [`TracingObserver`]
//! forwards to `tracing`. Tests plug in a recorder and assert on the sequence.
//!
//! Per retry the order is `Waiting` → `Attempt` → one of `RetryRequested`,
//! `Finished`, `Unhandled` or `HandlerRaised`. `Exhausted` is emitted at the
//! budget check instead of `Waiting`.

use std::time::Duration;

/// Where a verdict came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The work item returned normally.
    Result,
    /// The work item faulted.
    Fault,
}

/// Which budget ended the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
    /// `max_retries` reached.
    Retries(u32),
    /// `max_elapsed` reached.
    Elapsed(Duration),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// About to sleep before retry `attempt`. Emitted after `on_retry`.
    Waiting { attempt: u32, delay: Duration },
    /// Work item invoked.
    Attempt { attempt: u32 },
    /// An action asked for another attempt.
    RetryRequested { attempt: u32, origin: Origin },
    /// The loop returned a value.
    Finished { attempt: u32, origin: Origin },
    /// Budget ran out; the loop returns no value.
    Exhausted { attempt: u32, budget: Budget },
    /// A work item fault had no action and is leaving the loop; `kind` is
    /// its category in debug form.
    Unhandled { attempt: u32, kind: String },
    /// A matched action handler raised its own fault, which leaves the loop.
    HandlerRaised {
        attempt: u32,
        origin: Origin,
        kind: String,
    },
}

/// Sink for [`Event`]s. Called inline from the retry loop, so keep it cheap.
pub trait Observer: Send + Sync {
    fn on_event(&self, event: &Event);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn on_event(&self, _event: &Event) {}
}

/// Forwards events to `tracing`: progress at debug, give-ups at warn.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn on_event(&self, event: &Event) {
        match event {
            Event::Waiting { attempt, delay } => {
                tracing::debug!(attempt, ?delay, "waiting before retry");
            }
            Event::Attempt { attempt } => tracing::debug!(attempt, "executing work item"),
            Event::RetryRequested { attempt, origin } => {
                tracing::debug!(attempt, ?origin, "retry requested");
            }
            Event::Finished { attempt, origin } => {
                tracing::debug!(attempt, ?origin, "finished");
            }
            Event::Exhausted { attempt, budget } => {
                tracing::warn!(attempt, ?budget, "retry budget exhausted");
            }
            Event::Unhandled { attempt, kind } => {
                tracing::warn!(attempt, kind = %kind, "unhandled fault");
            }
            Event::HandlerRaised {
                attempt,
                origin,
                kind,
            } => {
                tracing::warn!(attempt, ?origin, kind = %kind, "action handler raised a fault");
            }
        }
    }
}
