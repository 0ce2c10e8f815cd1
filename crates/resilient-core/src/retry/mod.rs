//! Retry controller.
//!
//! A work item is run under a [`RetryPolicy`]. Each outcome is dispatched
//! through one of two tables: [`ResultActions`] for values (keyed by the value
//! or a classifier over it) and [`FaultActions`] for faults (keyed by
//! [`Classify::kind`]). Exact entries win over the wildcard. An action either
//! settles the call or asks for another attempt with [`Verdict::Retry`];
//! attempts stop when an action settles, a fault has no action, or the
//! attempt/time budget runs out (`Ok(None)`).
//!
//! The loop is written once as an async fn ([`Controller::run`]);
//! [`Controller::run_blocking`] drives it for synchronous callers.

mod action;
mod classify;
mod error;
mod observe;
mod policy;
mod run;
mod table;
mod wrap;

pub use action::{Action, Handler, Verdict};
pub use classify::Classify;
pub use error::RetryError;
pub use observe::{Budget, Event, NoopObserver, Observer, Origin, TracingObserver};
pub use policy::{Backoff, OnRetry, RetryPolicy};
pub use run::{execute, execute_blocking, Controller};
pub use table::{FaultActions, ResultActions};
pub use wrap::Retrying;
