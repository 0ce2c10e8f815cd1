//! Decorate a function with retry behaviour chosen at call time.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::classify::Classify;
use super::error::RetryError;
use super::observe::Observer;
use super::policy::{Backoff, RetryPolicy};
use super::run::Controller;

/// A function wrapped with retry behaviour.
///
/// Wrap-time settings (`max_elapsed`, `backoff`, observer) are defaults: a
/// call-time policy that sets the same field wins. Everything else (tables,
/// retries, delay, `on_retry`) comes from the policy passed to each call.
/// Arguments are cloned for every attempt.
///
/// ```no_run
/// use resilient_core::retry::{Action, FaultActions, Retrying, RetryPolicy};
/// use std::time::Duration;
///
/// fn read_sensor(path: &str) -> std::io::Result<String> {
///     std::fs::read_to_string(path)
/// }
///
/// let reader = Retrying::new(read_sensor).max_elapsed(Duration::from_secs(10));
/// let value = reader.call_blocking(
///     "/sys/class/thermal/thermal_zone0/temp",
///     RetryPolicy::<String, std::io::Error>::new()
///         .max_retries(3)
///         .faults(FaultActions::new().on(std::io::ErrorKind::WouldBlock, Action::Retry)),
/// );
/// ```
pub struct Retrying<F> {
    f: F,
    max_elapsed: Option<Duration>,
    backoff: Option<Backoff>,
    controller: Controller,
}

impl<F> Retrying<F> {
    pub fn new(f: F) -> Self {
        Self {
            f,
            max_elapsed: None,
            backoff: None,
            controller: Controller::new(),
        }
    }

    pub fn max_elapsed(mut self, budget: Duration) -> Self {
        self.max_elapsed = Some(budget);
        self
    }

    pub fn backoff<B>(mut self, backoff: B) -> Self
    where
        B: Fn(u32) -> Duration + Send + Sync + 'static,
    {
        self.backoff = Some(Arc::new(backoff));
        self
    }

    pub fn observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.controller = Controller::with_observer(observer);
        self
    }

    fn fill<T, E: Classify>(&self, mut policy: RetryPolicy<T, E>) -> RetryPolicy<T, E> {
        if policy.max_elapsed.is_none() {
            policy.max_elapsed = self.max_elapsed;
        }
        if policy.backoff.is_none() {
            policy.backoff = self.backoff.clone();
        }
        policy
    }

    /// Calls the wrapped function with `args` under `policy`.
    pub async fn call<A, Fut, T, E>(
        &self,
        args: A,
        policy: RetryPolicy<T, E>,
    ) -> Result<Option<T>, RetryError<E>>
    where
        F: Fn(A) -> Fut,
        A: Clone,
        Fut: Future<Output = Result<T, E>>,
        E: Classify,
    {
        let policy = self.fill(policy);
        self.controller
            .run(|| (self.f)(args.clone()), policy)
            .await
    }

    /// Blocking form of [`Retrying::call`] for synchronous functions.
    pub fn call_blocking<A, T, E>(
        &self,
        args: A,
        policy: RetryPolicy<T, E>,
    ) -> Result<Option<T>, RetryError<E>>
    where
        F: Fn(A) -> Result<T, E>,
        A: Clone,
        E: Classify,
    {
        let policy = self.fill(policy);
        self.controller
            .run_blocking(|| (self.f)(args.clone()), policy)
    }
}
