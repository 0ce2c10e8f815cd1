//! Retry loop: run a work item until an action accepts, a fault escapes or a
//! budget runs out.

use std::future::Future;
use std::io;
use std::sync::Arc;

use tokio::time::Instant;

use super::action::{Action, Verdict};
use super::classify::Classify;
use super::error::RetryError;
use super::observe::{Event, NoopObserver, Observer, Origin};
use super::policy::RetryPolicy;
use super::table::{FaultActions, ResultLookup};

/// Where one attempt left the loop.
enum Step<T, E> {
    Retry,
    Done(T),
    Raise(RetryError<E>),
}

impl<T, E> From<Verdict<T, E>> for Step<T, E> {
    fn from(verdict: Verdict<T, E>) -> Self {
        match verdict {
            Verdict::Retry => Step::Retry,
            Verdict::Accept(value) => Step::Done(value),
            Verdict::Raise(fault) => Step::Raise(RetryError::Action(fault)),
        }
    }
}

/// Drives work items under a [`RetryPolicy`], reporting to an [`Observer`].
///
/// Holds no per-call state; one controller can serve any number of
/// concurrent calls.
#[derive(Clone)]
pub struct Controller {
    observer: Arc<dyn Observer>,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    pub fn new() -> Self {
        Self::with_observer(Arc::new(NoopObserver))
    }

    pub fn with_observer(observer: Arc<dyn Observer>) -> Self {
        Self { observer }
    }

    fn emit(&self, event: Event) {
        self.observer.on_event(&event);
    }

    /// Runs `work` until an action settles the outcome.
    ///
    /// Returns `Ok(Some(value))` when a value is accepted, `Ok(None)` when
    /// the attempt or time budget runs out, and `Err` when a fault has no
    /// action to take it. Waits between attempts suspend on the tokio timer,
    /// so other calls on the same runtime keep running. The budgets are
    /// checked only before an attempt starts; an attempt in flight is never
    /// interrupted.
    pub async fn run<F, Fut, T, E>(
        &self,
        mut work: F,
        mut policy: RetryPolicy<T, E>,
    ) -> Result<Option<T>, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Classify,
    {
        let start = Instant::now();
        let mut attempt = 0u32;
        loop {
            if attempt > 0 {
                if let Some(budget) = policy.exhausted(attempt, start.elapsed()) {
                    self.emit(Event::Exhausted { attempt, budget });
                    return Ok(None);
                }
                if let Some(on_retry) = &policy.on_retry {
                    on_retry(attempt);
                }
                let delay = policy.next_delay(attempt);
                self.emit(Event::Waiting { attempt, delay });
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }

            self.emit(Event::Attempt { attempt });
            let (origin, step) = match work().await {
                Ok(value) => (
                    Origin::Result,
                    on_result(value, attempt, policy.results.as_deref()).await,
                ),
                Err(fault) => (
                    Origin::Fault,
                    on_fault(fault, attempt, policy.faults.as_ref()).await,
                ),
            };

            match step {
                Step::Retry => {
                    self.emit(Event::RetryRequested { attempt, origin });
                    attempt += 1;
                }
                Step::Done(value) => {
                    self.emit(Event::Finished { attempt, origin });
                    return Ok(Some(value));
                }
                Step::Raise(err) => {
                    match &err {
                        RetryError::Unhandled(fault) => {
                            let kind = format!("{:?}", Classify::kind(fault));
                            self.emit(Event::Unhandled { attempt, kind });
                        }
                        RetryError::Action(fault) => {
                            let kind = format!("{:?}", Classify::kind(fault));
                            self.emit(Event::HandlerRaised {
                                attempt,
                                origin,
                                kind,
                            });
                        }
                        RetryError::Runtime(_) => {}
                    }
                    return Err(err);
                }
            }
        }
    }

    /// Blocking form of [`Controller::run`] for synchronous work items.
    ///
    /// Drives the same loop on a private current-thread runtime, so waits
    /// block the calling thread. Called from inside a tokio runtime it fails
    /// with [`RetryError::Runtime`] before the first attempt; use
    /// [`Controller::run`] or `spawn_blocking` there.
    pub fn run_blocking<F, T, E>(
        &self,
        mut work: F,
        policy: RetryPolicy<T, E>,
    ) -> Result<Option<T>, RetryError<E>>
    where
        F: FnMut() -> Result<T, E>,
        E: Classify,
    {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(RetryError::Runtime(io::Error::new(
                io::ErrorKind::Other,
                "blocking retry called from inside a tokio runtime",
            )));
        }
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(RetryError::Runtime)?;
        runtime.block_on(self.run(move || std::future::ready(work()), policy))
    }
}

async fn on_result<T, E>(
    value: T,
    attempt: u32,
    table: Option<&dyn ResultLookup<T, E>>,
) -> Step<T, E> {
    let Some(table) = table else {
        return Step::Done(value);
    };
    match table.lookup(&value) {
        None | Some(Action::Accept) => Step::Done(value),
        Some(Action::Retry) => Step::Retry,
        Some(Action::Handle(handler)) => handler.call(value, attempt).await.into(),
    }
}

async fn on_fault<T, E>(fault: E, attempt: u32, table: Option<&FaultActions<E, T>>) -> Step<T, E>
where
    E: Classify,
{
    let kind = Classify::kind(&fault);
    match table.and_then(|t| t.resolve(&kind)) {
        None | Some(Action::Accept) => Step::Raise(RetryError::Unhandled(fault)),
        Some(Action::Retry) => Step::Retry,
        Some(Action::Handle(handler)) => handler.call(fault, attempt).await.into(),
    }
}

/// Runs `work` under `policy` with a default [`Controller`].
pub async fn execute<F, Fut, T, E>(
    work: F,
    policy: RetryPolicy<T, E>,
) -> Result<Option<T>, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Classify,
{
    Controller::new().run(work, policy).await
}

/// Blocking form of [`execute`].
pub fn execute_blocking<F, T, E>(
    work: F,
    policy: RetryPolicy<T, E>,
) -> Result<Option<T>, RetryError<E>>
where
    F: FnMut() -> Result<T, E>,
    E: Classify,
{
    Controller::new().run_blocking(work, policy)
}
