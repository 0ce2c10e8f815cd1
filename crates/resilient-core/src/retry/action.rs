//! Actions taken on a classified outcome, and the verdicts handlers return.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// What an action handler decided about an outcome.
///
/// `Verdict::Retry` is the retry sentinel. It is its own variant, so no value
/// produced by a work item can be mistaken for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict<T, E> {
    /// Run the work item again.
    Retry,
    /// Stop and return this value.
    Accept(T),
    /// Stop and propagate this fault.
    Raise(E),
}

pub(crate) type HandlerFuture<T, E> = Pin<Box<dyn Future<Output = Verdict<T, E>> + Send>>;

/// Handler normalised to `(outcome, attempt) -> future verdict`.
///
/// One-parameter and blocking handlers are adapted into this shape when the
/// action is built, so the loop has a single call path.
pub struct Handler<In, T, E>(Arc<dyn Fn(In, u32) -> HandlerFuture<T, E> + Send + Sync>);

impl<In, T, E> Handler<In, T, E> {
    pub(crate) fn call(&self, input: In, attempt: u32) -> HandlerFuture<T, E> {
        (self.0)(input, attempt)
    }
}

impl<In, T, E> Clone for Handler<In, T, E> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

/// Action bound to a result key or fault kind.
pub enum Action<In, T, E> {
    /// Return the outcome unchanged. For a fault this means propagating it
    /// right away, which lets one kind opt out of a wildcard retry.
    Accept,
    /// Run the work item again. Same effect as a handler returning
    /// [`Verdict::Retry`].
    Retry,
    /// Hand the outcome to a handler and follow its verdict.
    Handle(Handler<In, T, E>),
}

impl<In, T, E> Clone for Action<In, T, E> {
    fn clone(&self) -> Self {
        match self {
            Action::Accept => Action::Accept,
            Action::Retry => Action::Retry,
            Action::Handle(h) => Action::Handle(h.clone()),
        }
    }
}

impl<In, T, E> fmt::Debug for Action<In, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Accept => f.write_str("Accept"),
            Action::Retry => f.write_str("Retry"),
            Action::Handle(_) => f.write_str("Handle(..)"),
        }
    }
}

impl<In, T, E> Action<In, T, E>
where
    In: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    /// Blocking handler that sees only the outcome.
    pub fn handle<F>(f: F) -> Self
    where
        F: Fn(In) -> Verdict<T, E> + Send + Sync + 'static,
    {
        Self::handle_with_attempt(move |input, _| f(input))
    }

    /// Blocking handler that also sees the attempt number (0 = first call).
    pub fn handle_with_attempt<F>(f: F) -> Self
    where
        F: Fn(In, u32) -> Verdict<T, E> + Send + Sync + 'static,
    {
        Action::Handle(Handler(Arc::new(move |input, attempt| {
            let verdict = f(input, attempt);
            Box::pin(std::future::ready(verdict)) as HandlerFuture<T, E>
        })))
    }

    /// Suspending handler that sees only the outcome.
    pub fn handle_async<F, Fut>(f: F) -> Self
    where
        F: Fn(In) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Verdict<T, E>> + Send + 'static,
    {
        Self::handle_async_with_attempt(move |input, _| f(input))
    }

    /// Suspending handler that also sees the attempt number.
    pub fn handle_async_with_attempt<F, Fut>(f: F) -> Self
    where
        F: Fn(In, u32) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Verdict<T, E>> + Send + 'static,
    {
        Action::Handle(Handler(Arc::new(move |input, attempt| {
            Box::pin(f(input, attempt)) as HandlerFuture<T, E>
        })))
    }
}
