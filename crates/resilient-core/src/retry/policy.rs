use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use super::classify::Classify;
use super::observe::Budget;
use super::table::{FaultActions, ResultActions, ResultLookup};
use crate::config::RetryConfig;
use crate::error::ConfigError;

/// Caller-supplied delay schedule: attempt number (1-based retry count) to wait.
pub type Backoff = Arc<dyn Fn(u32) -> Duration + Send + Sync>;

/// Callback run once per retry, before the wait.
pub type OnRetry = Arc<dyn Fn(u32) + Send + Sync>;

/// Retry, backoff and dispatch configuration for one call.
///
/// `T` is the work item's value type and `E` its fault type. The result
/// table's key type stays inside the table, so `T` needs no `Hash` unless
/// the table keys on the value itself. With no tables at all the work item
/// runs once and its outcome is returned or propagated.
pub struct RetryPolicy<T, E: Classify> {
    pub(crate) max_retries: Option<u32>,
    pub(crate) max_elapsed: Option<Duration>,
    pub(crate) delay: Duration,
    pub(crate) backoff: Option<Backoff>,
    pub(crate) on_retry: Option<OnRetry>,
    pub(crate) results: Option<Box<dyn ResultLookup<T, E>>>,
    pub(crate) faults: Option<FaultActions<E, T>>,
}

impl<T, E: Classify> Default for RetryPolicy<T, E> {
    fn default() -> Self {
        Self {
            max_retries: None,
            max_elapsed: None,
            delay: Duration::ZERO,
            backoff: None,
            on_retry: None,
            results: None,
            faults: None,
        }
    }
}

impl<T, E: Classify> RetryPolicy<T, E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed budgets and delay from the `[retry]` config section. Negative,
    /// NaN or overflowing second counts are rejected.
    pub fn from_config(cfg: &RetryConfig) -> Result<Self, ConfigError> {
        let mut policy = Self::new();
        policy.max_retries = cfg.max_retries;
        policy.max_elapsed = cfg
            .max_elapsed_secs
            .map(|secs| config_secs("max_elapsed_secs", secs))
            .transpose()?;
        policy.delay = config_secs("delay_secs", cfg.delay_secs)?;
        Ok(policy)
    }

    /// Stop once `n` attempts have run. The first attempt always runs, so
    /// `0` behaves like `1`.
    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = Some(n);
        self
    }

    /// Start no new attempt once `budget` has elapsed since the call began.
    pub fn max_elapsed(mut self, budget: Duration) -> Self {
        self.max_elapsed = Some(budget);
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Replace the delay before each wait with `f(attempt)`.
    pub fn backoff<F>(mut self, f: F) -> Self
    where
        F: Fn(u32) -> Duration + Send + Sync + 'static,
    {
        self.backoff = Some(Arc::new(f));
        self
    }

    pub fn on_retry<F>(mut self, f: F) -> Self
    where
        F: Fn(u32) + Send + Sync + 'static,
    {
        self.on_retry = Some(Arc::new(f));
        self
    }

    /// Set the result table. Its key type is erased here.
    pub fn results<K>(mut self, table: ResultActions<T, K, E>) -> Self
    where
        T: 'static,
        K: Eq + Hash + Send + Sync + 'static,
        E: 'static,
    {
        self.results = Some(Box::new(table));
        self
    }

    pub fn faults(mut self, table: FaultActions<E, T>) -> Self {
        self.faults = Some(table);
        self
    }

    /// Budget that stops attempt `attempt` from starting, if any.
    pub(crate) fn exhausted(&self, attempt: u32, elapsed: Duration) -> Option<Budget> {
        if let Some(budget) = self.max_elapsed {
            if elapsed >= budget {
                return Some(Budget::Elapsed(budget));
            }
        }
        match self.max_retries {
            Some(max) if attempt >= max => Some(Budget::Retries(max)),
            _ => None,
        }
    }

    /// Wait before retry `attempt`; a backoff result replaces the stored delay.
    pub(crate) fn next_delay(&mut self, attempt: u32) -> Duration {
        if let Some(backoff) = &self.backoff {
            self.delay = backoff(attempt);
        }
        self.delay
    }
}

fn config_secs(field: &'static str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value).map_err(|_| ConfigError::InvalidDuration { field, value })
}
