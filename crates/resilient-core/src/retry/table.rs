//! Outcome dispatch tables: exact entries first, then the wildcard.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use super::action::Action;
use super::classify::Classify;

/// Maps successful results to actions.
///
/// Each result is turned into a key by the classifier and looked up in the
/// exact entries, falling back to the wildcard.
pub struct ResultActions<T, K, E> {
    classifier: Arc<dyn Fn(&T) -> K + Send + Sync>,
    exact: HashMap<K, Action<T, T, E>>,
    wildcard: Option<Action<T, T, E>>,
}

impl<T, E> ResultActions<T, T, E>
where
    T: Clone + Eq + Hash + 'static,
{
    /// Table keyed by the raw result value.
    pub fn by_value() -> Self {
        Self::classified(T::clone)
    }
}

impl<T, K, E> ResultActions<T, K, E>
where
    K: Eq + Hash,
{
    /// Table keyed by `classifier(&result)`.
    pub fn classified<C>(classifier: C) -> Self
    where
        C: Fn(&T) -> K + Send + Sync + 'static,
    {
        Self {
            classifier: Arc::new(classifier),
            exact: HashMap::new(),
            wildcard: None,
        }
    }

    /// Bind `action` to results whose key equals `key`.
    pub fn on(mut self, key: K, action: Action<T, T, E>) -> Self {
        self.exact.insert(key, action);
        self
    }

    /// Bind `action` to every result no exact entry matches.
    pub fn any(mut self, action: Action<T, T, E>) -> Self {
        self.wildcard = Some(action);
        self
    }

    pub(crate) fn resolve(&self, result: &T) -> Option<&Action<T, T, E>> {
        let key = (self.classifier)(result);
        self.exact.get(&key).or(self.wildcard.as_ref())
    }
}

/// A result table with its key type erased, as stored in a policy.
pub(crate) trait ResultLookup<T, E>: Send + Sync {
    fn lookup(&self, result: &T) -> Option<&Action<T, T, E>>;
}

impl<T, K, E> ResultLookup<T, E> for ResultActions<T, K, E>
where
    K: Eq + Hash + Send + Sync,
{
    fn lookup(&self, result: &T) -> Option<&Action<T, T, E>> {
        self.resolve(result)
    }
}

impl<T, K: fmt::Debug, E> fmt::Debug for ResultActions<T, K, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultActions")
            .field("exact", &self.exact)
            .field("wildcard", &self.wildcard)
            .finish()
    }
}

/// Maps faults to actions by their [`Classify::kind`].
pub struct FaultActions<E: Classify, T> {
    exact: HashMap<E::Kind, Action<E, T, E>>,
    wildcard: Option<Action<E, T, E>>,
}

impl<E: Classify, T> Default for FaultActions<E, T> {
    fn default() -> Self {
        Self {
            exact: HashMap::new(),
            wildcard: None,
        }
    }
}

impl<E: Classify, T> FaultActions<E, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `action` to faults of category `kind`.
    pub fn on(mut self, kind: E::Kind, action: Action<E, T, E>) -> Self {
        self.exact.insert(kind, action);
        self
    }

    /// Bind `action` to every fault no exact entry matches.
    pub fn any(mut self, action: Action<E, T, E>) -> Self {
        self.wildcard = Some(action);
        self
    }

    pub(crate) fn resolve(&self, kind: &E::Kind) -> Option<&Action<E, T, E>> {
        self.exact.get(kind).or(self.wildcard.as_ref())
    }
}

impl<E: Classify, T> fmt::Debug for FaultActions<E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaultActions")
            .field("exact", &self.exact)
            .field("wildcard", &self.wildcard)
            .finish()
    }
}
