//! Map faults onto category tags for fault-table lookup.

use std::fmt::Debug;
use std::hash::Hash;

/// A fault that can be sorted into a category for dispatch.
///
/// The fault table is keyed by `Kind`, so lookup is a plain map access on a
/// tag the fault type chooses for itself. Most implementations use a
/// fieldless enum.
pub trait Classify {
    /// Category tag used as the fault-table key.
    type Kind: Eq + Hash + Debug + Send + Sync + 'static;

    /// Category of this fault.
    fn kind(&self) -> Self::Kind;
}

impl Classify for std::io::Error {
    type Kind = std::io::ErrorKind;

    fn kind(&self) -> std::io::ErrorKind {
        std::io::Error::kind(self)
    }
}
