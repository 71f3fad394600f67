//! Existence probing
//!
//! The resolver never fetches anything itself; it asks an [`ExistenceProbe`]
//! whether a candidate location exists. Probes may block on network or archive
//! IO and own any retry policy.

use codebase_types::Location;
use std::sync::Arc;

/// Transport seam answering "does this location exist?"
pub trait ExistenceProbe: Send + Sync {
    /// Concrete location for `candidate` if it exists
    ///
    /// Implementations may return a different location than the candidate
    /// (after a redirect, for example).
    fn probe(&self, candidate: &Location) -> Option<Location>;
}

impl<P: ExistenceProbe + ?Sized> ExistenceProbe for Arc<P> {
    fn probe(&self, candidate: &Location) -> Option<Location> {
        (**self).probe(candidate)
    }
}

impl<P: ExistenceProbe + ?Sized> ExistenceProbe for &P {
    fn probe(&self, candidate: &Location) -> Option<Location> {
        (**self).probe(candidate)
    }
}

/// Probe for `file:` directory codebases
///
/// Reports a candidate as existing when it names a regular file. Archive
/// entries and remote schemes are reported absent; those belong to a network
/// or archive transport.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSystemProbe;

impl FileSystemProbe {
    /// Create new filesystem probe
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ExistenceProbe for FileSystemProbe {
    fn probe(&self, candidate: &Location) -> Option<Location> {
        let Some(path) = candidate.to_file_path() else {
            tracing::trace!("filesystem probe skipping non-file location {}", candidate);
            return None;
        };
        if path.is_file() {
            Some(candidate.clone())
        } else {
            None
        }
    }
}
