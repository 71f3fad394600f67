//! Cached lookup outcomes
//!
//! Lookups record what happened as a value so that failures can be replayed
//! from the cache exactly like successes.

use crate::error::{ResolveError, ResolveResult};
use codebase_types::Location;
use std::fmt;

/// Why a lookup was refused before any probing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Denial {
    /// Hosted mode with no launch descriptor
    NullDescriptor,
}

impl Denial {
    /// Error reported to the caller for `name`
    #[must_use]
    pub fn into_error(self, name: &str) -> ResolveError {
        match self {
            Self::NullDescriptor => ResolveError::null_descriptor(name),
        }
    }
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullDescriptor => f.write_str("no launch descriptor in hosted mode"),
        }
    }
}

/// Result of a single resource lookup
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// First applicable location holding the name
    Found(Location),

    /// No applicable location holds the name
    NotFound,

    /// Lookup was not permitted
    Denied(Denial),
}

impl Outcome {
    /// Check for a successful lookup
    #[inline]
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Found location, if any
    #[inline]
    #[must_use]
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::Found(location) => Some(location),
            Self::NotFound | Self::Denied(_) => None,
        }
    }

    /// Convert into the caller-facing result for `name`
    ///
    /// # Errors
    /// `NotFound` and `Denied` outcomes become the matching [`ResolveError`]
    pub fn into_result(self, name: &str) -> ResolveResult<Location> {
        match self {
            Self::Found(location) => Ok(location),
            Self::NotFound => Err(ResolveError::not_found(name)),
            Self::Denied(denial) => Err(denial.into_error(name)),
        }
    }
}

impl From<Option<Location>> for Outcome {
    fn from(found: Option<Location>) -> Self {
        found.map_or(Self::NotFound, Self::Found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_map_to_errors() {
        let location = Location::parse("http://example.org/a.txt").unwrap();
        assert_eq!(
            Outcome::Found(location.clone()).into_result("a.txt").unwrap(),
            location
        );
        assert!(Outcome::NotFound
            .into_result("a.txt")
            .unwrap_err()
            .is_not_found());
        assert!(matches!(
            Outcome::Denied(Denial::NullDescriptor).into_result("a.txt"),
            Err(ResolveError::NullDescriptor { .. })
        ));
    }

    #[test]
    fn from_option() {
        assert_eq!(Outcome::from(None), Outcome::NotFound);
        let location = Location::parse("file:/tmp/x").unwrap();
        let outcome = Outcome::from(Some(location.clone()));
        assert!(outcome.is_found());
        assert_eq!(outcome.location(), Some(&location));
    }
}
