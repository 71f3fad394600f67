//! Error types for codebase resolution
//!
//! Provides error handling for:
//! - Lookups that find nothing (or are not permitted to look)
//! - Resource lookups without a launch descriptor in hosted mode
//! - Hard failures reported by a delegate resolver
//! - Configuration loading

use std::path::PathBuf;

/// Errors returned by code-unit and resource lookups
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Name not resolvable by the delegate or any applicable location
    #[error("not found: '{name}'")]
    NotFound { name: String },

    /// Resource requested in hosted mode without a launch descriptor
    #[error("no launch descriptor to resolve '{name}' in hosted mode")]
    NullDescriptor { name: String },

    /// Delegate failed for a reason other than not finding the name
    #[error(transparent)]
    Delegate(#[from] DelegateError),
}

impl ResolveError {
    /// Create not-found error for name
    #[inline]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create null-descriptor error for name
    #[inline]
    pub fn null_descriptor(name: impl Into<String>) -> Self {
        Self::NullDescriptor { name: name.into() }
    }

    /// Check if a chained resolver may fall through to local lookup
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Name the failed lookup was for
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::NotFound { name } | Self::NullDescriptor { name } => name,
            Self::Delegate(err) => err.name(),
        }
    }
}

/// Hard failure from a delegate resolver
#[derive(Debug, thiserror::Error)]
#[error("delegate failed resolving '{name}': {source}")]
pub struct DelegateError {
    name: String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl DelegateError {
    /// Wrap a delegate failure for `name`
    pub fn new(
        name: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Name the delegate was resolving
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Errors while loading resolver configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading configuration
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid TOML or field values
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Semantically invalid configuration
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for lookups
pub type ResolveResult<T> = Result<T, ResolveError>;
