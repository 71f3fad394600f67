//! Codebase Resolver
//!
//! Locates code units and resources for an application launched from a
//! codebase.
//!
//! # Core Operations
//!
//! - **Code units**: ask the delegate first; search the codebase only when the
//!   delegate declines and the descriptor's security context is bound to it
//! - **Resources**: gated by execution mode when no descriptor is present;
//!   every outcome, including failures, is recorded once per name
//!
//! # Architecture
//!
//! ```text
//! caller → CodebaseResolver ─► CodeUnitResolver (delegate chain)
//!               │    ↑
//!               │    └─ ResolutionCache (write-once, per name)
//!               ▼
//!          ExistenceProbe (transport)
//! ```
//!
//! # Example
//!
//! ```rust
//! use codebase_resolver::{CodebaseResolver, ExistenceProbe, ResolverConfig, Terminus};
//! use codebase_types::{ExecutionMode, Location};
//! use std::sync::Arc;
//!
//! struct Everything;
//!
//! impl ExistenceProbe for Everything {
//!     fn probe(&self, candidate: &Location) -> Option<Location> {
//!         Some(candidate.clone())
//!     }
//! }
//!
//! let config = ResolverConfig::new()
//!     .with_mode(ExecutionMode::EmbeddedComponent)
//!     .with_location(Location::parse("http://example.org/app/").unwrap());
//! let resolver = CodebaseResolver::new(config, Arc::new(Terminus), Arc::new(Everything));
//!
//! let found = resolver.resolve_resource("about.html").unwrap();
//! assert_eq!(found.as_str(), "http://example.org/app/about.html");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cache;
pub mod config;
pub mod delegate;
pub mod error;
pub mod gate;
pub mod outcome;
pub mod probe;
pub mod resolver;

// Re-exports for convenience
pub use cache::{CacheStats, ResolutionCache};
pub use config::ResolverConfig;
pub use delegate::{code_unit_entry, CodeUnitResolver, DescriptorResolver, Terminus};
pub use error::{ConfigError, DelegateError, ResolveError, ResolveResult};
pub use outcome::{Denial, Outcome};
pub use probe::{ExistenceProbe, FileSystemProbe};
pub use resolver::{CodebaseResolver, ResolverStats};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for resolving against a codebase
    pub use crate::{
        CodeUnitResolver, CodebaseResolver, ExistenceProbe, Outcome, ResolveError,
        ResolverConfig, Terminus,
    };
    pub use codebase_types::{ExecutionMode, LaunchDescriptor, Location, SecurityAssociation};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
