//! Codebase Types
//!
//! Value types shared by codebase resolution.
//!
//! # Core Concepts
//!
//! - [`Location`]: Absolute URI of a codebase entry, archive, or resource
//! - [`LaunchDescriptor`]: Manifest with codebase, declared resources and security
//! - [`SecurityContext`]: Permission level plus back-reference to its descriptor
//! - [`SecurityAssociation`]: Bound / unbound / absent, as seen by a resolver
//! - [`ExecutionMode`]: Hosted application or embedded component
//!
//! # Example
//!
//! ```rust
//! use codebase_types::{LaunchDescriptor, Location, SecurityAssociation};
//!
//! let codebase = Location::parse("http://example.org/app/").unwrap();
//! let descriptor = LaunchDescriptor::builder(codebase)
//!     .resource("lib/app.jar")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(descriptor.resources()[0].as_str(), "http://example.org/app/lib/app.jar");
//! assert!(SecurityAssociation::of(Some(&descriptor)).is_bound());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod descriptor;
mod location;
mod mode;
mod security;

// Re-exports
pub use descriptor::{DescriptorId, LaunchDescriptor, LaunchDescriptorBuilder};
pub use location::{Location, LocationError, ARCHIVE_SCHEME};
pub use mode::ExecutionMode;
pub use security::{PermissionLevel, SecurityAssociation, SecurityContext, UnknownVariant};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
