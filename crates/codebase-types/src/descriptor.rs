//! Launch descriptors
//!
//! Read-only view of the manifest a launcher was started with: where the
//! codebase lives, which resources it declares, and its security context.
//! Parsing the manifest format happens elsewhere; this module only models the
//! result.

use crate::location::{Location, LocationError};
use crate::security::{PermissionLevel, SecurityAssociation, SecurityContext};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a launch descriptor, used for security back-references
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DescriptorId(pub Uuid);

impl DescriptorId {
    /// Generate new descriptor ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DescriptorId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DescriptorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Manifest of a launched application
#[derive(Debug, Clone)]
pub struct LaunchDescriptor {
    id: DescriptorId,
    codebase: Location,
    resources: Vec<Location>,
    security: SecurityContext,
}

impl LaunchDescriptor {
    /// Start building a descriptor rooted at `codebase`
    #[inline]
    #[must_use]
    pub fn builder(codebase: Location) -> LaunchDescriptorBuilder {
        LaunchDescriptorBuilder::new(codebase)
    }

    /// Descriptor identity
    #[inline]
    #[must_use]
    pub fn id(&self) -> DescriptorId {
        self.id
    }

    /// Base codebase location
    #[inline]
    #[must_use]
    pub fn codebase(&self) -> &Location {
        &self.codebase
    }

    /// Declared resource locations, in declaration order
    #[inline]
    #[must_use]
    pub fn resources(&self) -> &[Location] {
        &self.resources
    }

    /// Security context (always present; may be unbound)
    #[inline]
    #[must_use]
    pub fn security(&self) -> &SecurityContext {
        &self.security
    }

    /// Association of this descriptor's security context
    #[inline]
    #[must_use]
    pub fn security_association(&self) -> SecurityAssociation {
        SecurityAssociation::of(Some(self))
    }
}

/// Security setting requested on a builder
#[derive(Debug, Clone)]
enum SecuritySpec {
    Bound(PermissionLevel),
    Unbound(PermissionLevel),
    Explicit(SecurityContext),
}

/// Builder for [`LaunchDescriptor`]
///
/// Relative resource references resolve against the codebase. The security
/// context is bound to the new descriptor with sandbox permissions unless
/// configured otherwise.
#[derive(Debug, Clone)]
pub struct LaunchDescriptorBuilder {
    id: DescriptorId,
    codebase: Location,
    resources: Vec<String>,
    security: SecuritySpec,
}

impl LaunchDescriptorBuilder {
    fn new(codebase: Location) -> Self {
        Self {
            id: DescriptorId::new(),
            codebase,
            resources: Vec::new(),
            security: SecuritySpec::Bound(PermissionLevel::default()),
        }
    }

    /// Use a fixed identity instead of a generated one
    #[inline]
    #[must_use]
    pub fn id(mut self, id: DescriptorId) -> Self {
        self.id = id;
        self
    }

    /// Declare a resource, absolute or relative to the codebase
    #[inline]
    #[must_use]
    pub fn resource(mut self, reference: impl Into<String>) -> Self {
        self.resources.push(reference.into());
        self
    }

    /// Declare several resources
    #[must_use]
    pub fn resources<I, S>(mut self, references: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resources.extend(references.into_iter().map(Into::into));
        self
    }

    /// Bind the security context to this descriptor with `permissions`
    #[inline]
    #[must_use]
    pub fn permissions(mut self, permissions: PermissionLevel) -> Self {
        self.security = SecuritySpec::Bound(permissions);
        self
    }

    /// Leave the security context without an owning descriptor
    #[inline]
    #[must_use]
    pub fn unbound_security(mut self) -> Self {
        let permissions = match &self.security {
            SecuritySpec::Bound(p) | SecuritySpec::Unbound(p) => *p,
            SecuritySpec::Explicit(ctx) => ctx.permissions(),
        };
        self.security = SecuritySpec::Unbound(permissions);
        self
    }

    /// Use an explicit security context
    #[inline]
    #[must_use]
    pub fn security(mut self, context: SecurityContext) -> Self {
        self.security = SecuritySpec::Explicit(context);
        self
    }

    /// Build the descriptor
    ///
    /// # Errors
    /// Returns error if a declared resource does not resolve to a valid
    /// location
    pub fn build(self) -> Result<LaunchDescriptor, LocationError> {
        let resources = self
            .resources
            .iter()
            .map(|r| self.codebase.resolve(r))
            .collect::<Result<Vec<_>, _>>()?;

        let security = match self.security {
            SecuritySpec::Bound(p) => SecurityContext::bound_to(self.id, p),
            SecuritySpec::Unbound(p) => SecurityContext::unbound(p),
            SecuritySpec::Explicit(ctx) => ctx,
        };

        Ok(LaunchDescriptor {
            id: self.id,
            codebase: self.codebase,
            resources,
            security,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn codebase() -> Location {
        Location::parse("http://example.org/netx/").unwrap()
    }

    #[test]
    fn resources_resolve_against_codebase() {
        let d = LaunchDescriptor::builder(codebase())
            .resource("about.jar")
            .resource("https://cdn.example.org/lib.jar")
            .build()
            .unwrap();

        let resources: Vec<&str> = d.resources().iter().map(Location::as_str).collect();
        assert_eq!(
            resources,
            vec![
                "http://example.org/netx/about.jar",
                "https://cdn.example.org/lib.jar"
            ]
        );
    }

    #[test]
    fn invalid_resource_fails_build() {
        let result = LaunchDescriptor::builder(codebase())
            .resource("bad name.jar")
            .build();
        assert!(matches!(result, Err(LocationError::InvalidCharacter(_))));
    }

    #[test]
    fn security_defaults_to_bound_sandbox() {
        let d = LaunchDescriptor::builder(codebase()).build().unwrap();
        assert!(d.security().is_bound_to(d.id()));
        assert_eq!(d.security().permissions(), PermissionLevel::Sandbox);
    }

    #[test]
    fn unbound_keeps_permissions() {
        let d = LaunchDescriptor::builder(codebase())
            .permissions(PermissionLevel::All)
            .unbound_security()
            .build()
            .unwrap();
        assert_eq!(d.security().owner(), None);
        assert_eq!(d.security().permissions(), PermissionLevel::All);
    }

    #[test]
    fn fixed_id_is_used_for_binding() {
        let id = DescriptorId::new();
        let d = LaunchDescriptor::builder(codebase()).id(id).build().unwrap();
        assert_eq!(d.id(), id);
        assert_eq!(d.security().owner(), Some(id));
    }
}
