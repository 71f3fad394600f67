//! Security contexts and descriptor association
//!
//! A [`SecurityContext`] carries the permission level granted to loaded code
//! and a back-reference to the descriptor that owns it. Local resolution of
//! code units is only permitted when that back-reference points at the
//! descriptor the resolver was created for.

use crate::descriptor::{DescriptorId, LaunchDescriptor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Permission level granted to code loaded under a context
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    /// Untrusted code, default
    #[default]
    Sandbox,

    /// Platform-level permissions
    Platform,

    /// Unrestricted
    All,
}

impl PermissionLevel {
    /// Lowercase name, as used in configuration
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Platform => "platform",
            Self::All => "all",
        }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionLevel {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "platform" => Ok(Self::Platform),
            "all" => Ok(Self::All),
            _ => Err(UnknownVariant {
                kind: "permission level",
                value: s.to_string(),
            }),
        }
    }
}

/// Unrecognized name for a string-parsed enum
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: '{value}'")]
pub struct UnknownVariant {
    /// What was being parsed
    pub kind: &'static str,
    /// Rejected input
    pub value: String,
}

/// Security policy attached to a launch descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityContext {
    owner: Option<DescriptorId>,
    permissions: PermissionLevel,
}

impl SecurityContext {
    /// Context bound to its owning descriptor
    #[inline]
    #[must_use]
    pub fn bound_to(owner: DescriptorId, permissions: PermissionLevel) -> Self {
        Self {
            owner: Some(owner),
            permissions,
        }
    }

    /// Context with no owning descriptor
    #[inline]
    #[must_use]
    pub fn unbound(permissions: PermissionLevel) -> Self {
        Self {
            owner: None,
            permissions,
        }
    }

    /// Owning descriptor, if bound
    #[inline]
    #[must_use]
    pub fn owner(&self) -> Option<DescriptorId> {
        self.owner
    }

    /// Granted permission level
    #[inline]
    #[must_use]
    pub fn permissions(&self) -> PermissionLevel {
        self.permissions
    }

    /// Check the back-reference against a specific descriptor
    #[inline]
    #[must_use]
    pub fn is_bound_to(&self, descriptor: DescriptorId) -> bool {
        self.owner == Some(descriptor)
    }
}

/// Security association observed by a resolver
///
/// Distinguishes a descriptor whose context is properly bound, a descriptor
/// whose context is not bound back to it, and no descriptor at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityAssociation {
    /// Descriptor present and its context is bound to it
    Present(SecurityContext),

    /// Descriptor present but its context is unbound or bound elsewhere
    PresentUnbound,

    /// No descriptor
    Absent,
}

impl SecurityAssociation {
    /// Derive the association for an optional descriptor
    #[must_use]
    pub fn of(descriptor: Option<&LaunchDescriptor>) -> Self {
        match descriptor {
            None => Self::Absent,
            Some(d) if d.security().is_bound_to(d.id()) => Self::Present(d.security().clone()),
            Some(_) => Self::PresentUnbound,
        }
    }

    /// Local resolution is permitted
    #[inline]
    #[must_use]
    pub fn is_bound(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Bound context, if any
    #[inline]
    #[must_use]
    pub fn context(&self) -> Option<&SecurityContext> {
        match self {
            Self::Present(ctx) => Some(ctx),
            Self::PresentUnbound | Self::Absent => None,
        }
    }

    /// Short label for logging
    #[inline]
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Present(_) => "bound",
            Self::PresentUnbound => "unbound",
            Self::Absent => "absent",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Location;

    fn descriptor() -> LaunchDescriptor {
        LaunchDescriptor::builder(Location::parse("http://example.org/app/").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn default_descriptor_is_bound() {
        let d = descriptor();
        let association = SecurityAssociation::of(Some(&d));
        assert!(association.is_bound());
        assert_eq!(
            association.context().map(SecurityContext::permissions),
            Some(PermissionLevel::Sandbox)
        );
    }

    #[test]
    fn unbound_and_absent_are_distinct() {
        let d = LaunchDescriptor::builder(Location::parse("http://example.org/app/").unwrap())
            .unbound_security()
            .build()
            .unwrap();

        assert_eq!(
            SecurityAssociation::of(Some(&d)),
            SecurityAssociation::PresentUnbound
        );
        assert_eq!(SecurityAssociation::of(None), SecurityAssociation::Absent);
        assert_ne!(
            SecurityAssociation::PresentUnbound.label(),
            SecurityAssociation::Absent.label()
        );
    }

    #[test]
    fn context_bound_to_other_descriptor_is_unbound() {
        let other = descriptor();
        let d = LaunchDescriptor::builder(Location::parse("http://example.org/app/").unwrap())
            .security(SecurityContext::bound_to(other.id(), PermissionLevel::All))
            .build()
            .unwrap();

        assert!(!SecurityAssociation::of(Some(&d)).is_bound());
    }

    #[test]
    fn permission_level_parsing() {
        assert_eq!("ALL".parse::<PermissionLevel>(), Ok(PermissionLevel::All));
        assert_eq!(PermissionLevel::Platform.to_string(), "platform");
        let err = "root".parse::<PermissionLevel>().unwrap_err();
        assert_eq!(err.to_string(), "unknown permission level: 'root'");
    }
}
