//! Execution mode of the launched code

use crate::security::UnknownVariant;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the launched code is hosted
///
/// Fixed when a resolver is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExecutionMode {
    /// Stand-alone application started from a launch descriptor
    #[default]
    #[serde(rename = "hosted", alias = "hosted_application")]
    HostedApplication,

    /// Component embedded in a host container; may run without a descriptor
    #[serde(rename = "embedded", alias = "embedded_component")]
    EmbeddedComponent,
}

impl ExecutionMode {
    /// Resources may be resolved from configured locations alone when no
    /// descriptor is present
    #[inline]
    #[must_use]
    pub const fn permits_descriptorless_resources(self) -> bool {
        matches!(self, Self::EmbeddedComponent)
    }

    /// Short name, as used in configuration
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HostedApplication => "hosted",
            Self::EmbeddedComponent => "embedded",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionMode {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hosted" | "hosted_application" => Ok(Self::HostedApplication),
            "embedded" | "embedded_component" => Ok(Self::EmbeddedComponent),
            _ => Err(UnknownVariant {
                kind: "execution mode",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_hosted() {
        assert_eq!(ExecutionMode::default(), ExecutionMode::HostedApplication);
        assert!(!ExecutionMode::default().permits_descriptorless_resources());
        assert!(ExecutionMode::EmbeddedComponent.permits_descriptorless_resources());
    }

    #[test]
    fn parse_round_trips_display() {
        for mode in [ExecutionMode::HostedApplication, ExecutionMode::EmbeddedComponent] {
            assert_eq!(mode.to_string().parse::<ExecutionMode>(), Ok(mode));
        }
        assert_eq!(
            "Embedded_Component".parse::<ExecutionMode>(),
            Ok(ExecutionMode::EmbeddedComponent)
        );
        assert!("applet".parse::<ExecutionMode>().is_err());
    }
}
