//! Resolver configuration
//!
//! Everything a resolver needs that is fixed for its lifetime: the execution
//! mode, the ordered codebase locations, and how code-unit names map to
//! entries.
//!
//! ```toml
//! mode = "embedded"
//! codebase = [
//!     "http://example.org/netx/about.jar",
//!     "http://example.org/netx/",
//! ]
//! code_unit_extension = "class"
//! ```

use crate::delegate::DEFAULT_CODE_UNIT_EXTENSION;
use crate::error::ConfigError;
use codebase_types::{ExecutionMode, Location};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Resolver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Execution mode of the launched code
    pub mode: ExecutionMode,
    /// Codebase locations, searched in order
    pub codebase: Vec<Location>,
    /// File extension appended to dotted code-unit names
    pub code_unit_extension: String,
}

impl ResolverConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With execution mode
    #[inline]
    #[must_use]
    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// With an additional codebase location
    #[inline]
    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.codebase.push(location);
        self
    }

    /// With additional codebase locations
    #[must_use]
    pub fn with_locations(mut self, locations: impl IntoIterator<Item = Location>) -> Self {
        self.codebase.extend(locations);
        self
    }

    /// With code-unit extension
    #[inline]
    #[must_use]
    pub fn with_code_unit_extension(mut self, extension: impl Into<String>) -> Self {
        self.code_unit_extension = extension.into();
        self
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or fails to parse/validate
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    ///
    /// # Errors
    /// Returns error if:
    /// - The TOML is invalid or has unknown keys
    /// - A codebase location is malformed
    /// - The code-unit extension is not a plain extension
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check semantic constraints
    ///
    /// # Errors
    /// Returns error if the code-unit extension contains `/` or `.`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .code_unit_extension
            .contains(|c: char| c == '/' || c == '.')
        {
            return Err(ConfigError::Validation(format!(
                "code_unit_extension must be a bare extension, got '{}'",
                self.code_unit_extension
            )));
        }
        Ok(())
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::default(),
            codebase: Vec::new(),
            code_unit_extension: DEFAULT_CODE_UNIT_EXTENSION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = ResolverConfig::new();
        assert_eq!(config.mode, ExecutionMode::HostedApplication);
        assert!(config.codebase.is_empty());
        assert_eq!(config.code_unit_extension, "class");
    }

    #[test]
    fn parses_toml() {
        let config = ResolverConfig::from_toml(
            r#"
            mode = "embedded"
            codebase = ["http://example.org/netx/about.jar", "http://example.org/netx/"]
            "#,
        )
        .unwrap();

        assert_eq!(config.mode, ExecutionMode::EmbeddedComponent);
        assert_eq!(
            config.codebase,
            vec![
                Location::parse("http://example.org/netx/about.jar").unwrap(),
                Location::parse("http://example.org/netx/").unwrap(),
            ]
        );
        assert_eq!(config.code_unit_extension, "class");
    }

    #[test]
    fn rejects_bad_location() {
        let result = ResolverConfig::from_toml(r#"codebase = ["relative/path"]"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn rejects_unknown_keys() {
        let result = ResolverConfig::from_toml("ttl_secs = 30");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn rejects_dotted_extension() {
        let result = ResolverConfig::from_toml(r#"code_unit_extension = ".class""#);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resolver.toml");
        std::fs::write(&path, "mode = \"hosted\"\ncodebase = [\"file:///opt/app/\"]\n").unwrap();

        let config = ResolverConfig::from_file(&path).unwrap();
        assert_eq!(config.codebase.len(), 1);

        let missing = ResolverConfig::from_file(&dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn builder_methods() {
        let config = ResolverConfig::new()
            .with_mode(ExecutionMode::EmbeddedComponent)
            .with_location(Location::parse("http://example.org/a/").unwrap())
            .with_locations([Location::parse("http://example.org/b.jar").unwrap()])
            .with_code_unit_extension("bin");

        assert_eq!(config.codebase.len(), 2);
        assert_eq!(config.code_unit_extension, "bin");
        assert!(config.validate().is_ok());
    }
}
