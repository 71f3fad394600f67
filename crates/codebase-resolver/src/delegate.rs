//! Delegate resolvers for code units
//!
//! Code-unit lookups always ask an upstream resolver first. Anything
//! implementing [`CodeUnitResolver`] can be that upstream: the chain
//! [`Terminus`], a [`DescriptorResolver`] over a launch descriptor's own
//! resources, or another codebase resolver.

use crate::error::{ResolveError, ResolveResult};
use crate::probe::ExistenceProbe;
use codebase_types::{LaunchDescriptor, Location};
use std::sync::Arc;

/// Default file extension of compiled code units
pub const DEFAULT_CODE_UNIT_EXTENSION: &str = "class";

/// Capability to resolve a code unit by name
pub trait CodeUnitResolver: Send + Sync {
    /// Location of the code unit `name`
    ///
    /// # Errors
    /// - [`ResolveError::NotFound`] when this resolver cannot supply `name`;
    ///   callers may fall through to their own lookup
    /// - any other variant is a hard failure and must be propagated unchanged
    fn resolve_code_unit(&self, name: &str) -> ResolveResult<Location>;
}

impl<R: CodeUnitResolver + ?Sized> CodeUnitResolver for Arc<R> {
    fn resolve_code_unit(&self, name: &str) -> ResolveResult<Location> {
        (**self).resolve_code_unit(name)
    }
}

/// End of a delegation chain; knows no code units
#[derive(Debug, Default, Clone, Copy)]
pub struct Terminus;

impl CodeUnitResolver for Terminus {
    fn resolve_code_unit(&self, name: &str) -> ResolveResult<Location> {
        Err(ResolveError::not_found(name))
    }
}

/// Resolves code units from the resources a launch descriptor declares
///
/// This is the launcher's own loader; a codebase resolver sits behind it and
/// only searches the codebase when the declared resources come up empty.
pub struct DescriptorResolver {
    descriptor: Arc<LaunchDescriptor>,
    probe: Arc<dyn ExistenceProbe>,
    extension: String,
}

impl DescriptorResolver {
    /// Create resolver over `descriptor`'s declared resources
    #[must_use]
    pub fn new(descriptor: Arc<LaunchDescriptor>, probe: Arc<dyn ExistenceProbe>) -> Self {
        Self {
            descriptor,
            probe,
            extension: DEFAULT_CODE_UNIT_EXTENSION.to_string(),
        }
    }

    /// Use a different code-unit file extension
    #[inline]
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Descriptor this resolver reads from
    #[inline]
    #[must_use]
    pub fn descriptor(&self) -> &Arc<LaunchDescriptor> {
        &self.descriptor
    }
}

impl std::fmt::Debug for DescriptorResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DescriptorResolver")
            .field("descriptor", &self.descriptor.id())
            .field("extension", &self.extension)
            .finish_non_exhaustive()
    }
}

impl CodeUnitResolver for DescriptorResolver {
    fn resolve_code_unit(&self, name: &str) -> ResolveResult<Location> {
        let entry = code_unit_entry(name, &self.extension);
        for resource in self.descriptor.resources() {
            let Ok(candidate) = resource.entry(&entry) else {
                break;
            };
            if let Some(found) = self.probe.probe(&candidate) {
                tracing::debug!("descriptor resources resolved code unit {} at {}", name, found);
                return Ok(found);
            }
        }
        Err(ResolveError::not_found(name))
    }
}

/// Entry path of the code unit `name`
///
/// Dotted names map to path segments with `extension` appended:
/// `pkg.Main` → `pkg/Main.class`. Names already ending in `.<extension>` are
/// treated as entry paths and returned unchanged.
#[must_use]
pub fn code_unit_entry(name: &str, extension: &str) -> String {
    if extension.is_empty() {
        return name.replace('.', "/");
    }
    let suffix = format!(".{extension}");
    if name.ends_with(&suffix) {
        return name.to_string();
    }
    format!("{}{suffix}", name.replace('.', "/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct ListProbe {
        existing: Vec<Location>,
        probed: Mutex<Vec<Location>>,
    }

    impl ExistenceProbe for ListProbe {
        fn probe(&self, candidate: &Location) -> Option<Location> {
            self.probed.lock().push(candidate.clone());
            self.existing.iter().find(|l| *l == candidate).cloned()
        }
    }

    fn descriptor() -> Arc<LaunchDescriptor> {
        Arc::new(
            LaunchDescriptor::builder(Location::parse("http://example.org/netx/").unwrap())
                .resources(["core.jar", "extra.jar"])
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn code_unit_entry_mapping() {
        assert_eq!(code_unit_entry("pkg.Main", "class"), "pkg/Main.class");
        assert_eq!(code_unit_entry("foo", "class"), "foo.class");
        assert_eq!(code_unit_entry("pkg/Main.class", "class"), "pkg/Main.class");
        assert_eq!(code_unit_entry("a.b.c", ""), "a/b/c");
    }

    #[test]
    fn terminus_never_resolves() {
        let err = Terminus.resolve_code_unit("pkg.Main").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn descriptor_resolver_probes_resources_in_order() {
        let hit = Location::parse("jar:http://example.org/netx/extra.jar!/pkg/Main.class").unwrap();
        let probe = Arc::new(ListProbe {
            existing: vec![hit.clone()],
            ..ListProbe::default()
        });
        let resolver = DescriptorResolver::new(descriptor(), probe.clone());

        assert_eq!(resolver.resolve_code_unit("pkg.Main").unwrap(), hit);
        let probed: Vec<String> = probe.probed.lock().iter().map(ToString::to_string).collect();
        assert_eq!(
            probed,
            vec![
                "jar:http://example.org/netx/core.jar!/pkg/Main.class",
                "jar:http://example.org/netx/extra.jar!/pkg/Main.class",
            ]
        );
    }

    #[test]
    fn descriptor_resolver_reports_not_found() {
        let resolver = DescriptorResolver::new(descriptor(), Arc::new(ListProbe::default()))
            .with_extension("bin");
        assert!(resolver.resolve_code_unit("pkg.Missing").unwrap_err().is_not_found());
    }
}
