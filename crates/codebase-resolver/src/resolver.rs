//! Codebase resolver
//!
//! Resolves code units and resources against an application's codebase:
//!
//! ```text
//! resolve_code_unit(name)
//!   delegate ──found──► location
//!      │ not found
//!      ▼
//!   security gate ──unbound/absent──► NotFound
//!      │ bound
//!      ▼
//!   configured locations, in order ──► first hit | NotFound
//!
//! resolve_resource(name)
//!   cache ──hit──► replay recorded outcome
//!      │ miss (computed once per name)
//!      ▼
//!   mode/descriptor gate ──hosted, no descriptor──► NullDescriptor
//!      │
//!      ▼
//!   declared + configured locations, in order ──► first hit | NotFound
//! ```

use crate::cache::{CacheStats, ResolutionCache};
use crate::config::ResolverConfig;
use crate::delegate::{code_unit_entry, CodeUnitResolver};
use crate::error::{ResolveError, ResolveResult};
use crate::gate::{self, ResourcePlan};
use crate::outcome::{Denial, Outcome};
use crate::probe::ExistenceProbe;
use codebase_types::{ExecutionMode, LaunchDescriptor, Location, SecurityAssociation};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Recorded result of enumerating every location holding a name
type Enumeration = Result<Arc<[Location]>, Denial>;

/// Resolver statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverStats {
    /// Single-resource lookup cache
    pub resources: CacheStats,
    /// Enumeration cache
    pub enumerations: CacheStats,
    /// Existence probes issued
    pub probes: u64,
}

/// Resolver for one launched application's codebase
///
/// Shared between the application's threads; every method takes `&self`.
/// Resource outcomes, including failures, are recorded once per name and
/// replayed for the rest of the resolver's life. Code-unit lookups are not
/// recorded.
pub struct CodebaseResolver {
    mode: ExecutionMode,
    code_unit_extension: String,
    locations: RwLock<Vec<Location>>,
    parent: Arc<dyn CodeUnitResolver>,
    descriptor: Option<Arc<LaunchDescriptor>>,
    probe: Arc<dyn ExistenceProbe>,
    resources: ResolutionCache<Outcome>,
    enumerations: ResolutionCache<Enumeration>,
    probes: AtomicU64,
}

impl CodebaseResolver {
    /// Create resolver without a launch descriptor
    ///
    /// # Arguments
    /// * `config` - Mode, codebase locations and code-unit naming
    /// * `parent` - Delegate asked first for every code unit
    /// * `probe` - Transport used to test candidate locations
    #[must_use]
    pub fn new(
        config: ResolverConfig,
        parent: Arc<dyn CodeUnitResolver>,
        probe: Arc<dyn ExistenceProbe>,
    ) -> Self {
        Self {
            mode: config.mode,
            code_unit_extension: config.code_unit_extension,
            locations: RwLock::new(config.codebase),
            parent,
            descriptor: None,
            probe,
            resources: ResolutionCache::new(),
            enumerations: ResolutionCache::new(),
            probes: AtomicU64::new(0),
        }
    }

    /// With the launch descriptor of the application
    #[inline]
    #[must_use]
    pub fn with_descriptor(mut self, descriptor: Arc<LaunchDescriptor>) -> Self {
        self.descriptor = Some(descriptor);
        self
    }

    /// Resolve a code unit
    ///
    /// The delegate is always asked first. Only when it reports not-found,
    /// and the descriptor's security context is bound to that descriptor, are
    /// the configured codebase locations searched in order.
    ///
    /// # Errors
    /// - [`ResolveError::NotFound`] if nothing supplies `name`, or the
    ///   security association does not permit local search
    /// - any other delegate failure, unchanged
    pub fn resolve_code_unit(&self, name: &str) -> ResolveResult<Location> {
        match self.parent.resolve_code_unit(name) {
            Ok(location) => {
                tracing::debug!("delegate resolved code unit {} at {}", name, location);
                return Ok(location);
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!("delegate declined code unit {}", name);
            }
            Err(e) => {
                tracing::warn!("delegate failed for code unit {}: {}", name, e);
                return Err(e);
            }
        }

        let association = SecurityAssociation::of(self.descriptor.as_deref());
        if !gate::permits_local_code_units(&association) {
            tracing::debug!(
                "security association {} forbids local lookup of code unit {}",
                association.label(),
                name
            );
            return Err(ResolveError::not_found(name));
        }

        let entry = code_unit_entry(name, &self.code_unit_extension);
        let locations = self.locations();
        self.probe_first(&locations, &entry)
            .ok_or_else(|| ResolveError::not_found(name))
    }

    /// Resolve a resource
    ///
    /// The first lookup of a name decides its outcome; later lookups, from
    /// any thread, replay it without probing.
    ///
    /// # Errors
    /// - [`ResolveError::NullDescriptor`] in hosted mode without a descriptor
    /// - [`ResolveError::NotFound`] if no applicable location holds `name`
    pub fn resolve_resource(&self, name: &str) -> ResolveResult<Location> {
        self.resources
            .get_or_resolve(name, || self.search_resource(name))
            .into_result(name)
    }

    /// Every applicable location holding a resource, in search order
    ///
    /// Recorded once per name like [`resolve_resource`](Self::resolve_resource).
    /// An empty list is a result, not an error.
    ///
    /// # Errors
    /// [`ResolveError::NullDescriptor`] in hosted mode without a descriptor
    pub fn resolve_resources(&self, name: &str) -> ResolveResult<Vec<Location>> {
        let enumeration = self.enumerations.get_or_resolve(name, || {
            match self.plan_resources() {
                ResourcePlan::Deny(denial) => Err(denial),
                ResourcePlan::Search(locations) => {
                    let found = self.probe_all(&locations, name);
                    tracing::debug!(
                        "enumerated {} locations for resource {}",
                        found.len(),
                        name
                    );
                    Ok(found.into())
                }
            }
        });
        match enumeration {
            Ok(found) => Ok(found.to_vec()),
            Err(denial) => Err(denial.into_error(name)),
        }
    }

    /// Append a codebase location
    ///
    /// Applies to names looked up afterwards; recorded outcomes are kept.
    /// Returns `false` if the location was already configured.
    pub fn add_location(&self, location: Location) -> bool {
        let mut locations = self.locations.write();
        if locations.contains(&location) {
            return false;
        }
        tracing::debug!("adding codebase location {}", location);
        locations.push(location);
        true
    }

    /// Snapshot of the configured codebase locations
    #[must_use]
    pub fn locations(&self) -> Vec<Location> {
        self.locations.read().clone()
    }

    /// Execution mode
    #[inline]
    #[must_use]
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Launch descriptor, if any
    #[inline]
    #[must_use]
    pub fn descriptor(&self) -> Option<&Arc<LaunchDescriptor>> {
        self.descriptor.as_ref()
    }

    /// Security association seen by this resolver
    #[must_use]
    pub fn security_association(&self) -> SecurityAssociation {
        SecurityAssociation::of(self.descriptor.as_deref())
    }

    /// Recorded outcome for a resource name, without resolving it
    #[must_use]
    pub fn cached_outcome(&self, name: &str) -> Option<Outcome> {
        self.resources.get(name)
    }

    /// Get resolver statistics
    #[must_use]
    pub fn stats(&self) -> ResolverStats {
        ResolverStats {
            resources: self.resources.stats(),
            enumerations: self.enumerations.stats(),
            probes: self.probes.load(Ordering::Relaxed),
        }
    }

    fn plan_resources(&self) -> ResourcePlan {
        let configured = self.locations.read();
        gate::plan_resource_search(self.descriptor.as_deref(), self.mode, &configured)
    }

    fn search_resource(&self, name: &str) -> Outcome {
        match self.plan_resources() {
            ResourcePlan::Deny(denial) => {
                tracing::debug!("resource {} denied: {}", name, denial);
                Outcome::Denied(denial)
            }
            ResourcePlan::Search(locations) => {
                let outcome = Outcome::from(self.probe_first(&locations, name));
                if !outcome.is_found() {
                    tracing::debug!(
                        "resource {} not found in {} locations",
                        name,
                        locations.len()
                    );
                }
                outcome
            }
        }
    }

    fn probe_first(&self, locations: &[Location], entry: &str) -> Option<Location> {
        for location in locations {
            let candidate = match location.entry(entry) {
                Ok(candidate) => candidate,
                Err(e) => {
                    tracing::debug!("cannot look up {}: {}", entry, e);
                    return None;
                }
            };
            if let Some(found) = self.probe_candidate(&candidate) {
                tracing::debug!("found {} at {}", entry, found);
                return Some(found);
            }
        }
        None
    }

    fn probe_all(&self, locations: &[Location], entry: &str) -> Vec<Location> {
        let mut found = Vec::new();
        for location in locations {
            let Ok(candidate) = location.entry(entry) else {
                break;
            };
            if let Some(hit) = self.probe_candidate(&candidate) {
                found.push(hit);
            }
        }
        found
    }

    fn probe_candidate(&self, candidate: &Location) -> Option<Location> {
        self.probes.fetch_add(1, Ordering::Relaxed);
        tracing::trace!("probing {}", candidate);
        self.probe.probe(candidate)
    }
}

impl CodeUnitResolver for CodebaseResolver {
    fn resolve_code_unit(&self, name: &str) -> ResolveResult<Location> {
        CodebaseResolver::resolve_code_unit(self, name)
    }
}

impl std::fmt::Debug for CodebaseResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodebaseResolver")
            .field("mode", &self.mode)
            .field("locations", &*self.locations.read())
            .field("descriptor", &self.descriptor.as_ref().map(|d| d.id()))
            .field("resources", &self.resources)
            .finish_non_exhaustive()
    }
}
