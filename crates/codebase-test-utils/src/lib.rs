//! Testing utilities for the codebase resolver workspace
//!
//! Shared fixtures: an instrumented delegate, an in-memory probe, and launch
//! descriptors over a fixed example codebase.

#![allow(missing_docs)]

use codebase_resolver::{
    CodeUnitResolver, CodebaseResolver, DelegateError, ExistenceProbe, ResolveError, ResolveResult,
    ResolverConfig,
};
use codebase_types::{ExecutionMode, LaunchDescriptor, Location};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub const CODEBASE_URL: &str = "http://example.org/netx/";
pub const JAR_URL: &str = "http://example.org/netx/about.jar";

pub fn loc(s: &str) -> Location {
    Location::parse(s).unwrap()
}

/// `jar:` location of `entry` inside [`JAR_URL`]
pub fn jar_entry(entry: &str) -> Location {
    loc(JAR_URL).entry(entry).unwrap()
}

/// Location of `entry` under [`CODEBASE_URL`]
pub fn codebase_entry(entry: &str) -> Location {
    loc(CODEBASE_URL).entry(entry).unwrap()
}

/// Shared, ordered record of delegate calls and probes
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Delegate(String),
    Probe(Location),
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, call: Call) {
        self.0.lock().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().clone()
    }
}

#[derive(Debug)]
enum Behavior {
    Decline,
    Resolve(HashMap<String, Location>),
    Fail(String),
}

/// Delegate that records every name it is asked for
#[derive(Debug)]
pub struct RecordingDelegate {
    behavior: Behavior,
    calls: Mutex<Vec<String>>,
    log: Option<CallLog>,
}

impl RecordingDelegate {
    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
            log: None,
        }
    }

    /// Reports not-found for every name
    pub fn declining() -> Self {
        Self::with_behavior(Behavior::Decline)
    }

    /// Resolves the given names, declines the rest
    pub fn resolving<'a>(known: impl IntoIterator<Item = (&'a str, Location)>) -> Self {
        let known = known
            .into_iter()
            .map(|(name, location)| (name.to_string(), location))
            .collect();
        Self::with_behavior(Behavior::Resolve(known))
    }

    /// Fails hard for every name
    pub fn failing(message: &str) -> Self {
        Self::with_behavior(Behavior::Fail(message.to_string()))
    }

    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = Some(log);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl CodeUnitResolver for RecordingDelegate {
    fn resolve_code_unit(&self, name: &str) -> ResolveResult<Location> {
        self.calls.lock().push(name.to_string());
        if let Some(log) = &self.log {
            log.record(Call::Delegate(name.to_string()));
        }
        match &self.behavior {
            Behavior::Decline => Err(ResolveError::not_found(name)),
            Behavior::Resolve(known) => known
                .get(name)
                .cloned()
                .ok_or_else(|| ResolveError::not_found(name)),
            Behavior::Fail(message) => Err(DelegateError::new(name, message.clone()).into()),
        }
    }
}

/// In-memory probe over a fixed set of existing locations
#[derive(Debug, Default)]
pub struct StaticProbe {
    existing: HashSet<Location>,
    latency: Option<Duration>,
    counts: DashMap<Location, usize>,
    total: AtomicU64,
    log: Option<CallLog>,
}

impl StaticProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_existing(existing: impl IntoIterator<Item = Location>) -> Self {
        Self {
            existing: existing.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Sleep this long on every probe
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = Some(log);
        self
    }

    pub fn probes_of(&self, location: &Location) -> usize {
        self.counts.get(location).map_or(0, |count| *count)
    }

    pub fn total_probes(&self) -> u64 {
        self.total.load(Ordering::SeqCst)
    }
}

impl ExistenceProbe for StaticProbe {
    fn probe(&self, candidate: &Location) -> Option<Location> {
        self.total.fetch_add(1, Ordering::SeqCst);
        *self.counts.entry(candidate.clone()).or_insert(0) += 1;
        if let Some(log) = &self.log {
            log.record(Call::Probe(candidate.clone()));
        }
        if let Some(latency) = self.latency {
            thread::sleep(latency);
        }
        self.existing.get(candidate).cloned()
    }
}

/// Descriptor over [`CODEBASE_URL`] whose security context is bound to it
pub fn bound_descriptor() -> Arc<LaunchDescriptor> {
    Arc::new(LaunchDescriptor::builder(loc(CODEBASE_URL)).build().unwrap())
}

/// Descriptor over [`CODEBASE_URL`] with an unbound security context
pub fn unbound_descriptor() -> Arc<LaunchDescriptor> {
    Arc::new(
        LaunchDescriptor::builder(loc(CODEBASE_URL))
            .unbound_security()
            .build()
            .unwrap(),
    )
}

/// Configuration searching `[JAR_URL, CODEBASE_URL]`
pub fn jar_then_codebase(mode: ExecutionMode) -> ResolverConfig {
    ResolverConfig::new()
        .with_mode(mode)
        .with_locations([loc(JAR_URL), loc(CODEBASE_URL)])
}

pub fn setup_resolver(
    mode: ExecutionMode,
    delegate: Arc<dyn CodeUnitResolver>,
    probe: Arc<dyn ExistenceProbe>,
    descriptor: Option<Arc<LaunchDescriptor>>,
) -> CodebaseResolver {
    let resolver = CodebaseResolver::new(jar_then_codebase(mode), delegate, probe);
    match descriptor {
        Some(descriptor) => resolver.with_descriptor(descriptor),
        None => resolver,
    }
}
