//! Property tests for write-once outcome recording

use codebase_resolver::{Outcome, ResolutionCache, Terminus};
use codebase_test_utils::{bound_descriptor, codebase_entry, setup_resolver, StaticProbe};
use codebase_types::ExecutionMode;
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

fn resource_name() -> impl Strategy<Value = String> {
    "[a-z]{1,6}(/[a-z]{1,6}){0,2}\\.(txt|png|class)"
}

proptest! {
    #[test]
    fn first_insert_wins(name in resource_name(), first in "[a-z]{1,8}", second in "[a-z]{1,8}") {
        let cache: ResolutionCache = ResolutionCache::new();
        let first = Outcome::Found(codebase_entry(&first));
        let second = Outcome::Found(codebase_entry(&second));

        prop_assert!(cache.insert_once(&name, first.clone()));
        prop_assert!(!cache.insert_once(&name, second));
        prop_assert!(!cache.insert_once(&name, Outcome::NotFound));
        prop_assert_eq!(cache.get(&name), Some(first));
    }

    #[test]
    fn repeated_lookups_never_reprobe(
        existing in prop::collection::hash_set(resource_name(), 0..8),
        lookups in prop::collection::vec(resource_name(), 1..32),
    ) {
        let probe = Arc::new(StaticProbe::with_existing(
            existing.iter().map(|name| codebase_entry(name)),
        ));
        let resolver = setup_resolver(
            ExecutionMode::HostedApplication,
            Arc::new(Terminus),
            probe.clone(),
            Some(bound_descriptor()),
        );

        let mut first_results = HashMap::new();
        for name in &lookups {
            let result = resolver.resolve_resource(name).ok();
            let recorded = first_results
                .entry(name.clone())
                .or_insert_with(|| result.clone())
                .clone();
            prop_assert_eq!(&result, &recorded);
            prop_assert_eq!(result.is_some(), existing.contains(name));
        }

        let distinct: HashSet<&String> = lookups.iter().collect();
        let stats = resolver.stats();
        prop_assert_eq!(stats.resources.misses, distinct.len() as u64);
        prop_assert_eq!(stats.resources.hits, (lookups.len() - distinct.len()) as u64);
        prop_assert!(probe.total_probes() <= 2 * distinct.len() as u64);
    }
}
