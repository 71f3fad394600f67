//! codebase-resolve - resolve code units and resources from the command line
//!
//! Builds a resolver over `file:` codebase locations and prints the location
//! of each name found. Exits with status 1 when a lookup fails.

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use codebase_resolver::{
    CodeUnitResolver, CodebaseResolver, DescriptorResolver, FileSystemProbe, ResolveError,
    ResolverConfig, Terminus,
};
use codebase_types::{ExecutionMode, LaunchDescriptor, Location, PermissionLevel};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("codebase-resolve")
        .version(codebase_resolver::VERSION)
        .about("Resolve code units and resources against a codebase")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML resolver configuration"),
        )
        .arg(
            Arg::new("codebase")
                .long("codebase")
                .global(true)
                .action(ArgAction::Append)
                .value_parser(value_parser!(Location))
                .help("Codebase location, searched in the order given (repeatable)"),
        )
        .arg(
            Arg::new("mode")
                .long("mode")
                .global(true)
                .value_parser(value_parser!(ExecutionMode))
                .help("Execution mode: hosted or embedded"),
        )
        .arg(
            Arg::new("descriptor-codebase")
                .long("descriptor-codebase")
                .global(true)
                .value_parser(value_parser!(Location))
                .help("Codebase of the launch descriptor; omit to run without one"),
        )
        .arg(
            Arg::new("descriptor-resource")
                .long("descriptor-resource")
                .global(true)
                .action(ArgAction::Append)
                .requires("descriptor-codebase")
                .help("Resource declared by the descriptor (repeatable)"),
        )
        .arg(
            Arg::new("security")
                .long("security")
                .global(true)
                .default_value("bound")
                .value_parser(["bound", "unbound"])
                .help("Whether the descriptor's security context is bound to it"),
        )
        .arg(
            Arg::new("permissions")
                .long("permissions")
                .global(true)
                .default_value("sandbox")
                .value_parser(value_parser!(PermissionLevel))
                .help("Permission level of the descriptor's security context"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .help("Log filter (trace, debug, info, warn, error); overrides RUST_LOG"),
        )
        .subcommand(
            Command::new("resource")
                .about("Resolve a single resource")
                .arg(Arg::new("name").required(true))
                .arg(
                    Arg::new("repeat")
                        .long("repeat")
                        .default_value("1")
                        .value_parser(value_parser!(u32).range(1..))
                        .help("Resolve the same name this many times and report timings"),
                ),
        )
        .subcommand(
            Command::new("resources")
                .about("List every location holding a resource")
                .arg(Arg::new("name").required(true)),
        )
        .subcommand(
            Command::new("code-unit")
                .about("Resolve a code unit by dotted name")
                .arg(Arg::new("name").required(true)),
        )
}

fn init_tracing(matches: &ArgMatches) {
    let filter = match matches.get_one::<String>("log-level") {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn load_config(matches: &ArgMatches) -> Result<ResolverConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ResolverConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ResolverConfig::new(),
    };

    if let Some(mode) = matches.get_one::<ExecutionMode>("mode") {
        config = config.with_mode(*mode);
    }
    if let Some(locations) = matches.get_many::<Location>("codebase") {
        config = config.with_locations(locations.cloned());
    }
    Ok(config)
}

fn load_descriptor(matches: &ArgMatches) -> Result<Option<Arc<LaunchDescriptor>>> {
    let Some(codebase) = matches.get_one::<Location>("descriptor-codebase") else {
        return Ok(None);
    };

    let mut builder = LaunchDescriptor::builder(codebase.clone());
    if let Some(resources) = matches.get_many::<String>("descriptor-resource") {
        builder = builder.resources(resources.cloned());
    }
    if let Some(permissions) = matches.get_one::<PermissionLevel>("permissions") {
        builder = builder.permissions(*permissions);
    }
    if matches.get_one::<String>("security").map(String::as_str) == Some("unbound") {
        builder = builder.unbound_security();
    }

    let descriptor = builder.build().context("invalid launch descriptor")?;
    Ok(Some(Arc::new(descriptor)))
}

fn build_resolver(matches: &ArgMatches) -> Result<CodebaseResolver> {
    let config = load_config(matches)?;
    let descriptor = load_descriptor(matches)?;
    let probe = Arc::new(FileSystemProbe::new());

    let parent: Arc<dyn CodeUnitResolver> = match &descriptor {
        Some(descriptor) => Arc::new(
            DescriptorResolver::new(Arc::clone(descriptor), probe.clone())
                .with_extension(config.code_unit_extension.clone()),
        ),
        None => Arc::new(Terminus),
    };

    let resolver = CodebaseResolver::new(config, parent, probe);
    Ok(match descriptor {
        Some(descriptor) => resolver.with_descriptor(descriptor),
        None => resolver,
    })
}

fn report(name: &str, result: Result<Location, ResolveError>) -> ExitCode {
    match result {
        Ok(location) => {
            println!("{location}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{name}: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(matches: &ArgMatches) -> Result<ExitCode> {
    let resolver = build_resolver(matches)?;
    tracing::info!(
        "resolver ready: mode {}, {} locations, security {}",
        resolver.mode(),
        resolver.locations().len(),
        resolver.security_association().label()
    );

    let code = match matches.subcommand() {
        Some(("resource", args)) => {
            let name = args
                .get_one::<String>("name")
                .context("missing resource name")?;
            let repeat = args.get_one::<u32>("repeat").copied().unwrap_or(1);

            let mut last = Err(ResolveError::not_found(name.as_str()));
            for attempt in 1..=repeat {
                let started = Instant::now();
                last = resolver.resolve_resource(name);
                if repeat > 1 {
                    eprintln!("lookup {attempt}: {:?}", started.elapsed());
                }
            }
            if repeat > 1 {
                let stats = resolver.stats();
                eprintln!(
                    "cache: {} hits, {} misses; probes: {}",
                    stats.resources.hits, stats.resources.misses, stats.probes
                );
            }
            report(name, last)
        }
        Some(("resources", args)) => {
            let name = args
                .get_one::<String>("name")
                .context("missing resource name")?;
            match resolver.resolve_resources(name) {
                Ok(found) if found.is_empty() => {
                    eprintln!("{name}: {}", ResolveError::not_found(name.as_str()));
                    ExitCode::FAILURE
                }
                Ok(found) => {
                    for location in found {
                        println!("{location}");
                    }
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("{name}: {e}");
                    ExitCode::FAILURE
                }
            }
        }
        Some(("code-unit", args)) => {
            let name = args
                .get_one::<String>("name")
                .context("missing code unit name")?;
            report(name, resolver.resolve_code_unit(name))
        }
        _ => anyhow::bail!("no subcommand given"),
    };
    Ok(code)
}

fn main() -> Result<ExitCode> {
    let matches = cli().get_matches();
    init_tracing(&matches);
    run(&matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn descriptor_flags_build_descriptor() {
        let matches = cli()
            .try_get_matches_from([
                "codebase-resolve",
                "--descriptor-codebase",
                "http://example.org/netx/",
                "--descriptor-resource",
                "about.jar",
                "--security",
                "unbound",
                "code-unit",
                "pkg.Main",
            ])
            .unwrap();

        let descriptor = load_descriptor(&matches).unwrap().unwrap();
        assert_eq!(descriptor.resources().len(), 1);
        assert!(!descriptor.security_association().is_bound());
    }

    #[test]
    fn flags_extend_config() {
        let matches = cli()
            .try_get_matches_from([
                "codebase-resolve",
                "--mode",
                "embedded",
                "--codebase",
                "file:///opt/app/",
                "resource",
                "about.html",
                "--repeat",
                "3",
            ])
            .unwrap();

        let config = load_config(&matches).unwrap();
        assert_eq!(config.mode, ExecutionMode::EmbeddedComponent);
        assert_eq!(config.codebase.len(), 1);
        assert!(load_descriptor(&matches).unwrap().is_none());
    }
}
