//! # vui-source CLI Entry Point
//!
//! Command-line access to the component catalog of a VUI showcase project.
//!
//! ## Usage
//!
//! ```bash
//! # Print the source of a component
//! vui-source source "Skeleton"
//!
//! # Extracted props, as a table or JSON
//! vui-source props "Blur Text" --json
//!
//! # Default props and a usage snippet
//! vui-source defaults "Skeleton"
//! vui-source usage "Skeleton"
//!
//! # Registry entries
//! vui-source list
//!
//! # Precompile the source map for production builds
//! vui-source --root ./site build-map
//!
//! # Report entries that only resolve to the placeholder
//! vui-source check
//! ```
//!
//! ## Architecture
//!
//! 1. **Config**: `--config`, `<root>/vui-source.json` or the user config file,
//!    then `VUI_SOURCE_ENV` / `NODE_ENV`, then `--production`
//! 2. **Resolver**: disk-backed [`SourceResolver`] over the project root
//! 3. **Catalog**: props extraction and usage snippets on top of the resolver
//!
//! Logs go to stderr; stdout carries only command output.

use vui_source::config::{Config, ExecutionMode};
use vui_source::logging::{self, LoggingConfig};
use vui_source::source::resolver::placeholder_source;
use vui_source::source::source_map::{self, SourceMapProvider};
use vui_source::source::{DiskFs, JsonSourceMapFile, RegistryEntry, SourceResolver, StaticSourceMap};
use vui_source::Catalog;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// vui-source - Resolve showcase component sources and extract their props
#[derive(Parser, Debug)]
#[command(name = "vui-source")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Resolve showcase component sources and extract their props", long_about = None)]
struct Args {
    /// Project root containing the registry and component directories
    #[arg(short, long, value_name = "DIR", global = true)]
    root: Option<PathBuf>,

    /// Config file to use instead of the project or user config
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Only use the precompiled source map
    #[arg(long, global = true)]
    production: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the source text of a component
    Source { name: String },

    /// Print the extracted props of a component
    Props {
        name: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the literal default props of a component as JSON
    Defaults { name: String },

    /// Print a usage snippet for a component
    Usage { name: String },

    /// List the registry entries
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Generate the precompiled source map
    BuildMap {
        /// Output file (defaults to the configured source map path)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Resolve every registry entry and report placeholders
    Check,
}

/// Everything a command needs, built once per run.
struct Session {
    config: Config,
    root: PathBuf,
    catalog: Catalog,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_logging(logging_config(args.log_level.as_deref())?);

    let mut stdout = io::stdout();
    run_application(args, &mut stdout).await
}

/// `--log-level` wins over the environment; an unknown level is an error.
fn logging_config(log_level: Option<&str>) -> Result<LoggingConfig> {
    match log_level {
        Some(raw) => {
            let level = logging::parse_level(raw)
                .with_context(|| format!("Invalid log level: {}", raw))?;
            Ok(LoggingConfig::with_level(level))
        }
        None => Ok(LoggingConfig::default()),
    }
}

async fn run_application<W: Write>(args: Args, out: &mut W) -> Result<()> {
    let session = open_session(&args)?;

    match args.command {
        Command::Source { name } => {
            writeln!(out, "{}", session.catalog.source(&name))?;
        }
        Command::Props { name, json } => {
            let info = session.catalog.props_info(&name);
            if json {
                let text = serde_json::to_string_pretty(&info).context("Failed to serialize props")?;
                writeln!(out, "{}", text)?;
            } else {
                write_props_table(out, &name, info.as_ref())?;
            }
        }
        Command::Defaults { name } => {
            let defaults = session.catalog.default_props(&name);
            let text =
                serde_json::to_string_pretty(&defaults).context("Failed to serialize defaults")?;
            writeln!(out, "{}", text)?;
        }
        Command::Usage { name } => {
            writeln!(out, "{}", session.catalog.usage_example(&name))?;
        }
        Command::List { json } => {
            let entries = session.catalog.resolver().registry_entries();
            if json {
                let text =
                    serde_json::to_string_pretty(&entries).context("Failed to serialize entries")?;
                writeln!(out, "{}", text)?;
            } else {
                write_entry_table(out, &entries)?;
            }
        }
        Command::BuildMap { output } => {
            let resolver = session.catalog.resolver();
            let entries = resolver.registry_entries();
            let file = source_map::generate(
                resolver,
                &entries,
                &session.root,
                &session.config.search_dirs,
            );

            let path = output.unwrap_or_else(|| session.root.join(&session.config.source_map_path));
            file.save_to(&path)?;
            writeln!(
                out,
                "Wrote source map with {} component(s) to {}",
                file.components.len(),
                path.display()
            )?;
        }
        Command::Check => {
            let missing = check_entries(&session.catalog, out).await?;
            if missing > 0 {
                bail!("{} component(s) fell back to the placeholder", missing);
            }
        }
    }

    Ok(())
}

fn open_session(args: &Args) -> Result<Session> {
    let cwd = std::env::current_dir().context("Failed to get current working directory")?;

    let base = match &args.root {
        Some(path) => path
            .canonicalize()
            .with_context(|| format!("Failed to access directory: {}", path.display()))?,
        None => cwd.clone(),
    };

    let mut config = Config::load(args.config.as_deref(), &base)?;
    config.apply_env(|var| std::env::var(var).ok());
    if args.production {
        config.mode = ExecutionMode::Production;
    }

    let root = if args.root.is_some() {
        base
    } else {
        config.resolve_root(&cwd)
    };
    if !root.is_dir() {
        bail!("Project root is not a directory: {}", root.display());
    }
    debug!(root = %root.display(), mode = ?config.mode, "Opened project");

    let resolver = SourceResolver::new(
        DiskFs::new(&root),
        source_map_provider(&root.join(&config.source_map_path)),
        config.to_resolver_options(),
    );
    let catalog =
        Catalog::new(Arc::new(resolver)).with_import_prefix(config.usage_import_prefix.clone());

    Ok(Session {
        config,
        root,
        catalog,
    })
}

/// The generated data file if present, otherwise an empty map.
fn source_map_provider(path: &Path) -> Box<dyn SourceMapProvider> {
    if path.is_file() {
        Box::new(JsonSourceMapFile::new(path))
    } else {
        info!(path = %path.display(), "No precompiled source map, starting empty");
        Box::new(StaticSourceMap::default())
    }
}

/// Resolve every registry entry on the blocking pool and print one line per
/// entry. Returns how many resolved to the placeholder.
async fn check_entries<W: Write>(catalog: &Catalog, out: &mut W) -> Result<usize> {
    let resolver = Arc::clone(catalog.resolver());
    let entries = resolver.registry_entries();

    let handles: Vec<_> = entries
        .into_iter()
        .map(|entry| {
            let resolver = Arc::clone(&resolver);
            tokio::task::spawn_blocking(move || {
                let source = resolver.resolve(&entry.name);
                let found = source != placeholder_source(&entry.name);
                (entry, found)
            })
        })
        .collect();

    let mut missing = 0;
    let total = handles.len();
    for handle in handles {
        let (entry, found) = handle.await.context("Resolver task panicked")?;
        if found {
            writeln!(out, "ok       {} / {}", entry.category, entry.name)?;
        } else {
            missing += 1;
            writeln!(out, "missing  {} / {}", entry.category, entry.name)?;
        }
    }
    writeln!(out, "{} of {} components resolved", total - missing, total)?;

    Ok(missing)
}

fn write_props_table<W: Write>(
    out: &mut W,
    name: &str,
    info: Option<&vui_source::props::ComponentPropsInfo>,
) -> Result<()> {
    let Some(info) = info else {
        writeln!(out, "No props found for {}", name)?;
        return Ok(());
    };

    writeln!(out, "{}", info.component_name)?;
    if let Some(description) = &info.description {
        writeln!(out, "  {}", description)?;
    }
    for prop in &info.props {
        let marker = if prop.optional { "?" } else { "" };
        let default = prop
            .default_value
            .as_ref()
            .map(|v| format!(" = {}", v))
            .unwrap_or_default();
        writeln!(out, "  {}{}: {}{}", prop.name, marker, prop.type_name, default)?;
        if let Some(description) = &prop.description {
            writeln!(out, "      {}", description)?;
        }
    }

    Ok(())
}

fn write_entry_table<W: Write>(out: &mut W, entries: &[RegistryEntry]) -> Result<()> {
    let mut by_category: BTreeMap<&str, Vec<&RegistryEntry>> = BTreeMap::new();
    for entry in entries {
        by_category.entry(&entry.category).or_default().push(entry);
    }

    for (category, entries) in by_category {
        writeln!(out, "{}", category)?;
        for entry in entries {
            let route = entry.route.as_deref().unwrap_or("-");
            writeln!(out, "  {:<24} {}", entry.name, route)?;
        }
    }

    Ok(())
}
