use anyhow::{Context as _, Result};
use cece::config::Config;
use cece::plugin::{Context, ExtensionKind, Manager, SharedLibraryLoader};
use cece::simulation::Simulation;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// cece-plugins - inspect the simulator's native plugins
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Additional plugin directory (may be repeated)
    #[arg(long = "dir", value_name = "PATH")]
    directories: Vec<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List loaded plugins and the extensions they register
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Import a plugin into a fresh simulation and report the result
    Check {
        /// Plugin name
        name: String,
    },
}

#[derive(Serialize)]
struct PluginListing<'a> {
    name: &'a str,
    imported: bool,
    extensions: BTreeMap<&'static str, Vec<&'a str>>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so listings on stdout stay machine readable
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set global default subscriber")?;

    let config = if let Some(config_path) = &args.config {
        Config::load_from_file(config_path)?
    } else {
        Config::load_default()?
    };

    let mut manager = Manager::new();
    manager
        .add_loader(Box::new(SharedLibraryLoader::new()))
        .context("Failed to add shared library loader")?;
    manager
        .add_directories(args.directories.iter().cloned())
        .context("Failed to load plugins")?;
    manager
        .add_directories(config.plugins.search_directories())
        .context("Failed to load plugins")?;

    match args.command {
        Command::List { json } => list(&manager, &config, json),
        Command::Check { name } => check(&manager, &config, &name),
    }
}

fn list(manager: &Manager, config: &Config, json: bool) -> Result<()> {
    let mut context = Context::new(manager);
    for name in &config.plugins.import {
        if let Err(e) = context.import_plugin(name) {
            warn!("Cannot import configured plugin: {}", e);
        }
    }

    let mut listings = Vec::new();
    for name in manager.names() {
        let record = manager.repository().get(name)?;
        let extensions = ExtensionKind::ALL
            .iter()
            .map(|&kind| (kind.as_str(), record.names(kind)))
            .filter(|(_, names)| !names.is_empty())
            .collect();

        listings.push(PluginListing {
            name,
            imported: context.is_imported(name),
            extensions,
        });
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&listings).context("Failed to serialize listing")?
        );
        return Ok(());
    }

    if listings.is_empty() {
        println!("No plugins loaded");
        for directory in manager.directories() {
            println!("  searched: {}", directory.display());
        }
        return Ok(());
    }

    for listing in &listings {
        let marker = if listing.imported { " (imported)" } else { "" };
        println!("{}{}", listing.name, marker);
        for (kind, names) in &listing.extensions {
            println!("  {}: {}", kind, names.join(", "));
        }
    }

    Ok(())
}

fn check(manager: &Manager, config: &Config, name: &str) -> Result<()> {
    let mut context = Context::new(manager);
    let mut simulation = Simulation::new("check");

    context
        .import_plugin_into(name, &mut simulation, config.plugins.config_for(name))
        .with_context(|| format!("Plugin '{name}' cannot be imported"))?;

    let record = manager.repository().get(name)?;
    println!("Plugin '{name}' imported");
    for kind in ExtensionKind::ALL {
        for extension in record.names(kind) {
            println!("  {kind} '{extension}'");
        }
    }
    for object_type in simulation.object_types() {
        println!("  object type '{}' (based on '{}')", object_type.name, object_type.base);
    }

    Ok(())
}
