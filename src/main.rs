use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use loadstone::config::LoadstoneConfig;
use loadstone::error::LoadstoneError;
use loadstone::pipeline;
use loadstone::store::{MemoryStore, Snapshot};
use loadstone::telemetry;

/// Load-order aware leveled-list attributor and partitioner
///
/// Loadstone works over a snapshot of a plugin load order: for each record
/// it sees every plugin's version, in load order, with the last version
/// winning. It answers "did this plugin really change this list, or just
/// re-save it?" and splits leveled lists that are shared between male and
/// female NPC equipment so one side can be retargeted without touching the
/// other.
///
/// QUICK START:
///
///   loadstone run --snapshot plugins.json
///
///   # Attribution only (no patch output):
///   loadstone attribute --snapshot plugins.json --config loadstone.toml
#[derive(Parser)]
#[command(name = "loadstone")]
#[command(version, about)]
#[command(propagate_version = true)]
#[command(
    after_help = "See 'loadstone <command> --help' for more information on a specific command."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: attribution, classification, partition
    ///
    /// Prints the report to stdout. With --out, writes the patch layer
    /// (clones and rewritten overrides) as a JSON record set.
    Run {
        /// Path to the load-order snapshot (JSON)
        #[arg(long)]
        snapshot: PathBuf,

        /// Path to the configuration file (missing file → defaults)
        #[arg(long, default_value = "loadstone.toml")]
        config: PathBuf,

        /// Write the resulting patch records to this file
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Attribute tracked plugins' leveled-list changes (read-only)
    ///
    /// Reports, per tracked plugin, which lists it introduced, which it
    /// really modified, and which it merely re-saved. Never writes a patch.
    Attribute {
        /// Path to the load-order snapshot (JSON)
        #[arg(long)]
        snapshot: PathBuf,

        /// Path to the configuration file (missing file → defaults)
        #[arg(long, default_value = "loadstone.toml")]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    telemetry::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            snapshot,
            config,
            out,
        } => run(&snapshot, &config, out.as_deref()),
        Commands::Attribute { snapshot, config } => attribute(&snapshot, &config),
    }
}

fn run(snapshot: &std::path::Path, config: &std::path::Path, out: Option<&std::path::Path>) -> Result<()> {
    let config = LoadstoneConfig::load(config).map_err(LoadstoneError::from)?;
    let snapshot = Snapshot::load(snapshot).map_err(LoadstoneError::from)?;
    let store = MemoryStore::from_snapshot(&snapshot);

    let outcome = pipeline::run(&store, &snapshot.load_order, &config);
    print!("{}", outcome.report);

    if let Some(path) = out {
        let records = outcome.patch.emit();
        let json = serde_json::to_string_pretty(&records)
            .map_err(|e| LoadstoneError::Io(std::io::Error::other(e)))?;
        std::fs::write(path, json).map_err(LoadstoneError::from)?;
    }
    Ok(())
}

fn attribute(snapshot: &std::path::Path, config: &std::path::Path) -> Result<()> {
    let config = LoadstoneConfig::load(config).map_err(LoadstoneError::from)?;
    let snapshot = Snapshot::load(snapshot).map_err(LoadstoneError::from)?;
    let store = MemoryStore::from_snapshot(&snapshot);

    let lines = pipeline::attribute_tracked(&store, &snapshot.load_order, &config);
    let report = pipeline::RunReport {
        attributed: lines,
        ..pipeline::RunReport::default()
    };
    print!("{report}");
    Ok(())
}
