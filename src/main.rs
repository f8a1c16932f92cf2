//! `linkplan` plans and inspects physical links between fabric devices.
//!
//! **Usage:**
//! ```text
//! linkplan plan <project> [--topology mesh|ring] [--seed N] [--out FILE]
//! linkplan fill <project> [--style mesh|ring] [--seed N] [--out FILE]
//! linkplan export <project> [--format text|csv] [--out FILE]
//! linkplan summary <project>
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use linkplan::core::planning::config::ENV_LINKPLAN_SEED;
use linkplan::core::project::{self, ExportFormat, TopologySummary};
use linkplan::{ConnectionLedger, PlannerConfig, Topology};
use log::{info, warn};

/// Plan inter-device links for a video fabric
#[derive(Parser)]
#[command(name = "linkplan", version, about = "Plan mesh and ring links between fabric devices")]
struct Args {
    /// Log every port operation
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Clear all connections and plan a fresh topology
    Plan {
        /// Project file to read
        project: PathBuf,
        #[arg(long, value_enum, default_value_t = Shape::Mesh)]
        topology: Shape,
        /// Seed for reproducible plans
        #[arg(long, env = ENV_LINKPLAN_SEED)]
        seed: Option<u64>,
        /// Write the updated project here
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Add links on top of the existing connections
    Fill {
        project: PathBuf,
        #[arg(long, value_enum, default_value_t = Shape::Mesh)]
        style: Shape,
        #[arg(long, env = ENV_LINKPLAN_SEED)]
        seed: Option<u64>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the connection list
    Export {
        project: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print per-device usage and per-pair link counts
    Summary { project: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum Shape {
    Mesh,
    Ring,
}

impl From<Shape> for Topology {
    fn from(shape: Shape) -> Self {
        match shape {
            Shape::Mesh => Topology::Mesh,
            Shape::Ring => Topology::Ring,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Csv,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => ExportFormat::Text,
            Format::Csv => ExportFormat::Csv,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    match args.command {
        Command::Plan {
            project,
            topology,
            seed,
            out,
        } => {
            let mut ledger = open(&project)?;
            let config = planner_config(topology.into(), seed);
            let mut rng = config.rng();
            if let Some(warning) = ledger.plan(config.topology, &mut rng)? {
                warn!("{} plan incomplete: {}", config.topology, warning);
            }
            print_connections(&ledger)?;
            persist(&ledger, out.as_deref())?;
        }
        Command::Fill {
            project,
            style,
            seed,
            out,
        } => {
            let mut ledger = open(&project)?;
            let config = planner_config(style.into(), seed);
            let mut rng = config.rng();
            let added = ledger.fill(config.topology, &mut rng)?;
            info!("Fill added {} link(s)", added.len());
            print_connections(&ledger)?;
            persist(&ledger, out.as_deref())?;
        }
        Command::Export { project, format, out } => {
            let ledger = open(&project)?;
            match out {
                Some(path) => {
                    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
                    let mut writer = BufWriter::new(file);
                    project::write_connections(&ledger, format.into(), &mut writer)?;
                    writer.flush()?;
                    info!("Connections written to {}", path.display());
                }
                None => project::write_connections(&ledger, format.into(), &mut io::stdout().lock())?,
            }
        }
        Command::Summary { project } => {
            let ledger = open(&project)?;
            print!("{}", TopologySummary::from_ledger(&ledger));
            let totals = ledger.port_totals();
            println!("Totals: MPO {} / LC {} / SFP {}", totals.mpo, totals.lc, totals.sfp);
        }
    }
    Ok(())
}

fn planner_config(topology: Topology, seed: Option<u64>) -> PlannerConfig {
    let config = PlannerConfig::new().with_topology(topology);
    match seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    }
}

fn open(path: &Path) -> Result<ConnectionLedger> {
    let (ledger, report) = project::load(path).with_context(|| format!("loading {}", path.display()))?;
    for skipped in &report.skipped {
        warn!("Stored connection dropped: {}", skipped);
    }
    Ok(ledger)
}

fn persist(ledger: &ConnectionLedger, out: Option<&Path>) -> Result<()> {
    if let Some(path) = out {
        project::save(ledger, path).with_context(|| format!("saving {}", path.display()))?;
    }
    Ok(())
}

fn print_connections(ledger: &ConnectionLedger) -> Result<()> {
    project::write_connections(ledger, ExportFormat::Text, &mut io::stdout().lock())?;
    Ok(())
}
