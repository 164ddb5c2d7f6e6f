//! Command-line flags and the optional JSON run file.
//!
//! Precedence: built-in defaults < run file (`--config`) < explicit flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use ep_disease::{DiseaseParams, RecoveryPolicy};
use ep_graph::GraphConfig;
use ep_sim::SimConfig;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Dense clusters joined by bridges and superspreaders.
    Clustered,
    /// Rewired ring lattice, one cluster.
    SmallWorld,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum RecoveryMode {
    /// Recovery time drawn once per agent.
    Fixed,
    /// Immunity drifts upward and recovery time follows it.
    Immunity,
}

#[derive(Parser, Debug)]
#[command(name = "epi-small", version, about = "Agent-based epidemic on a clustered contact graph")]
pub struct Args {
    /// Number of agents.
    #[arg(short = 'n', long)]
    pub population: Option<usize>,

    /// Agents per cluster (clustered topology).
    #[arg(long)]
    pub cluster_size: Option<usize>,

    /// Master random seed.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Number of simulated days.
    #[arg(short, long)]
    pub ticks: Option<u64>,

    /// Agents infected at day 0.
    #[arg(short, long)]
    pub initial_infected: Option<usize>,

    /// Base per-contact transmission probability.
    #[arg(long)]
    pub transmission: Option<f64>,

    /// Probability that a resolving infection is fatal.
    #[arg(long)]
    pub mortality: Option<f64>,

    #[arg(long, value_enum)]
    pub recovery: Option<RecoveryMode>,

    #[arg(long, value_enum)]
    pub topology: Option<Topology>,

    /// Lattice neighbours per agent (small-world topology).
    #[arg(long)]
    pub k_nearest: Option<usize>,

    /// Lattice edge rewiring probability (small-world topology).
    #[arg(long)]
    pub rewire_p: Option<f64>,

    /// Agent snapshot cadence in days; 0 disables snapshots.
    #[arg(long)]
    pub snapshot_every: Option<u64>,

    /// JSON run file; flags override its values.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for status_history.csv and agent_snapshots.csv.
    #[arg(short, long, default_value = "output/small")]
    pub output_dir: PathBuf,

    /// Skip writing CSV files.
    #[arg(long)]
    pub no_output: bool,

    /// -v for debug, -vv for trace.  RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Everything needed for one run.  Every field may be omitted from the
/// JSON file.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub population:   usize,
    pub cluster_size: usize,
    pub topology:     Topology,
    pub k_nearest:    usize,
    pub rewire_p:     f64,
    pub sim:          SimConfig,
    pub graph:        GraphConfig,
    pub disease:      DiseaseParams,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            population:   1_000,
            cluster_size: 20,
            topology:     Topology::Clustered,
            k_nearest:    10,
            rewire_p:     0.03,
            sim:          SimConfig::default(),
            graph:        GraphConfig::default(),
            disease:      DiseaseParams::default(),
        }
    }
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading run file {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing run file {}", path.display()))
    }

    /// Resolve defaults, the run file and flags into one configuration.
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut cfg = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(v) = args.population {
            cfg.population = v;
        }
        if let Some(v) = args.cluster_size {
            cfg.cluster_size = v;
        }
        if let Some(v) = args.seed {
            cfg.sim.seed = v;
        }
        if let Some(v) = args.ticks {
            cfg.sim.total_ticks = v;
        }
        if let Some(v) = args.initial_infected {
            cfg.sim.initial_infected = v;
        }
        if let Some(v) = args.snapshot_every {
            cfg.sim.output_interval_ticks = v;
        }
        if let Some(v) = args.transmission {
            cfg.disease.base_transmission = v;
        }
        if let Some(v) = args.mortality {
            cfg.disease.mortality_rate = v;
        }
        if let Some(mode) = args.recovery {
            cfg.disease.recovery = match mode {
                RecoveryMode::Fixed => RecoveryPolicy::Fixed,
                RecoveryMode::Immunity => RecoveryPolicy::immunity_driven(),
            };
        }
        if let Some(v) = args.topology {
            cfg.topology = v;
        }
        if let Some(v) = args.k_nearest {
            cfg.k_nearest = v;
        }
        if let Some(v) = args.rewire_p {
            cfg.rewire_p = v;
        }
        Ok(cfg)
    }
}
