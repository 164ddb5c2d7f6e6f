//! epi-small: command-line driver for the rust_epi simulator.
//!
//! Builds a clustered (or small-world) population, seeds a handful of
//! infections, runs the epidemic for a fixed number of days and writes the
//! status history and periodic agent snapshots as CSV.
//!
//! ```text
//! epi-small -n 5000 --cluster-size 25 -t 120 -i 10 -v
//! epi-small --config run.json --recovery immunity --no-output
//! ```

mod config;

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use memory_stats::memory_stats;

use ep_agent::{HealthStatus, Population, StatusTally};
use ep_core::{SimRng, Tick};
use ep_disease::{EpidemicEngine, StatusDelta};
use ep_graph::{ContactGraphBuilder, small_world};
use ep_output::{CsvWriter, SimOutputObserver};
use ep_sim::{SimBuilder, SimObserver, StatusHistory};

use config::{Args, RunConfig, Topology};

/// Offset for the RNG stream that builds the contact graph.
const GRAPH_STREAM: u64 = 0;

/// Print a table row every this many days.
const TABLE_EVERY: u64 = 10;

// ── Memory helper ─────────────────────────────────────────────────────────────

fn mem_mb() -> f64 {
    memory_stats()
        .map(|s| s.physical_mem as f64 / (1024.0 * 1024.0))
        .unwrap_or(0.0)
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Keeps the in-memory history and forwards every hook to the CSV observer
/// when output is enabled.
struct Reporter {
    history: StatusHistory,
    output:  Option<SimOutputObserver<CsvWriter>>,
}

impl SimObserver for Reporter {
    fn on_sim_start(&mut self, tick: Tick, tally: &StatusTally, population: &Population) {
        self.history.on_sim_start(tick, tally, population);
        if let Some(out) = self.output.as_mut() {
            out.on_sim_start(tick, tally, population);
        }
    }

    fn on_tick_end(&mut self, tick: Tick, tally: &StatusTally, delta: &StatusDelta) {
        self.history.on_tick_end(tick, tally, delta);
        if let Some(out) = self.output.as_mut() {
            out.on_tick_end(tick, tally, delta);
        }
        if !delta.died.is_empty() {
            log::debug!("{tick}: {} died", delta.died.len());
        }
    }

    fn on_snapshot(&mut self, tick: Tick, population: &Population) {
        if let Some(out) = self.output.as_mut() {
            out.on_snapshot(tick, population);
        }
    }

    fn on_sim_end(&mut self, final_tick: Tick, tally: &StatusTally) {
        if let Some(out) = self.output.as_mut() {
            out.on_sim_end(final_tick, tally);
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn build_population(cfg: &RunConfig) -> Result<Population> {
    let mut root = SimRng::new(cfg.sim.seed);
    let mut rng = root.child(GRAPH_STREAM);
    let population = match cfg.topology {
        Topology::Clustered => ContactGraphBuilder::new(cfg.population, cfg.cluster_size)
            .config(cfg.graph.clone())
            .build(&mut rng)?,
        Topology::SmallWorld => small_world(cfg.population, cfg.k_nearest, cfg.rewire_p, &cfg.graph, &mut rng)?,
    };
    Ok(population)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let cfg = RunConfig::from_args(&args)?;

    println!("=== epi-small: agent-based epidemic ===");
    println!(
        "Agents: {}  |  Topology: {:?}  |  Days: {}  |  Seed: {}",
        cfg.population, cfg.topology, cfg.sim.total_ticks, cfg.sim.seed
    );
    println!(
        "Transmission: {:.3}  |  Mortality: {:.3}  |  Recovery: {:?}",
        cfg.disease.base_transmission, cfg.disease.mortality_rate, cfg.disease.recovery
    );
    println!();

    // 1. Contact graph.
    let t0 = Instant::now();
    let population = build_population(&cfg).context("building contact graph")?;
    let edges = population.edge_count();
    println!(
        "Graph: {} agents, {} edges (mean degree {:.2}) in {:.3} s",
        population.count,
        edges,
        2.0 * edges as f64 / population.count as f64,
        t0.elapsed().as_secs_f64()
    );

    // 2. Engine and sim.
    let engine = EpidemicEngine::new(cfg.disease.clone()).context("disease parameters")?;
    let mut sim = SimBuilder::new(cfg.sim.clone(), population, engine).build()?;
    println!("Seeded {} infections at day 0", sim.seeded.len());

    // 3. Output.
    let output = if args.no_output {
        None
    } else {
        let writer = CsvWriter::new(&args.output_dir)
            .with_context(|| format!("opening output in {}", args.output_dir.display()))?;
        Some(SimOutputObserver::new(writer))
    };
    let mut reporter = Reporter { history: StatusHistory::new(), output };

    // 4. Run.
    let t1 = Instant::now();
    sim.run(&mut reporter)?;
    let elapsed = t1.elapsed();

    if let Some(e) = reporter.output.as_mut().and_then(|o| o.take_error()) {
        eprintln!("output error: {e}");
    }

    // 5. Summary.
    println!("Simulation complete in {:.3} s  |  RSS {:.1} MB", elapsed.as_secs_f64(), mem_mb());
    if let Some(out) = &reporter.output {
        println!("  {}: {} status rows", args.output_dir.join("status_history.csv").display(), out.rows_written());
    }
    println!();

    let [sus, inf, rec, dead] = HealthStatus::ALL.map(HealthStatus::code);
    println!("{:>6} {sus:>9} {inf:>9} {rec:>9} {dead:>9} {:>9}", "Day", "New");
    println!("{}", "-".repeat(57));
    let history = &reporter.history;
    for (i, p) in history.points.iter().enumerate() {
        if p.tick.0 % TABLE_EVERY == 0 || i + 1 == history.len() {
            println!(
                "{:>6} {:>9} {:>9} {:>9} {:>9} {:>9}",
                p.tick.0,
                p.tally.susceptible(),
                p.tally.infected(),
                p.tally.recovered(),
                p.tally.dead(),
                p.new_infections
            );
        }
    }
    println!();

    if let Some((tick, peak)) = history.peak_infected() {
        println!("Peak infected: {peak} on day {}", tick.0);
    }
    let total = sim.tally.total();
    let ever = total - sim.tally.susceptible();
    println!(
        "Attack rate: {:.1} %  |  Deaths: {}",
        100.0 * ever as f64 / total as f64,
        sim.tally.dead()
    );
    if sim.is_extinct() {
        println!("Epidemic extinct by {}", sim.clock);
    }

    Ok(())
}
