//! The `Sim` struct and its tick loop.

use ep_agent::{AgentRngs, Population, StatusTally};
use ep_core::{AgentId, SimClock, Tick};
use ep_disease::{AgeStructuredTransmission, EpidemicEngine, StatusDelta, TransmissionModel};

use crate::{SimConfig, SimObserver, SimResult};

/// The main simulation runner.
///
/// `Sim<T>` owns the population, its per-agent RNGs and the status tally,
/// and calls [`EpidemicEngine::step`] once per tick:
///
/// 1. advance the clock (the first step evaluates tick 1; seeding is tick 0);
/// 2. `on_tick_start`;
/// 3. engine step (infection phase, then resolution phase);
/// 4. `on_tick_end` with the updated tally and the step's delta;
/// 5. `on_snapshot` on every `output_interval_ticks`-th tick.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<T: TransmissionModel = AgeStructuredTransmission> {
    /// Global configuration (total ticks, seed, snapshot cadence, …).
    pub config: SimConfig,

    /// Simulation clock.  `current_tick` is the last tick evaluated.
    pub clock: SimClock,

    /// Agent state and contact graph.
    pub population: Population,

    /// Per-agent deterministic RNGs, separated for the split-borrow pattern.
    pub rngs: AgentRngs,

    /// Running S/I/R/D counts, updated on every transition.
    pub tally: StatusTally,

    pub engine: EpidemicEngine<T>,

    /// Agents infected at tick 0, ascending for random seeding, in the
    /// given order for explicit seeding.
    pub seeded: Vec<AgentId>,
}

impl<T: TransmissionModel> Sim<T> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Advance the clock and run one engine step.
    ///
    /// No observer hooks are called; use [`run`][Self::run] or
    /// [`run_ticks`][Self::run_ticks] for that.
    pub fn step(&mut self) -> SimResult<StatusDelta> {
        let now = self.clock.advance();
        let delta = self.engine.step(&mut self.population, &mut self.rngs, &mut self.tally, now)?;
        Ok(delta)
    }

    /// Run the simulation from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let start = self.clock.current_tick;
        let end = self.config.end_tick();
        log::info!(
            "run start: {} agents, {start} → {end}, seed {}, {}",
            self.population.count,
            self.config.seed,
            self.tally
        );

        observer.on_sim_start(start, &self.tally, &self.population);
        if self.config.is_snapshot_tick(start) {
            observer.on_snapshot(start, &self.population);
        }
        while self.clock.current_tick < end {
            self.tick(observer)?;
        }

        let final_tick = self.clock.current_tick;
        observer.on_sim_end(final_tick, &self.tally);
        log::info!("run end at {}: {}", self.clock, self.tally);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.tick(observer)?;
        }
        Ok(())
    }

    /// `true` once nobody is infected; further steps cannot change state.
    pub fn is_extinct(&self) -> bool {
        self.tally.infected() == 0
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn tick<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<Tick> {
        let now = self.clock.current_tick + 1;
        observer.on_tick_start(now);
        let delta = self.step()?;
        observer.on_tick_end(now, &self.tally, &delta);
        if self.config.is_snapshot_tick(now) {
            observer.on_snapshot(now, &self.population);
        }
        Ok(now)
    }
}
