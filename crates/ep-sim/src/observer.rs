//! Simulation observer trait for progress reporting and data collection.

use ep_agent::{Population, StatusTally};
use ep_core::Tick;
use ep_disease::StatusDelta;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: progress printer
///
/// ```rust
/// use ep_agent::StatusTally;
/// use ep_core::Tick;
/// use ep_disease::StatusDelta;
/// use ep_sim::SimObserver;
///
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, tally: &StatusTally, _delta: &StatusDelta) {
///         if tick.0 % self.interval == 0 {
///             println!("{tick}: {tally}");
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called once before the first step of [`Sim::run`][crate::Sim::run]
    /// with the seeded state.
    fn on_sim_start(&mut self, _tick: Tick, _tally: &StatusTally, _population: &Population) {}

    /// Called at the very start of each tick, before the engine runs.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after the engine step with the updated tally and the step's
    /// transitions.
    fn on_tick_end(&mut self, _tick: Tick, _tally: &StatusTally, _delta: &StatusDelta) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks` ticks).
    ///
    /// Provides read-only access to the full population so that output
    /// writers can record per-agent state without the sim needing to know
    /// about any specific output format.
    fn on_snapshot(&mut self, _tick: Tick, _population: &Population) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick, _tally: &StatusTally) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

// ── StatusHistory ─────────────────────────────────────────────────────────────

/// One row of the epidemic curve.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HistoryPoint {
    pub tick:           Tick,
    pub tally:          StatusTally,
    pub new_infections: usize,
}

/// Keeps the S/I/R/D series of a run in memory, one point per tick
/// (including the seeded state at tick 0 when driven by `run`).
#[derive(Clone, Debug, Default)]
pub struct StatusHistory {
    pub points: Vec<HistoryPoint>,
}

impl StatusHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&HistoryPoint> {
        self.points.last()
    }

    /// Tick and size of the largest simultaneous infected count; the
    /// earliest tick wins ties.
    pub fn peak_infected(&self) -> Option<(Tick, usize)> {
        self.points
            .iter()
            .map(|p| (p.tick, p.tally.infected()))
            .fold(None, |best, cur| match best {
                Some((_, n)) if n >= cur.1 => best,
                _ => Some(cur),
            })
    }

    /// Total infections recorded after tick 0.
    pub fn cumulative_infections(&self) -> usize {
        self.points.iter().map(|p| p.new_infections).sum()
    }
}

impl SimObserver for StatusHistory {
    fn on_sim_start(&mut self, tick: Tick, tally: &StatusTally, _population: &Population) {
        self.points.push(HistoryPoint { tick, tally: *tally, new_infections: 0 });
    }

    fn on_tick_end(&mut self, tick: Tick, tally: &StatusTally, delta: &StatusDelta) {
        self.points.push(HistoryPoint {
            tick,
            tally: *tally,
            new_infections: delta.newly_infected.len(),
        });
    }
}
