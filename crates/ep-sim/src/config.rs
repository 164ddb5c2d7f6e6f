//! Run-level configuration.

use ep_core::Tick;

/// Length, seed and reporting cadence of one run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Number of engine steps (simulated days) in a full run.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Call `on_snapshot` every N ticks.  0 disables snapshots.
    pub output_interval_ticks: u64,

    /// How many random susceptible agents to infect at tick 0 when the
    /// builder is not given an explicit seed set.
    pub initial_infected: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            total_ticks:           100,
            seed:                  42,
            output_interval_ticks: 10,
            initial_infected:      8,
        }
    }
}

impl SimConfig {
    /// The tick at which the simulation ends (inclusive: the last step
    /// evaluates this tick).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// `true` if `tick` falls on the snapshot cadence.
    #[inline]
    pub fn is_snapshot_tick(&self, tick: Tick) -> bool {
        self.output_interval_ticks > 0 && tick.0.is_multiple_of(self.output_interval_ticks)
    }
}
