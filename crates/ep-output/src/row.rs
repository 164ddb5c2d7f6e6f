//! Plain data row types written by output backends.

use ep_agent::{HealthStatus, Population, StatusTally};
use ep_core::{AgentId, Tick};

/// One point of the epidemic curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusHistoryRow {
    pub tick:           u64,
    pub susceptible:    u64,
    pub infected:       u64,
    pub recovered:      u64,
    pub dead:           u64,
    /// S → I transitions during this tick (0 for the seeded state).
    pub new_infections: u64,
}

impl StatusHistoryRow {
    pub fn new(tick: Tick, tally: &StatusTally, new_infections: usize) -> Self {
        Self {
            tick:           tick.0,
            susceptible:    tally.susceptible() as u64,
            infected:       tally.infected() as u64,
            recovered:      tally.recovered() as u64,
            dead:           tally.dead() as u64,
            new_infections: new_infections as u64,
        }
    }
}

/// The state of one agent at a snapshot tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshotRow {
    pub agent_id: u32,
    pub tick:     u64,
    pub cluster:  u32,
    /// Written as its lowercase name (`"susceptible"`, `"infected"`, …).
    pub status:   HealthStatus,
    pub immunity: f64,
    /// Current neighbour count; 0 for dead agents.
    pub degree:   u32,
}

impl AgentSnapshotRow {
    pub fn capture(population: &Population, agent: AgentId, tick: Tick) -> Self {
        let i = agent.index();
        Self {
            agent_id: agent.0,
            tick:     tick.0,
            cluster:  population.cluster[i].0,
            status:   population.status(agent),
            immunity: population.immunity[i],
            degree:   population.degree(agent) as u32,
        }
    }
}
