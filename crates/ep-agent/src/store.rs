//! Core agent storage: `Population` (SoA data) and `AgentRngs` (per-agent RNG).
//!
//! # Why two structs?
//!
//! The epidemic step needs `&mut Population` (status writes) and
//! `&mut AgentRng` for the transmitting agent at the same time.  Keeping the
//! RNGs in a separate `AgentRngs` struct lets both borrows coexist without
//! indexing gymnastics:
//!
//! ```ignore
//! let rng = rngs.get_mut(agent);
//! let contacts = rng.sample_distinct(&neighbours, k);
//! pop.transition(contact, HealthStatus::Infected, now, tally)?;
//! ```
//!
//! # Field access
//!
//! Immutable attributes and the engine-owned `immunity` / `recovery_time`
//! arrays are `pub` for direct indexed access.  `status`, `neighbours` and
//! `last_infected` are private: they are only changed through
//! [`Population::add_edge`], [`Population::isolate`] and
//! [`Population::transition`], which keep edge symmetry, the state machine
//! and the tally consistent.

use std::collections::BTreeSet;

use ep_core::{AgentId, AgentRng, ClusterId, EpiError, EpiResult, Tick};

use crate::{HealthStatus, StatusTally};

// ── AgentRngs ─────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG state, separated from [`Population`] so the
/// engine can hold `&mut Population` and one agent's `&mut AgentRng` at once.
pub struct AgentRngs {
    pub inner: Vec<AgentRng>,
}

impl AgentRngs {
    /// Allocate and seed `count` per-agent RNGs from `global_seed`.
    pub fn new(count: usize, global_seed: u64) -> Self {
        let inner = (0..count as u32)
            .map(|i| AgentRng::new(global_seed, AgentId(i)))
            .collect();
        Self { inner }
    }

    /// Mutable reference to one agent's RNG.
    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> &mut AgentRng {
        &mut self.inner[agent.index()]
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── AgentInit ─────────────────────────────────────────────────────────────────

/// Creation-time attributes of one agent.  Every new agent starts
/// `Susceptible` with no neighbours.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentInit {
    pub age:           u8,
    pub immunity:      f64,
    pub mobility:      f64,
    pub cluster:       ClusterId,
    pub recovery_time: u32,
}

// ── AgentView ─────────────────────────────────────────────────────────────────

/// Read-only view of one agent, assembled from the SoA arrays.
///
/// This is what rendering / inspection front-ends consume.
#[derive(Clone, Copy, Debug)]
pub struct AgentView<'a> {
    pub id:            AgentId,
    pub age:           u8,
    pub immunity:      f64,
    pub mobility:      f64,
    pub cluster:       ClusterId,
    pub status:        HealthStatus,
    pub neighbours:    &'a BTreeSet<AgentId>,
    pub last_infected: Option<Tick>,
    pub recovery_time: u32,
}

impl AgentView<'_> {
    /// Tick of infection onset as a signed integer; `-1` if never infected.
    pub fn last_infected_timestep(&self) -> i64 {
        self.last_infected.map_or(-1, |t| t.0 as i64)
    }
}

// ── Population ────────────────────────────────────────────────────────────────

/// Structure-of-Arrays storage for all agents.
///
/// Every `Vec` has exactly `count` elements and the `AgentId` value is the
/// index into all of them:
///
/// ```ignore
/// let age = pop.age[agent.index()];  // O(1), cache-friendly
/// ```
#[derive(Clone, Debug, Default)]
pub struct Population {
    /// Number of agents (live and dead).  Equals the length of every array.
    pub count: usize,

    /// Age in whole years, `0..=100`.  Immutable.
    pub age: Vec<u8>,

    /// Immunity in `[0, 1]`.  Drifts upward only under the immunity-driven
    /// recovery policy.
    pub immunity: Vec<f64>,

    /// Fraction of neighbours an infected agent contacts per tick.  Immutable.
    pub mobility: Vec<f64>,

    /// Cluster assigned by the graph builder.  Immutable.
    pub cluster: Vec<ClusterId>,

    /// Ticks from infection onset to resolution.
    pub recovery_time: Vec<u32>,

    status:        Vec<HealthStatus>,
    neighbours:    Vec<BTreeSet<AgentId>>,
    last_infected: Vec<Option<Tick>>,
}

impl Population {
    /// An empty population.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty population with room for `capacity` agents.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            count:         0,
            age:           Vec::with_capacity(capacity),
            immunity:      Vec::with_capacity(capacity),
            mobility:      Vec::with_capacity(capacity),
            cluster:       Vec::with_capacity(capacity),
            recovery_time: Vec::with_capacity(capacity),
            status:        Vec::with_capacity(capacity),
            neighbours:    Vec::with_capacity(capacity),
            last_infected: Vec::with_capacity(capacity),
        }
    }

    /// Append a new susceptible, unconnected agent and return its id.
    pub fn push_agent(&mut self, init: AgentInit) -> AgentId {
        let id = AgentId(self.count as u32);
        self.age.push(init.age.min(100));
        self.immunity.push(init.immunity.clamp(0.0, 1.0));
        self.mobility.push(init.mobility.clamp(0.0, 1.0));
        self.cluster.push(init.cluster);
        self.recovery_time.push(init.recovery_time);
        self.status.push(HealthStatus::Susceptible);
        self.neighbours.push(BTreeSet::new());
        self.last_infected.push(None);
        self.count += 1;
        id
    }

    /// `true` if there are no agents.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// `true` if `agent` indexes an existing arena slot.
    #[inline]
    pub fn contains(&self, agent: AgentId) -> bool {
        agent.index() < self.count
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    /// Read-only view of one agent, or `None` for an unknown id.
    pub fn agent(&self, agent: AgentId) -> Option<AgentView<'_>> {
        if !self.contains(agent) {
            return None;
        }
        let i = agent.index();
        Some(AgentView {
            id:            agent,
            age:           self.age[i],
            immunity:      self.immunity[i],
            mobility:      self.mobility[i],
            cluster:       self.cluster[i],
            status:        self.status[i],
            neighbours:    &self.neighbours[i],
            last_infected: self.last_infected[i],
            recovery_time: self.recovery_time[i],
        })
    }

    // ── Status ────────────────────────────────────────────────────────────

    #[inline]
    pub fn status(&self, agent: AgentId) -> HealthStatus {
        self.status[agent.index()]
    }

    /// Status of every agent, indexed by `AgentId`.
    pub fn statuses(&self) -> &[HealthStatus] {
        &self.status
    }

    #[inline]
    pub fn last_infected(&self, agent: AgentId) -> Option<Tick> {
        self.last_infected[agent.index()]
    }

    /// All agents currently in `status`, ascending by id.
    pub fn ids_with_status(&self, status: HealthStatus) -> Vec<AgentId> {
        self.agent_ids().filter(|&a| self.status(a) == status).collect()
    }

    /// Recount the tally from scratch.  The engine maintains the tally
    /// incrementally; this is the reference it is checked against.
    pub fn tally(&self) -> StatusTally {
        StatusTally::from_statuses(self.status.iter().copied())
    }

    /// Apply one state-machine transition and record it in `tally`.
    ///
    /// - `S → I` stamps `last_infected = now`.
    /// - `I → D` removes every contact edge of the agent.
    ///
    /// Any other pair (including anything out of `Recovered`/`Dead`) fails
    /// with `InvariantViolation` and leaves the agent unchanged.
    pub fn transition(
        &mut self,
        agent: AgentId,
        to:    HealthStatus,
        now:   Tick,
        tally: &mut StatusTally,
    ) -> EpiResult<()> {
        if !self.contains(agent) {
            return Err(EpiError::AgentNotFound(agent));
        }
        let from = self.status[agent.index()];
        if !from.can_transition_to(to) {
            return Err(EpiError::invariant(format!(
                "illegal transition {from} -> {to} for {agent}"
            )));
        }
        tally.record(from, to)?;
        self.status[agent.index()] = to;
        match to {
            HealthStatus::Infected => self.last_infected[agent.index()] = Some(now),
            HealthStatus::Dead => {
                self.isolate(agent);
            }
            _ => {}
        }
        Ok(())
    }

    // ── Contact graph ─────────────────────────────────────────────────────

    /// Neighbour set of `agent`, ascending by id.
    #[inline]
    pub fn neighbours(&self, agent: AgentId) -> &BTreeSet<AgentId> {
        &self.neighbours[agent.index()]
    }

    #[inline]
    pub fn degree(&self, agent: AgentId) -> usize {
        self.neighbours[agent.index()].len()
    }

    #[inline]
    pub fn has_edge(&self, a: AgentId, b: AgentId) -> bool {
        self.contains(a) && self.neighbours[a.index()].contains(&b)
    }

    /// Insert the undirected edge `a — b`.
    ///
    /// Returns `false` (and changes nothing) for self-loops, unknown ids,
    /// dead endpoints, or an edge that already exists.
    pub fn add_edge(&mut self, a: AgentId, b: AgentId) -> bool {
        if a == b || !self.contains(a) || !self.contains(b) {
            return false;
        }
        if !self.status(a).is_alive() || !self.status(b).is_alive() {
            return false;
        }
        if !self.neighbours[a.index()].insert(b) {
            return false;
        }
        self.neighbours[b.index()].insert(a);
        true
    }

    /// Remove the undirected edge `a — b`.  Returns `false` if it did not exist.
    pub fn remove_edge(&mut self, a: AgentId, b: AgentId) -> bool {
        if !self.has_edge(a, b) {
            return false;
        }
        self.neighbours[a.index()].remove(&b);
        self.neighbours[b.index()].remove(&a);
        true
    }

    /// Remove every edge touching `agent` from both sides.  Returns how many
    /// edges were removed.
    pub fn isolate(&mut self, agent: AgentId) -> usize {
        let former = std::mem::take(&mut self.neighbours[agent.index()]);
        for other in &former {
            if let Some(set) = self.neighbours.get_mut(other.index()) {
                set.remove(&agent);
            }
        }
        former.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.neighbours.iter().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Verify edge symmetry, absence of self-loops, dead-agent isolation, and
    /// that `last_infected` is set exactly for agents that have been infected.
    pub fn check_invariants(&self) -> EpiResult<()> {
        for a in self.agent_ids() {
            let status = self.status(a);
            let ever_infected = status != HealthStatus::Susceptible;
            if ever_infected != self.last_infected(a).is_some() {
                return Err(EpiError::invariant(format!(
                    "{a} is {status} but last_infected = {:?}",
                    self.last_infected(a)
                )));
            }
            if status == HealthStatus::Dead && self.degree(a) != 0 {
                return Err(EpiError::invariant(format!(
                    "dead {a} still has {} neighbours",
                    self.degree(a)
                )));
            }
            for &b in self.neighbours(a) {
                if b == a {
                    return Err(EpiError::invariant(format!("{a} has a self-loop")));
                }
                if !self.contains(b) {
                    return Err(EpiError::invariant(format!("{a} links to unknown {b}")));
                }
                if !self.neighbours(b).contains(&a) {
                    return Err(EpiError::invariant(format!(
                        "asymmetric edge: {b} in N({a}) but {a} not in N({b})"
                    )));
                }
            }
        }
        Ok(())
    }
}
