//! Fluent builder for constructing a [`Sim`].

use ep_agent::{AgentRngs, HealthStatus, Population};
use ep_core::{AgentId, SimClock, SimRng, Tick};
use ep_disease::{AgeStructuredTransmission, EpidemicEngine, TransmissionModel, infect};

use crate::{Sim, SimConfig, SimError, SimResult};

/// Offset for the RNG stream that picks random initial infections.
const SEEDING_STREAM: u64 = 1;

/// Who is infected at tick 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Seeding {
    /// This many distinct susceptible agents, chosen from the run seed.
    Random(usize),
    /// Exactly these agents.
    Agents(Vec<AgentId>),
}

/// Fluent builder for [`Sim<T>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — total ticks, seed, snapshot cadence, seed count
/// - [`Population`] — from `ep_graph::build` or any other generator
/// - [`EpidemicEngine<T>`] — the disease parameters
///
/// # Optional inputs (have defaults)
///
/// | Method                      | Default                                   |
/// |-----------------------------|-------------------------------------------|
/// | `.initial_infected(n)`      | `config.initial_infected` random agents   |
/// | `.initial_infected_ids(v)`  | —                                         |
/// | `.rngs(r)`                  | `AgentRngs::new(count, config.seed)`      |
///
/// # Example
///
/// ```rust
/// use ep_core::SimRng;
/// use ep_disease::{DiseaseParams, EpidemicEngine};
/// use ep_sim::{NoopObserver, SimBuilder, SimConfig};
///
/// let config = SimConfig { total_ticks: 20, ..SimConfig::default() };
/// let population = ep_graph::build(100, 20, &mut SimRng::new(config.seed)).unwrap();
/// let engine = EpidemicEngine::new(DiseaseParams::default()).unwrap();
/// let mut sim = SimBuilder::new(config, population, engine)
///     .initial_infected(3)
///     .build()
///     .unwrap();
/// sim.run(&mut NoopObserver).unwrap();
/// assert_eq!(sim.tally.total(), 100);
/// ```
pub struct SimBuilder<T: TransmissionModel = AgeStructuredTransmission> {
    config:     SimConfig,
    population: Population,
    engine:     EpidemicEngine<T>,
    seeding:    Option<Seeding>,
    rngs:       Option<AgentRngs>,
}

impl<T: TransmissionModel> SimBuilder<T> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, population: Population, engine: EpidemicEngine<T>) -> Self {
        Self { config, population, engine, seeding: None, rngs: None }
    }

    /// Infect `count` random susceptible agents at tick 0.
    pub fn initial_infected(mut self, count: usize) -> Self {
        self.seeding = Some(Seeding::Random(count));
        self
    }

    /// Infect exactly `agents` at tick 0.  Duplicates and agents that are
    /// already infected are ignored.
    pub fn initial_infected_ids(mut self, agents: Vec<AgentId>) -> Self {
        self.seeding = Some(Seeding::Agents(agents));
        self
    }

    /// Supply pre-seeded per-agent RNGs (must be length `population.count`).
    pub fn rngs(mut self, rngs: AgentRngs) -> Self {
        self.rngs = Some(rngs);
        self
    }

    /// Validate inputs, seed the initial infections and return a
    /// ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<T>> {
        let agent_count = self.population.count;
        if agent_count == 0 {
            return Err(SimError::Config("population is empty".into()));
        }

        let rngs = match self.rngs {
            Some(r) => {
                if r.len() != agent_count {
                    return Err(SimError::AgentCountMismatch {
                        expected: agent_count,
                        got:      r.len(),
                        what:     "agent RNGs",
                    });
                }
                r
            }
            None => AgentRngs::new(agent_count, self.config.seed),
        };

        let mut population = self.population;
        let mut tally = population.tally();
        let seeding = self.seeding.unwrap_or(Seeding::Random(self.config.initial_infected));

        let targets = match seeding {
            Seeding::Agents(ids) => ids,
            Seeding::Random(count) => {
                let pool = population.ids_with_status(HealthStatus::Susceptible);
                if count > pool.len() {
                    return Err(SimError::Config(format!(
                        "cannot seed {count} infections among {} susceptible agents",
                        pool.len()
                    )));
                }
                let mut rng = SimRng::new(self.config.seed).child(SEEDING_STREAM);
                let mut picked = rng.sample_distinct(&pool, count);
                picked.sort_unstable();
                picked
            }
        };

        let mut seeded = Vec::with_capacity(targets.len());
        for agent in targets {
            if infect(&mut population, &mut tally, agent, Tick::ZERO)? {
                seeded.push(agent);
            }
        }
        log::debug!("seeded {} initial infections: {:?}", seeded.len(), seeded);

        Ok(Sim {
            clock: SimClock::new(),
            config: self.config,
            population,
            rngs,
            tally,
            engine: self.engine,
            seeded,
        })
    }
}
