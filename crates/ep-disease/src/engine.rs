//! The epidemic engine and its per-step delta.

use ep_agent::{AgentRngs, HealthStatus, Population, StatusTally};
use ep_core::{AgentId, EpiError, EpiResult, Tick};

use crate::transmission::sample_contacts;
use crate::{AgeStructuredTransmission, DiseaseParams, RecoveryPolicy, TransmissionModel};

// ── StatusDelta ───────────────────────────────────────────────────────────────

/// Transitions that happened during one [`EpidemicEngine::step`], each list
/// in the order the engine applied them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusDelta {
    pub tick:           Tick,
    pub newly_infected: Vec<AgentId>,
    pub recovered:      Vec<AgentId>,
    pub died:           Vec<AgentId>,
}

impl StatusDelta {
    pub fn new(tick: Tick) -> Self {
        Self { tick, ..Self::default() }
    }

    /// `true` if nothing changed status this step.
    pub fn is_empty(&self) -> bool {
        self.newly_infected.is_empty() && self.recovered.is_empty() && self.died.is_empty()
    }

    /// Infections resolved this step (recoveries plus deaths).
    pub fn resolved(&self) -> usize {
        self.recovered.len() + self.died.len()
    }
}

// ── EpidemicEngine ────────────────────────────────────────────────────────────

/// Advances the S → I → {R, D} state machine one tick at a time.
///
/// The engine holds only parameters; the population, per-agent RNGs and the
/// status tally are owned by the caller and passed to every
/// [`step`][Self::step].
///
/// # Step phases
///
/// ```text
/// ⓪ Drift       — ImmunityDriven only: immunity += U(drift), infected
///                 agents get recovery_time = floor(immunity * U_int(scale)).
/// ① Snapshot    — ids infected at step start, ascending.
/// ② Infection   — each snapshot agent samples floor(degree * mobility)
///                 neighbours and infects susceptible ones w.p. p.
/// ③ Resolution  — each snapshot agent with now - onset >= recovery_time
///                 dies w.p. mortality_rate, else recovers.
/// ```
///
/// Agents infected in phase ② are not in the snapshot, so they neither
/// transmit nor resolve until the next step.
#[derive(Clone, Debug)]
pub struct EpidemicEngine<T: TransmissionModel = AgeStructuredTransmission> {
    transmission:   T,
    mortality_rate: f64,
    recovery:       RecoveryPolicy,
}

impl EpidemicEngine {
    /// Validate `params` and build an engine with the age-structured model.
    pub fn new(params: DiseaseParams) -> EpiResult<Self> {
        params.validate()?;
        Ok(Self {
            transmission:   AgeStructuredTransmission::from_params(&params),
            mortality_rate: params.mortality_rate,
            recovery:       params.recovery,
        })
    }

    /// Seed an infection; see [`infect`].
    #[inline]
    pub fn infect(pop: &mut Population, tally: &mut StatusTally, agent: AgentId, now: Tick) -> EpiResult<bool> {
        infect(pop, tally, agent, now)
    }
}

impl<T: TransmissionModel> EpidemicEngine<T> {
    /// Build an engine around a custom transmission model.
    pub fn with_transmission(transmission: T, mortality_rate: f64, recovery: RecoveryPolicy) -> EpiResult<Self> {
        if !(0.0..=1.0).contains(&mortality_rate) {
            return Err(EpiError::config(format!("mortality_rate = {mortality_rate} is not a probability")));
        }
        recovery.validate()?;
        Ok(Self { transmission, mortality_rate, recovery })
    }

    pub fn transmission(&self) -> &T {
        &self.transmission
    }

    pub fn mortality_rate(&self) -> f64 {
        self.mortality_rate
    }

    pub fn recovery(&self) -> &RecoveryPolicy {
        &self.recovery
    }

    /// Advance the epidemic by one tick.
    ///
    /// `rngs` must hold one RNG per agent.  Every transition is recorded in
    /// `tally`, which therefore keeps summing to `pop.count`.
    pub fn step(
        &self,
        pop:   &mut Population,
        rngs:  &mut AgentRngs,
        tally: &mut StatusTally,
        now:   Tick,
    ) -> EpiResult<StatusDelta> {
        if rngs.len() != pop.count {
            return Err(EpiError::config(format!(
                "{} agent RNGs supplied for {} agents",
                rngs.len(),
                pop.count
            )));
        }
        let mut delta = StatusDelta::new(now);

        // ── ⓪ Drift ───────────────────────────────────────────────────────
        if let RecoveryPolicy::ImmunityDriven { drift, scale } = self.recovery {
            drift_immunity(pop, rngs, drift, scale);
        }

        // ── ① Snapshot ────────────────────────────────────────────────────
        let infected = pop.ids_with_status(HealthStatus::Infected);

        // ── ② Infection ───────────────────────────────────────────────────
        for &source in &infected {
            let contacts = sample_contacts(pop, source, rngs.get_mut(source));
            for target in contacts {
                if !pop.contains(target) || pop.status(target) != HealthStatus::Susceptible {
                    continue;
                }
                let p = self.transmission.infection_probability(pop, source, target);
                let u: f64 = rngs.get_mut(source).random();
                if u < p {
                    pop.transition(target, HealthStatus::Infected, now, tally)?;
                    delta.newly_infected.push(target);
                }
            }
        }

        // ── ③ Resolution ──────────────────────────────────────────────────
        for &agent in &infected {
            let Some(onset) = pop.last_infected(agent) else {
                return Err(EpiError::invariant(format!("{agent} is infected without an onset tick")));
            };
            if now.since(onset) < u64::from(pop.recovery_time[agent.index()]) {
                continue;
            }
            let u: f64 = rngs.get_mut(agent).random();
            if u < self.mortality_rate {
                pop.transition(agent, HealthStatus::Dead, now, tally)?;
                delta.died.push(agent);
            } else {
                pop.transition(agent, HealthStatus::Recovered, now, tally)?;
                delta.recovered.push(agent);
            }
        }

        log::trace!(
            "{now}: +{} infected, {} recovered, {} died ({tally})",
            delta.newly_infected.len(),
            delta.recovered.len(),
            delta.died.len()
        );
        Ok(delta)
    }
}

/// Mark `agent` infected at `now`.
///
/// Returns `Ok(true)` on S → I and `Ok(false)` if the agent is already
/// infected.  Recovered and dead agents cannot be reinfected
/// ([`EpiError::InvariantViolation`]); unknown ids give
/// [`EpiError::AgentNotFound`].
pub fn infect(pop: &mut Population, tally: &mut StatusTally, agent: AgentId, now: Tick) -> EpiResult<bool> {
    if !pop.contains(agent) {
        return Err(EpiError::AgentNotFound(agent));
    }
    if pop.status(agent) == HealthStatus::Infected {
        return Ok(false);
    }
    pop.transition(agent, HealthStatus::Infected, now, tally)?;
    Ok(true)
}

/// Raise every live agent's immunity and recompute infected agents'
/// recovery times from it.
fn drift_immunity(pop: &mut Population, rngs: &mut AgentRngs, drift: (f64, f64), scale: (u32, u32)) {
    for i in 0..pop.count {
        let agent = AgentId(i as u32);
        let status = pop.status(agent);
        if !status.is_alive() {
            continue;
        }
        let rng = rngs.get_mut(agent);
        let gain: f64 = rng.gen_range(drift.0..=drift.1);
        pop.immunity[i] = (pop.immunity[i] + gain).min(1.0);
        if status == HealthStatus::Infected {
            let factor: u32 = rng.gen_range(scale.0..=scale.1);
            pop.recovery_time[i] = (pop.immunity[i] * factor as f64).floor() as u32;
        }
    }
}
