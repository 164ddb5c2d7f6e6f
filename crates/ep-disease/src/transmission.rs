//! The `TransmissionModel` trait and the default age-structured model.

use ep_agent::Population;
use ep_core::{AgentId, AgentRng};

use crate::{AgeBands, AgeFactors, DiseaseParams};

/// Pluggable per-contact infection probability.
///
/// Called once for every sampled (infected source, susceptible target) pair
/// during the infection phase.  The engine draws the uniform number itself,
/// so implementations only compute a probability and must not hold mutable
/// state.
///
/// # Example
///
/// ```rust
/// use ep_agent::Population;
/// use ep_core::AgentId;
/// use ep_disease::TransmissionModel;
///
/// /// Every contact transmits with the same probability.
/// struct Flat(f64);
///
/// impl TransmissionModel for Flat {
///     fn infection_probability(&self, _: &Population, _: AgentId, _: AgentId) -> f64 {
///         self.0
///     }
/// }
/// ```
pub trait TransmissionModel: Send + Sync + 'static {
    /// Probability in `[0, 1]` that `source` infects `target` on one contact.
    fn infection_probability(&self, pop: &Population, source: AgentId, target: AgentId) -> f64;
}

/// `base * transmitter_factor(age) * receiver_factor(age) * (1 - immunity²)`.
#[derive(Clone, Debug, PartialEq)]
pub struct AgeStructuredTransmission {
    pub base:        f64,
    pub transmitter: AgeFactors,
    pub receiver:    AgeFactors,
    pub bands:       AgeBands,
}

impl AgeStructuredTransmission {
    pub fn from_params(params: &DiseaseParams) -> Self {
        Self {
            base:        params.base_transmission,
            transmitter: params.transmitter_age_factor,
            receiver:    params.receiver_age_factor,
            bands:       params.age_bands,
        }
    }
}

impl Default for AgeStructuredTransmission {
    fn default() -> Self {
        Self::from_params(&DiseaseParams::default())
    }
}

impl TransmissionModel for AgeStructuredTransmission {
    fn infection_probability(&self, pop: &Population, source: AgentId, target: AgentId) -> f64 {
        let t_factor = self.bands.factor(pop.age[source.index()], &self.transmitter);
        let r_factor = self.bands.factor(pop.age[target.index()], &self.receiver);
        let immunity = pop.immunity[target.index()];
        (self.base * t_factor * r_factor * (1.0 - immunity * immunity)).clamp(0.0, 1.0)
    }
}

/// Number of neighbours `agent` probes this step: `floor(degree * mobility)`.
#[inline]
pub fn contact_count(pop: &Population, agent: AgentId) -> usize {
    let degree = pop.degree(agent);
    (degree as f64 * pop.mobility[agent.index()]).floor() as usize
}

/// Sample this step's contacts for `agent` without replacement, drawing from
/// the agent's own RNG over its id-ordered neighbour set.
///
/// Empty when the agent has no neighbours or its contact count rounds to 0.
pub fn sample_contacts(pop: &Population, agent: AgentId, rng: &mut AgentRng) -> Vec<AgentId> {
    let k = contact_count(pop, agent);
    if k == 0 {
        return Vec::new();
    }
    let neighbours: Vec<AgentId> = pop.neighbours(agent).iter().copied().collect();
    rng.sample_distinct(&neighbours, k)
}
