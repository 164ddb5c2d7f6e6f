//! Graph-construction parameters.
//!
//! Observed model variants differ widely here (intra-cluster density from
//! 10 % to 80 %, superspreader rates from 0.1 % to 2 %), so every knob is a
//! named field rather than a constant.

use ep_agent::AgentInit;
use ep_core::{ClusterId, EpiError, EpiResult, SimRng};

/// Edge probabilities and per-agent attribute ranges used by the builders.
///
/// All ranges are inclusive `(low, high)` pairs.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GraphConfig {
    /// Probability of an edge for each ordered pair inside a cluster.
    pub p_intra: f64,

    /// Probability that an agent reaches out to one other cluster.
    pub p_bridge: f64,

    /// Probability of an edge to each member of the chosen target cluster.
    pub p_target: f64,

    /// Probability that an agent is a superspreader.
    pub p_super: f64,

    /// Probability of a superspreader edge to each other agent.
    pub p_super_edge: f64,

    /// Maximum number of extra edges one superspreader may add.
    pub max_connection_limit: usize,

    pub age_range: (u8, u8),
    pub mobility_range: (f64, f64),
    pub immunity_range: (f64, f64),

    /// Ticks from infection onset to resolution under the fixed recovery
    /// policy.
    pub recovery_time_range: (u32, u32),
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            p_intra:              0.10,
            p_bridge:             0.20,
            p_target:             0.05,
            p_super:              0.001,
            p_super_edge:         0.03,
            max_connection_limit: 20,
            age_range:            (0, 100),
            mobility_range:       (0.3, 1.0),
            immunity_range:       (0.1, 0.6),
            recovery_time_range:  (10, 16),
        }
    }
}

impl GraphConfig {
    /// Reject probabilities outside `[0, 1]` and inverted or out-of-domain
    /// ranges.
    pub fn validate(&self) -> EpiResult<()> {
        for (name, p) in [
            ("p_intra", self.p_intra),
            ("p_bridge", self.p_bridge),
            ("p_target", self.p_target),
            ("p_super", self.p_super),
            ("p_super_edge", self.p_super_edge),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(EpiError::config(format!("{name} = {p} is not a probability")));
            }
        }
        let (a_lo, a_hi) = self.age_range;
        if a_lo > a_hi || a_hi > 100 {
            return Err(EpiError::config(format!("age_range {a_lo}..={a_hi} must lie within 0..=100")));
        }
        check_unit_range("mobility_range", self.mobility_range)?;
        check_unit_range("immunity_range", self.immunity_range)?;
        let (r_lo, r_hi) = self.recovery_time_range;
        if r_lo > r_hi {
            return Err(EpiError::config(format!("recovery_time_range {r_lo}..={r_hi} is inverted")));
        }
        Ok(())
    }

    /// Draw the creation-time attributes of one agent in `cluster`.
    ///
    /// Draw order is fixed (age, mobility, immunity, recovery time) so a
    /// given seed always yields the same population.
    pub fn draw_agent(&self, cluster: ClusterId, rng: &mut SimRng) -> AgentInit {
        let age = rng.gen_range(self.age_range.0..=self.age_range.1);
        let mobility = rng.gen_range(self.mobility_range.0..=self.mobility_range.1);
        let immunity = rng.gen_range(self.immunity_range.0..=self.immunity_range.1);
        let recovery_time = rng.gen_range(self.recovery_time_range.0..=self.recovery_time_range.1);
        AgentInit { age, immunity, mobility, cluster, recovery_time }
    }
}

fn check_unit_range(name: &str, (lo, hi): (f64, f64)) -> EpiResult<()> {
    if !(0.0..=1.0).contains(&lo) || !(0.0..=1.0).contains(&hi) || lo > hi {
        return Err(EpiError::config(format!("{name} {lo}..={hi} must be an ordered sub-range of [0, 1]")));
    }
    Ok(())
}
