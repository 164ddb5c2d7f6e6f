//! Disease parameters and recovery policies.

use ep_core::{EpiError, EpiResult};

/// Multiplier applied per age band.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgeFactors {
    pub child: f64,
    pub adult: f64,
    pub elder: f64,
}

impl AgeFactors {
    pub const fn new(child: f64, adult: f64, elder: f64) -> Self {
        Self { child, adult, elder }
    }
}

/// Age band boundaries: `age < child_below` is a child, `age >= elder_from`
/// an elder, everything between an adult.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgeBands {
    pub child_below: u8,
    pub elder_from:  u8,
}

impl Default for AgeBands {
    fn default() -> Self {
        Self { child_below: 18, elder_from: 60 }
    }
}

impl AgeBands {
    /// Select the factor for `age` from `factors`.
    #[inline]
    pub fn factor(&self, age: u8, factors: &AgeFactors) -> f64 {
        if age < self.child_below {
            factors.child
        } else if age >= self.elder_from {
            factors.elder
        } else {
            factors.adult
        }
    }
}

/// How long an infection lasts before it resolves.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "snake_case"))]
pub enum RecoveryPolicy {
    /// Each agent keeps the recovery time drawn when it was created.
    #[default]
    Fixed,

    /// Immunity grows every step and the recovery time of infected agents
    /// is recomputed from it.
    ///
    /// At the start of each step every live agent gains `U(drift)` immunity
    /// (clamped to 1.0); every infected agent then gets
    /// `recovery_time = floor(immunity * U_int(scale))`.
    ImmunityDriven {
        drift: (f64, f64),
        scale: (u32, u32),
    },
}

impl RecoveryPolicy {
    /// The immunity-driven policy with the usual ranges (drift 0.02–0.2,
    /// scale 5–15).
    pub fn immunity_driven() -> Self {
        RecoveryPolicy::ImmunityDriven { drift: (0.02, 0.2), scale: (5, 15) }
    }

    pub fn validate(&self) -> EpiResult<()> {
        match *self {
            RecoveryPolicy::Fixed => Ok(()),
            RecoveryPolicy::ImmunityDriven { drift: (lo, hi), scale: (s_lo, s_hi) } => {
                if !(0.0..=1.0).contains(&lo) || !(0.0..=1.0).contains(&hi) || lo > hi {
                    return Err(EpiError::config(format!(
                        "immunity drift {lo}..={hi} must be an ordered sub-range of [0, 1]"
                    )));
                }
                if s_lo > s_hi {
                    return Err(EpiError::config(format!("recovery scale {s_lo}..={s_hi} is inverted")));
                }
                Ok(())
            }
        }
    }
}

/// Everything the engine needs to know about the pathogen.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DiseaseParams {
    /// Per-contact probability before age and immunity adjustments.
    pub base_transmission: f64,

    /// Probability that a resolving infection ends in death.
    pub mortality_rate: f64,

    pub transmitter_age_factor: AgeFactors,
    pub receiver_age_factor:    AgeFactors,
    pub age_bands:              AgeBands,

    pub recovery: RecoveryPolicy,
}

impl Default for DiseaseParams {
    fn default() -> Self {
        Self {
            base_transmission:      0.15,
            mortality_rate:         0.02,
            transmitter_age_factor: AgeFactors::new(0.8, 1.0, 0.9),
            receiver_age_factor:    AgeFactors::new(0.7, 1.0, 1.5),
            age_bands:              AgeBands::default(),
            recovery:               RecoveryPolicy::Fixed,
        }
    }
}

impl DiseaseParams {
    pub fn validate(&self) -> EpiResult<()> {
        check_probability("base_transmission", self.base_transmission)?;
        check_probability("mortality_rate", self.mortality_rate)?;
        for (name, f) in [
            ("transmitter_age_factor", &self.transmitter_age_factor),
            ("receiver_age_factor", &self.receiver_age_factor),
        ] {
            if [f.child, f.adult, f.elder].iter().any(|x| !x.is_finite() || *x < 0.0) {
                return Err(EpiError::config(format!("{name} must be finite and non-negative")));
            }
        }
        if self.age_bands.child_below > self.age_bands.elder_from {
            return Err(EpiError::config(format!(
                "child band ends at {} but elder band starts at {}",
                self.age_bands.child_below, self.age_bands.elder_from
            )));
        }
        self.recovery.validate()
    }
}

fn check_probability(name: &str, p: f64) -> EpiResult<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(EpiError::config(format!("{name} = {p} is not a probability")));
    }
    Ok(())
}
