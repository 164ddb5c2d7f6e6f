//! Health states and the aggregate status tally.

use std::fmt;

use ep_core::{EpiError, EpiResult};

// ── HealthStatus ──────────────────────────────────────────────────────────────

/// The four compartments of the S → I → {R, D} state machine.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HealthStatus {
    #[default]
    Susceptible,
    Infected,
    Recovered,
    Dead,
}

impl HealthStatus {
    /// All states in tally order.
    pub const ALL: [HealthStatus; 4] = [
        HealthStatus::Susceptible,
        HealthStatus::Infected,
        HealthStatus::Recovered,
        HealthStatus::Dead,
    ];

    /// `true` for `Recovered` and `Dead`; no transition leaves these.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, HealthStatus::Recovered | HealthStatus::Dead)
    }

    #[inline]
    pub fn is_alive(self) -> bool {
        self != HealthStatus::Dead
    }

    /// Whether `self → to` is an edge of the state machine.
    pub fn can_transition_to(self, to: HealthStatus) -> bool {
        matches!(
            (self, to),
            (HealthStatus::Susceptible, HealthStatus::Infected)
                | (HealthStatus::Infected, HealthStatus::Recovered)
                | (HealthStatus::Infected, HealthStatus::Dead)
        )
    }

    /// Single-letter compartment code (`S`, `I`, `R`, `D`).
    pub fn code(self) -> char {
        match self {
            HealthStatus::Susceptible => 'S',
            HealthStatus::Infected    => 'I',
            HealthStatus::Recovered   => 'R',
            HealthStatus::Dead        => 'D',
        }
    }

    /// Human-readable label, used for CSV/Parquet column values.
    pub fn as_str(self) -> &'static str {
        match self {
            HealthStatus::Susceptible => "susceptible",
            HealthStatus::Infected    => "infected",
            HealthStatus::Recovered   => "recovered",
            HealthStatus::Dead        => "dead",
        }
    }

    #[inline]
    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── StatusTally ───────────────────────────────────────────────────────────────

/// Counts of agents in each [`HealthStatus`].
///
/// Owned by the driver and updated incrementally: every transition moves
/// exactly one unit from the old compartment to the new one, so
/// [`total`](Self::total) never changes after the population is built.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusTally {
    counts: [usize; 4],
}

impl StatusTally {
    /// A tally of `n` susceptible agents.
    pub fn all_susceptible(n: usize) -> Self {
        Self { counts: [n, 0, 0, 0] }
    }

    /// Count a full set of statuses from scratch.
    pub fn from_statuses<I: IntoIterator<Item = HealthStatus>>(statuses: I) -> Self {
        let mut counts = [0usize; 4];
        for s in statuses {
            counts[s.slot()] += 1;
        }
        Self { counts }
    }

    #[inline]
    pub fn count(&self, status: HealthStatus) -> usize {
        self.counts[status.slot()]
    }

    #[inline]
    pub fn susceptible(&self) -> usize {
        self.count(HealthStatus::Susceptible)
    }

    #[inline]
    pub fn infected(&self) -> usize {
        self.count(HealthStatus::Infected)
    }

    #[inline]
    pub fn recovered(&self) -> usize {
        self.count(HealthStatus::Recovered)
    }

    #[inline]
    pub fn dead(&self) -> usize {
        self.count(HealthStatus::Dead)
    }

    /// Sum over all compartments; equals the population size.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Move one agent from `from` to `to`.
    ///
    /// Fails with `InvariantViolation` if `from` is already empty; the tally
    /// is left untouched in that case.
    pub fn record(&mut self, from: HealthStatus, to: HealthStatus) -> EpiResult<()> {
        let slot = &mut self.counts[from.slot()];
        if *slot == 0 {
            return Err(EpiError::invariant(format!(
                "status tally underflow: no {from} agents left to move to {to}"
            )));
        }
        *slot -= 1;
        self.counts[to.slot()] += 1;
        Ok(())
    }
}

impl fmt::Display for StatusTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, status) in HealthStatus::ALL.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", status.code(), self.count(*status))?;
        }
        Ok(())
    }
}
