//! Framework error type.
//!
//! Sub-crates may define their own error enums and convert `EpiError` into
//! them via `From` impls (see `ep_sim::SimError`), or return `EpiError`
//! directly when they have nothing to add.

use thiserror::Error;

use crate::AgentId;

/// The top-level error type for `ep-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum EpiError {
    /// Invalid population, cluster, or probability parameters.
    #[error("configuration error: {0}")]
    Config(String),

    /// A structural invariant was broken (asymmetric edge, transition out of
    /// a terminal state, tally underflow).  Always a defect, never retried.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("{0} not found")]
    AgentNotFound(AgentId),
}

impl EpiError {
    /// Shorthand for building a [`EpiError::Config`] from anything printable.
    pub fn config(msg: impl Into<String>) -> Self {
        EpiError::Config(msg.into())
    }

    /// Shorthand for building a [`EpiError::InvariantViolation`].
    pub fn invariant(msg: impl Into<String>) -> Self {
        EpiError::InvariantViolation(msg.into())
    }
}

/// Shorthand result type for all `ep-*` crates.
pub type EpiResult<T> = Result<T, EpiError>;
