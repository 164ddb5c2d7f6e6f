//! `ep-agent` — population storage for the `rust_epi` simulator.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`status`]   | `HealthStatus` state machine, `StatusTally` counters          |
//! | [`store`]    | `Population` (SoA arena), `AgentInit`, `AgentView`, `AgentRngs` |
//!
//! # Arena model
//!
//! Agents never hold references to each other.  Every relation (contact
//! edges, infection sources) is an [`AgentId`](ep_core::AgentId) looked up
//! in the [`Population`].  Dead agents stay in the arena with status
//! [`HealthStatus::Dead`] and an empty neighbour set, so ids are stable for
//! the lifetime of a run.

pub mod status;
pub mod store;

#[cfg(test)]
mod tests;

pub use status::{HealthStatus, StatusTally};
pub use store::{AgentInit, AgentRngs, AgentView, Population};
