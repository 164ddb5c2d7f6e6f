//! `ep-disease` — the epidemic engine.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                      |
//! |------------------|---------------------------------------------------------------|
//! | [`params`]       | `DiseaseParams`, `AgeFactors`, `AgeBands`, `RecoveryPolicy`   |
//! | [`transmission`] | `TransmissionModel` trait, `AgeStructuredTransmission`, contact sampling |
//! | [`engine`]       | `EpidemicEngine`, `StatusDelta`, `infect`                     |
//!
//! # Determinism
//!
//! Every random draw in a step comes from the per-agent [`AgentRng`] of the
//! agent doing the work: the transmitter for contact sampling and infection
//! draws, the resolving agent for its mortality draw.  Agents are processed
//! in ascending id order, so a run is fully determined by the seed used to
//! create the [`AgentRngs`].
//!
//! [`AgentRng`]: ep_core::AgentRng
//! [`AgentRngs`]: ep_agent::AgentRngs
//!
//! # Quick-start
//!
//! ```rust
//! use ep_agent::AgentRngs;
//! use ep_core::{AgentId, SimRng, Tick};
//! use ep_disease::{DiseaseParams, EpidemicEngine};
//!
//! let mut pop = ep_graph::build(200, 20, &mut SimRng::new(7)).unwrap();
//! let mut rngs = AgentRngs::new(pop.count, 7);
//! let mut tally = pop.tally();
//! EpidemicEngine::infect(&mut pop, &mut tally, AgentId(0), Tick::ZERO).unwrap();
//!
//! let engine = EpidemicEngine::new(DiseaseParams::default()).unwrap();
//! for t in 1..=30 {
//!     engine.step(&mut pop, &mut rngs, &mut tally, Tick(t)).unwrap();
//! }
//! assert_eq!(tally.total(), 200);
//! ```

pub mod engine;
pub mod params;
pub mod transmission;


pub use engine::{EpidemicEngine, StatusDelta, infect};
pub use params::{AgeBands, AgeFactors, DiseaseParams, RecoveryPolicy};
pub use transmission::{AgeStructuredTransmission, TransmissionModel, contact_count, sample_contacts};
