//! `ep-sim` — tick loop driver for the rust_epi simulator.
//!
//! # Tick loop
//!
//! ```text
//! build:  seed initial infections at tick 0 (explicit ids or N random)
//! run:    on_sim_start(0)
//!         while tick < total_ticks:
//!           tick += 1
//!           ① on_tick_start
//!           ② EpidemicEngine::step  (infection phase, then resolution)
//!           ③ on_tick_end(tally, delta)
//!           ④ on_snapshot every output_interval_ticks
//!         on_sim_end
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let population = ep_graph::build(1_000, 20, &mut SimRng::new(config.seed))?;
//! let engine = EpidemicEngine::new(DiseaseParams::default())?;
//! let mut sim = SimBuilder::new(config, population, engine).build()?;
//! let mut history = StatusHistory::new();
//! sim.run(&mut history)?;
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod sim;


pub use builder::{Seeding, SimBuilder};
pub use config::SimConfig;
pub use error::{SimError, SimResult};
pub use observer::{HistoryPoint, NoopObserver, SimObserver, StatusHistory};
pub use sim::Sim;
