//! `ep-graph` — synthetic contact-network population builders.
//!
//! # Crate layout
//!
//! | Module             | Contents                                               |
//! |--------------------|--------------------------------------------------------|
//! | [`config`]         | `GraphConfig` — every edge probability and attribute range |
//! | [`builder`]        | `ContactGraphBuilder`, [`build`] (clustered topology)  |
//! | [`small_world`]    | ring-lattice / rewired alternative topology            |
//! | [`connectivity`]   | component search, isolation repair, connectivity closure |
//!
//! # Guarantees
//!
//! Every population returned by this crate with two or more agents has no
//! isolated agent and forms a single connected component.  Edges are
//! symmetric by construction (all insertion goes through
//! [`Population::add_edge`](ep_agent::Population::add_edge)).
//!
//! # Quick-start
//!
//! ```rust
//! use ep_core::SimRng;
//! use ep_graph::{build, is_connected};
//!
//! let mut rng = SimRng::new(7);
//! let pop = build(200, 20, &mut rng).unwrap();
//! assert_eq!(pop.count, 200);
//! assert!(is_connected(&pop));
//! ```

pub mod builder;
pub mod config;
pub mod connectivity;
pub mod small_world;

#[cfg(test)]
mod tests;

pub use builder::{ContactGraphBuilder, build};
pub use config::GraphConfig;
pub use connectivity::{components, connect_components, is_connected, repair_isolated};
pub use small_world::small_world;
