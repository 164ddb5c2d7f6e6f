//! Ring-lattice population with random rewiring (Watts–Strogatz style).
//!
//! An alternative to the clustered builder for experiments that want short
//! path lengths with high local clustering but no community structure.  All
//! agents share `ClusterId(0)`; the same isolation repair and connectivity
//! closure run afterwards, so the result is always connected.

use ep_agent::Population;
use ep_core::{AgentId, ClusterId, EpiError, EpiResult, SimRng};

use crate::GraphConfig;
use crate::connectivity::{connect_components, repair_isolated};

/// Build a rewired ring lattice of `total_population` agents.
///
/// Each agent starts linked to its `k_nearest / 2` successors (and thus
/// predecessors) on the ring; every lattice edge `(i, i + j)` is then, with
/// probability `rewire_p`, moved to `(i, t)` for a uniformly random `t`
/// that is neither `i` nor already a neighbour of `i`.
///
/// Agent attributes are drawn from `config`; its edge probabilities are not
/// used.
pub fn small_world(
    total_population: usize,
    k_nearest:        usize,
    rewire_p:         f64,
    config:           &GraphConfig,
    rng:              &mut SimRng,
) -> EpiResult<Population> {
    if total_population == 0 {
        return Err(EpiError::config("total_population must be positive"));
    }
    if k_nearest >= total_population {
        return Err(EpiError::config(format!(
            "k_nearest ({k_nearest}) must be smaller than total_population ({total_population})"
        )));
    }
    if !(0.0..=1.0).contains(&rewire_p) {
        return Err(EpiError::config(format!("rewire_p = {rewire_p} is not a probability")));
    }
    config.validate()?;

    let n = total_population;
    let mut pop = Population::with_capacity(n);
    for _ in 0..n {
        pop.push_agent(config.draw_agent(ClusterId(0), rng));
    }

    let half = k_nearest / 2;
    for j in 1..=half {
        for i in 0..n {
            pop.add_edge(AgentId(i as u32), AgentId(((i + j) % n) as u32));
        }
    }

    let mut rewired = 0;
    for j in 1..=half {
        for i in 0..n {
            let a = AgentId(i as u32);
            let b = AgentId(((i + j) % n) as u32);
            if !pop.has_edge(a, b) || !rng.gen_bool(rewire_p) {
                continue;
            }
            // A node already linked to everyone has nowhere to rewire to.
            if pop.degree(a) + 1 >= n {
                continue;
            }
            let target = loop {
                let t = AgentId(rng.gen_range(0..n) as u32);
                if t != a && !pop.has_edge(a, t) {
                    break t;
                }
            };
            pop.remove_edge(a, b);
            pop.add_edge(a, target);
            rewired += 1;
        }
    }
    log::debug!(
        "small world: {n} agents, k={k_nearest}, {rewired} of {} lattice edges rewired",
        n * half
    );

    let clusters = vec![pop.agent_ids().collect::<Vec<_>>()];
    repair_isolated(&mut pop, &clusters, rng);
    connect_components(&mut pop, rng);
    Ok(pop)
}
