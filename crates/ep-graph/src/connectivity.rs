//! Component search, isolation repair and connectivity closure.
//!
//! All traversal is iterative (explicit queue), so populations of millions
//! of agents cannot overflow the stack.

use std::collections::VecDeque;

use ep_agent::Population;
use ep_core::{AgentId, ClusterId, SimRng};

/// Connected components over live agents, each sorted ascending; components
/// are ordered by their lowest id.  Dead agents are not part of any component.
pub fn components(pop: &Population) -> Vec<Vec<AgentId>> {
    let mut seen = vec![false; pop.count];
    let mut out = Vec::new();
    let mut queue = VecDeque::new();

    for root in pop.agent_ids() {
        if seen[root.index()] || !pop.status(root).is_alive() {
            continue;
        }
        seen[root.index()] = true;
        queue.push_back(root);
        let mut members = Vec::new();
        while let Some(a) = queue.pop_front() {
            members.push(a);
            for &b in pop.neighbours(a) {
                if !seen[b.index()] {
                    seen[b.index()] = true;
                    queue.push_back(b);
                }
            }
        }
        members.sort_unstable();
        out.push(members);
    }
    out
}

/// `true` if all live agents form one component (vacuously true when there
/// are none).
pub fn is_connected(pop: &Population) -> bool {
    components(pop).len() <= 1
}

/// Give every live agent with no neighbours one edge.
///
/// The partner is a random other member of the agent's own cluster; if the
/// cluster has no other live member, any other live agent is used.
/// `clusters[c]` must list the members of `ClusterId(c)`.  Returns the number
/// of edges added.
pub fn repair_isolated(pop: &mut Population, clusters: &[Vec<AgentId>], rng: &mut SimRng) -> usize {
    let live: Vec<AgentId> = pop.agent_ids().filter(|&a| pop.status(a).is_alive()).collect();
    let mut added = 0;

    for &agent in &live {
        if pop.degree(agent) > 0 {
            continue;
        }
        let ClusterId(c) = pop.cluster[agent.index()];
        let mates: Vec<AgentId> = clusters
            .get(c as usize)
            .map(|members| {
                members
                    .iter()
                    .copied()
                    .filter(|&m| m != agent && pop.status(m).is_alive())
                    .collect()
            })
            .unwrap_or_default();

        let partner = if mates.is_empty() {
            pick_other(&live, agent, rng)
        } else {
            rng.choose(&mates).copied()
        };

        if let Some(p) = partner {
            if pop.add_edge(agent, p) {
                added += 1;
            }
        }
    }

    if added > 0 {
        log::debug!("isolation repair: {added} edges added");
    }
    added
}

/// Join every component to the component holding the lowest live id.
///
/// Each stray component gets one edge from a random member to a random
/// already-reached agent, after which it counts as reached.  Returns the
/// number of bridging edges added.
pub fn connect_components(pop: &mut Population, rng: &mut SimRng) -> usize {
    let mut comps = components(pop).into_iter();
    let Some(mut reached) = comps.next() else {
        return 0;
    };

    let mut added = 0;
    for comp in comps {
        let from = rng.choose(&comp).copied();
        let to = rng.choose(&reached).copied();
        if let (Some(from), Some(to)) = (from, to) {
            if pop.add_edge(from, to) {
                added += 1;
            }
        }
        reached.extend(comp);
    }

    if added > 0 {
        log::debug!("connectivity closure: {added} bridging edges added");
    }
    added
}

/// Uniform pick from `pool` excluding `me`; `None` if nothing else exists.
pub(crate) fn pick_other(pool: &[AgentId], me: AgentId, rng: &mut SimRng) -> Option<AgentId> {
    let others = pool.iter().filter(|&&a| a != me).count();
    if others == 0 {
        return None;
    }
    let k = rng.gen_range(0..others);
    pool.iter().copied().filter(|&a| a != me).nth(k)
}
