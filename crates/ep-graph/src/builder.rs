//! Clustered contact-graph builder.
//!
//! # Construction phases
//!
//! ```text
//! ① Partition   — ids 0..N into N / cluster_size full clusters, plus one
//!                 partial remainder cluster if N is not a multiple.
//! ② Attributes  — age, mobility, immunity, recovery time per agent.
//! ③ Intra       — each ordered pair inside a cluster: edge w.p. p_intra.
//! ④ Bridges     — each agent w.p. p_bridge picks one other cluster and
//!                 links to each of its members w.p. p_target.
//! ⑤ Super       — each agent w.p. p_super scans everyone, linking w.p.
//!                 p_super_edge, capped at max_connection_limit new edges.
//! ⑥ Remainder   — one forced edge from the partial cluster to the rest.
//! ⑦ Isolation   — zero-degree agents get one edge (own cluster first).
//! ⑧ Closure     — BFS; stray components are bridged until one remains.
//! ```

use ep_agent::Population;
use ep_core::{AgentId, ClusterId, EpiError, EpiResult, SimRng};

use crate::GraphConfig;
use crate::connectivity::{connect_components, repair_isolated};

/// Build a clustered population with the default [`GraphConfig`].
///
/// Fails with [`EpiError::Config`] if `total_population` or `cluster_size`
/// is zero.
pub fn build(total_population: usize, cluster_size: usize, rng: &mut SimRng) -> EpiResult<Population> {
    ContactGraphBuilder::new(total_population, cluster_size).build(rng)
}

/// Fluent builder for a clustered contact-graph [`Population`].
///
/// # Example
///
/// ```rust
/// use ep_core::SimRng;
/// use ep_graph::{ContactGraphBuilder, GraphConfig};
///
/// let config = GraphConfig { p_intra: 0.5, ..GraphConfig::default() };
/// let pop = ContactGraphBuilder::new(120, 20)
///     .config(config)
///     .build(&mut SimRng::new(1))
///     .unwrap();
/// assert_eq!(pop.count, 120);
/// ```
#[derive(Clone, Debug)]
pub struct ContactGraphBuilder {
    total_population: usize,
    cluster_size:     usize,
    config:           GraphConfig,
}

impl ContactGraphBuilder {
    pub fn new(total_population: usize, cluster_size: usize) -> Self {
        Self {
            total_population,
            cluster_size,
            config: GraphConfig::default(),
        }
    }

    /// Replace the default edge probabilities and attribute ranges.
    pub fn config(mut self, config: GraphConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate inputs and run all construction phases.
    pub fn build(self, rng: &mut SimRng) -> EpiResult<Population> {
        if self.total_population == 0 {
            return Err(EpiError::config("total_population must be positive"));
        }
        if self.cluster_size == 0 {
            return Err(EpiError::config("cluster_size must be positive"));
        }
        if u32::try_from(self.total_population).is_err() {
            return Err(EpiError::config(format!(
                "total_population {} exceeds the AgentId range",
                self.total_population
            )));
        }
        self.config.validate()?;

        let cfg = &self.config;
        let clusters = partition(self.total_population, self.cluster_size);
        let full_clusters = self.total_population / self.cluster_size;

        // ── ② Attributes ──────────────────────────────────────────────────
        let mut pop = Population::with_capacity(self.total_population);
        for (c, members) in clusters.iter().enumerate() {
            for _ in members {
                pop.push_agent(cfg.draw_agent(ClusterId(c as u32), rng));
            }
        }

        // ── ③ Intra-cluster ───────────────────────────────────────────────
        let mut intra = 0;
        for members in &clusters {
            intra += wire_cluster(&mut pop, members, cfg.p_intra, rng);
        }

        // ── ④ Bridges ─────────────────────────────────────────────────────
        let bridges = add_bridges(&mut pop, &clusters, cfg, rng);

        // ── ⑤ Superspreaders ──────────────────────────────────────────────
        let (spreaders, super_edges) = add_superspreaders(&mut pop, cfg, rng);

        // ── ⑥ Remainder bridge ────────────────────────────────────────────
        bridge_remainder(&mut pop, &clusters, full_clusters, rng);

        log::debug!(
            "graph build: {} agents in {} clusters; intra={} bridge={} super={} ({} superspreaders)",
            pop.count,
            clusters.len(),
            intra,
            bridges,
            super_edges,
            spreaders
        );

        // ── ⑦ Isolation repair / ⑧ Connectivity closure ───────────────────
        repair_isolated(&mut pop, &clusters, rng);
        connect_components(&mut pop, rng);

        Ok(pop)
    }
}

/// Split `0..total` into consecutive runs of `cluster_size`; the last run is
/// shorter when `total` is not a multiple.
pub(crate) fn partition(total: usize, cluster_size: usize) -> Vec<Vec<AgentId>> {
    (0..total as u32)
        .collect::<Vec<_>>()
        .chunks(cluster_size)
        .map(|chunk| chunk.iter().copied().map(AgentId).collect())
        .collect()
}

/// Every ordered pair `(k, x)`, `k != x`, gets an independent chance `p`.
fn wire_cluster(pop: &mut Population, members: &[AgentId], p: f64, rng: &mut SimRng) -> usize {
    let mut added = 0;
    for &k in members {
        for &x in members {
            if k != x && rng.gen_bool(p) && pop.add_edge(k, x) {
                added += 1;
            }
        }
    }
    added
}

fn add_bridges(pop: &mut Population, clusters: &[Vec<AgentId>], cfg: &GraphConfig, rng: &mut SimRng) -> usize {
    if clusters.len() < 2 {
        return 0;
    }
    let mut added = 0;
    for (own, members) in clusters.iter().enumerate() {
        for &agent in members {
            if !rng.gen_bool(cfg.p_bridge) {
                continue;
            }
            // Uniform over the other clusters: draw from len-1 slots and skip own.
            let mut target = rng.gen_range(0..clusters.len() - 1);
            if target >= own {
                target += 1;
            }
            for &other in &clusters[target] {
                if rng.gen_bool(cfg.p_target) && pop.add_edge(agent, other) {
                    added += 1;
                }
            }
        }
    }
    added
}

/// Link a random member of the partial cluster to a random agent of the
/// full clusters.  No-op (returns `None`) when there is no partial cluster
/// or nothing to link it to.
pub(crate) fn bridge_remainder(
    pop:           &mut Population,
    clusters:      &[Vec<AgentId>],
    full_clusters: usize,
    rng:           &mut SimRng,
) -> Option<(AgentId, AgentId)> {
    if full_clusters == 0 {
        return None;
    }
    let remainder = clusters.get(full_clusters)?;
    let from = *rng.choose(remainder)?;
    let main: Vec<AgentId> = clusters[..full_clusters].iter().flatten().copied().collect();
    let to = *rng.choose(&main)?;
    pop.add_edge(from, to);
    Some((from, to))
}

fn add_superspreaders(pop: &mut Population, cfg: &GraphConfig, rng: &mut SimRng) -> (usize, usize) {
    let spreaders: Vec<AgentId> = pop.agent_ids().filter(|_| rng.gen_bool(cfg.p_super)).collect();
    let mut added = 0;
    for &s in &spreaders {
        let mut extra = 0;
        for other in (0..pop.count as u32).map(AgentId) {
            if extra >= cfg.max_connection_limit {
                break;
            }
            if other != s && rng.gen_bool(cfg.p_super_edge) && pop.add_edge(s, other) {
                extra += 1;
            }
        }
        added += extra;
    }
    (spreaders.len(), added)
}
