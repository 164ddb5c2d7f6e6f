//! Unit tests for ep-graph.

#[cfg(test)]
fn assert_well_formed(pop: &ep_agent::Population) {
    pop.check_invariants().expect("symmetric, loop-free graph");
    if pop.count >= 2 {
        for a in pop.agent_ids() {
            assert!(pop.degree(a) > 0, "{a} is isolated");
        }
    }
    assert!(crate::is_connected(pop), "graph is not connected");
}

#[cfg(test)]
mod clustered {
    use ep_agent::Population;
    use ep_core::{AgentId, ClusterId, EpiError, SimRng};

    use super::assert_well_formed;
    use crate::builder::{bridge_remainder, partition};
    use crate::{ContactGraphBuilder, GraphConfig, build};

    #[test]
    fn zero_population_is_config_error() {
        let err = build(0, 20, &mut SimRng::new(1)).unwrap_err();
        assert!(matches!(err, EpiError::Config(_)));
    }

    #[test]
    fn zero_cluster_size_is_config_error() {
        let err = build(10, 0, &mut SimRng::new(1)).unwrap_err();
        assert!(matches!(err, EpiError::Config(_)));
    }

    #[test]
    fn bad_probability_is_config_error() {
        let config = GraphConfig { p_bridge: 1.5, ..GraphConfig::default() };
        let err = ContactGraphBuilder::new(40, 20)
            .config(config)
            .build(&mut SimRng::new(1))
            .unwrap_err();
        assert!(matches!(err, EpiError::Config(_)));
    }

    #[test]
    fn inverted_range_is_config_error() {
        let config = GraphConfig { immunity_range: (0.6, 0.1), ..GraphConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partition_with_remainder() {
        let parts = partition(45, 20);
        let sizes: Vec<usize> = parts.iter().map(Vec::len).collect();
        assert_eq!(sizes, [20, 20, 5]);
        assert_eq!(parts[2][0], AgentId(40));
    }

    #[test]
    fn clusters_assigned_by_block() {
        let pop = build(45, 20, &mut SimRng::new(3)).unwrap();
        assert_eq!(pop.count, 45);
        assert_eq!(pop.cluster[0], ClusterId(0));
        assert_eq!(pop.cluster[19], ClusterId(0));
        assert_eq!(pop.cluster[20], ClusterId(1));
        assert_eq!(pop.cluster[44], ClusterId(2));
    }

    #[test]
    fn attributes_within_ranges() {
        let pop = build(300, 20, &mut SimRng::new(11)).unwrap();
        let cfg = GraphConfig::default();
        for a in pop.agent_ids() {
            let v = pop.agent(a).unwrap();
            assert!(v.age <= 100);
            assert!((cfg.mobility_range.0..=cfg.mobility_range.1).contains(&v.mobility));
            assert!((cfg.immunity_range.0..=cfg.immunity_range.1).contains(&v.immunity));
            assert!((10..=16).contains(&v.recovery_time));
            assert_eq!(v.last_infected_timestep(), -1);
        }
    }

    #[test]
    fn connected_for_many_seeds_and_sizes() {
        for (seed, n, cs) in [(1, 1000, 20), (2, 45, 20), (3, 7, 20), (4, 2, 1), (5, 101, 10), (6, 20, 20)] {
            let pop = build(n, cs, &mut SimRng::new(seed)).unwrap();
            assert_eq!(pop.count, n);
            assert_well_formed(&pop);
        }
    }

    #[test]
    fn sparse_config_still_connected() {
        // With every probability at zero only the repair phases add edges.
        let config = GraphConfig {
            p_intra:      0.0,
            p_bridge:     0.0,
            p_target:     0.0,
            p_super:      0.0,
            p_super_edge: 0.0,
            ..GraphConfig::default()
        };
        let pop = ContactGraphBuilder::new(250, 20)
            .config(config)
            .build(&mut SimRng::new(8))
            .unwrap();
        assert_well_formed(&pop);
    }

    #[test]
    fn single_agent_population() {
        let pop = build(1, 20, &mut SimRng::new(1)).unwrap();
        assert_eq!(pop.count, 1);
        assert_eq!(pop.degree(AgentId(0)), 0);
        assert!(crate::is_connected(&pop));
    }

    #[test]
    fn intra_denser_than_inter() {
        let pop = build(1000, 20, &mut SimRng::new(21)).unwrap();
        let (mut intra, mut inter) = (0usize, 0usize);
        for a in pop.agent_ids() {
            for &b in pop.neighbours(a) {
                if pop.cluster[a.index()] == pop.cluster[b.index()] {
                    intra += 1;
                } else {
                    inter += 1;
                }
            }
        }
        // 50 clusters of 20: intra pairs = 50 * 190, inter pairs ≈ 490 000.
        let intra_density = intra as f64 / (2.0 * 50.0 * 190.0);
        let inter_density = inter as f64 / (2.0 * (1000.0 * 999.0 / 2.0 - 50.0 * 190.0));
        assert!(
            intra_density > 10.0 * inter_density,
            "intra {intra_density:.4} vs inter {inter_density:.6}"
        );
    }

    #[test]
    fn superspreader_cap_respected() {
        let config = GraphConfig {
            p_intra:              0.0,
            p_bridge:             0.0,
            p_super:              1.0,
            p_super_edge:         1.0,
            max_connection_limit: 5,
            ..GraphConfig::default()
        };
        let pop = ContactGraphBuilder::new(100, 20)
            .config(config)
            .build(&mut SimRng::new(2))
            .unwrap();
        // Uncapped, every agent would link to all 99 others (4 950 edges).
        // Capped, each of the 100 spreaders adds at most five; closure may add
        // at most one edge per stray component.
        assert!(pop.edge_count() <= 100 * 5 + 99, "got {} edges", pop.edge_count());
        // The last spreader still finds five agents it is not yet linked to.
        assert!(pop.degree(AgentId(99)) >= 5);
        assert_well_formed(&pop);
    }

    #[test]
    fn bridges_only_target_other_clusters() {
        let config = GraphConfig {
            p_intra:  0.0,
            p_bridge: 1.0,
            p_target: 1.0,
            p_super:  0.0,
            ..GraphConfig::default()
        };
        let pop = ContactGraphBuilder::new(60, 20)
            .config(config)
            .build(&mut SimRng::new(5))
            .unwrap();
        for a in pop.agent_ids() {
            // Every agent linked to the whole of some other cluster.
            assert!(pop.degree(a) >= 20, "{a} has degree {}", pop.degree(a));
            for &b in pop.neighbours(a) {
                assert_ne!(pop.cluster[a.index()], pop.cluster[b.index()], "{a} - {b} inside one cluster");
            }
        }
        assert_well_formed(&pop);
    }

    fn unwired(total: usize, cluster_size: usize) -> (Population, Vec<Vec<AgentId>>) {
        let clusters = partition(total, cluster_size);
        let cfg = GraphConfig::default();
        let mut rng = SimRng::new(0);
        let mut pop = Population::with_capacity(total);
        for (c, members) in clusters.iter().enumerate() {
            for _ in members {
                pop.push_agent(cfg.draw_agent(ClusterId(c as u32), &mut rng));
            }
        }
        (pop, clusters)
    }

    #[test]
    fn remainder_bridged_to_main_population() {
        for seed in 0..20 {
            let (mut pop, clusters) = unwired(45, 20);
            let (from, to) = bridge_remainder(&mut pop, &clusters, 2, &mut SimRng::new(seed)).unwrap();
            assert!((40..45).contains(&from.0), "from {from}");
            assert!(to.0 < 40, "to {to}");
            assert!(pop.has_edge(from, to));
            assert_eq!(pop.edge_count(), 1);
        }
    }

    #[test]
    fn remainder_bridge_skipped_without_partial_or_full_cluster() {
        let (mut pop, clusters) = unwired(40, 20);
        assert!(bridge_remainder(&mut pop, &clusters, 2, &mut SimRng::new(1)).is_none());

        let (mut pop, clusters) = unwired(7, 20);
        assert!(bridge_remainder(&mut pop, &clusters, 0, &mut SimRng::new(1)).is_none());
        assert_eq!(pop.edge_count(), 0);
    }

    #[test]
    fn same_seed_same_graph() {
        let a = build(300, 20, &mut SimRng::new(99)).unwrap();
        let b = build(300, 20, &mut SimRng::new(99)).unwrap();
        for id in a.agent_ids() {
            assert_eq!(a.neighbours(id), b.neighbours(id));
            assert_eq!(a.age[id.index()], b.age[id.index()]);
        }
        let c = build(300, 20, &mut SimRng::new(100)).unwrap();
        assert!(a.agent_ids().any(|id| a.neighbours(id) != c.neighbours(id)));
    }
}

#[cfg(test)]
mod connectivity {
    use ep_agent::{AgentInit, HealthStatus, Population};
    use ep_core::{AgentId, ClusterId, SimRng, Tick};

    use crate::{components, connect_components, is_connected, repair_isolated};

    fn bare(n: usize, cluster_of: impl Fn(usize) -> u32) -> Population {
        let mut pop = Population::with_capacity(n);
        for i in 0..n {
            pop.push_agent(AgentInit {
                age:           40,
                immunity:      0.1,
                mobility:      1.0,
                cluster:       ClusterId(cluster_of(i)),
                recovery_time: 10,
            });
        }
        pop
    }

    #[test]
    fn components_found_iteratively() {
        let mut pop = bare(6, |_| 0);
        pop.add_edge(AgentId(0), AgentId(1));
        pop.add_edge(AgentId(2), AgentId(3));
        let comps = components(&pop);
        assert_eq!(comps.len(), 4);
        assert_eq!(comps[0], vec![AgentId(0), AgentId(1)]);
        assert_eq!(comps[1], vec![AgentId(2), AgentId(3)]);
        assert!(!is_connected(&pop));
    }

    #[test]
    fn long_chain_does_not_overflow() {
        let n = 200_000;
        let mut pop = bare(n, |_| 0);
        for i in 1..n as u32 {
            pop.add_edge(AgentId(i - 1), AgentId(i));
        }
        assert!(is_connected(&pop));
    }

    #[test]
    fn repair_prefers_own_cluster() {
        let mut pop = bare(6, |i| (i / 3) as u32);
        let clusters = vec![
            vec![AgentId(0), AgentId(1), AgentId(2)],
            vec![AgentId(3), AgentId(4), AgentId(5)],
        ];
        let added = repair_isolated(&mut pop, &clusters, &mut SimRng::new(5));
        assert!(added >= 3);
        for a in pop.agent_ids() {
            assert!(pop.degree(a) > 0);
            for &b in pop.neighbours(a) {
                assert_eq!(pop.cluster[a.index()], pop.cluster[b.index()]);
            }
        }
    }

    #[test]
    fn repair_falls_back_to_population() {
        // Singleton clusters: the only option is another cluster.
        let mut pop = bare(3, |i| i as u32);
        let clusters: Vec<Vec<AgentId>> = (0..3).map(|i| vec![AgentId(i)]).collect();
        repair_isolated(&mut pop, &clusters, &mut SimRng::new(5));
        assert!(pop.agent_ids().all(|a| pop.degree(a) > 0));
    }

    #[test]
    fn closure_joins_everything() {
        let mut pop = bare(10, |_| 0);
        pop.add_edge(AgentId(0), AgentId(1));
        pop.add_edge(AgentId(5), AgentId(6));
        let added = connect_components(&mut pop, &mut SimRng::new(3));
        // {0,1} {2} {3} {4} {5,6} {7} {8} {9}: seven strays to attach.
        assert_eq!(added, 7);
        assert!(is_connected(&pop));
    }

    #[test]
    fn dead_agents_excluded_from_components() {
        let mut pop = bare(3, |_| 0);
        pop.add_edge(AgentId(0), AgentId(1));
        pop.add_edge(AgentId(1), AgentId(2));
        let mut tally = pop.tally();
        pop.transition(AgentId(1), HealthStatus::Infected, Tick(0), &mut tally).unwrap();
        pop.transition(AgentId(1), HealthStatus::Dead, Tick(4), &mut tally).unwrap();
        let comps = components(&pop);
        assert_eq!(comps, vec![vec![AgentId(0)], vec![AgentId(2)]]);
    }
}

#[cfg(test)]
mod small_world {
    use ep_core::{ClusterId, EpiError, SimRng};

    use super::assert_well_formed;
    use crate::{GraphConfig, small_world};

    #[test]
    fn lattice_without_rewiring() {
        let pop = small_world(100, 10, 0.0, &GraphConfig::default(), &mut SimRng::new(1)).unwrap();
        assert!(pop.agent_ids().all(|a| pop.degree(a) == 10));
        assert_eq!(pop.edge_count(), 500);
        assert!(pop.cluster.iter().all(|&c| c == ClusterId(0)));
        assert_well_formed(&pop);
    }

    #[test]
    fn rewiring_preserves_edge_count_and_connectivity() {
        let pop = small_world(100, 10, 0.03, &GraphConfig::default(), &mut SimRng::new(2)).unwrap();
        assert_eq!(pop.edge_count(), 500, "rewiring moves edges, never drops them");
        assert_well_formed(&pop);
    }

    #[test]
    fn full_rewire_still_connected() {
        let pop = small_world(60, 2, 1.0, &GraphConfig::default(), &mut SimRng::new(7)).unwrap();
        assert_well_formed(&pop);
    }

    #[test]
    fn invalid_parameters() {
        let cfg = GraphConfig::default();
        assert!(matches!(small_world(0, 2, 0.1, &cfg, &mut SimRng::new(1)), Err(EpiError::Config(_))));
        assert!(matches!(small_world(10, 10, 0.1, &cfg, &mut SimRng::new(1)), Err(EpiError::Config(_))));
        assert!(matches!(small_world(10, 4, 1.1, &cfg, &mut SimRng::new(1)), Err(EpiError::Config(_))));
    }
}
