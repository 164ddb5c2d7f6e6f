//! Unit tests for ep-agent.

#[cfg(test)]
fn init(cluster: u32) -> crate::AgentInit {
    crate::AgentInit {
        age:           30,
        immunity:      0.2,
        mobility:      0.5,
        cluster:       ep_core::ClusterId(cluster),
        recovery_time: 12,
    }
}

#[cfg(test)]
fn line(n: usize) -> crate::Population {
    use ep_core::AgentId;

    let mut pop = crate::Population::with_capacity(n);
    for _ in 0..n {
        pop.push_agent(init(0));
    }
    for i in 1..n as u32 {
        pop.add_edge(AgentId(i - 1), AgentId(i));
    }
    pop
}

#[cfg(test)]
mod status {
    use crate::{HealthStatus, StatusTally};

    #[test]
    fn allowed_transitions() {
        use HealthStatus::*;
        assert!(Susceptible.can_transition_to(Infected));
        assert!(Infected.can_transition_to(Recovered));
        assert!(Infected.can_transition_to(Dead));
        assert!(!Susceptible.can_transition_to(Recovered));
        assert!(!Recovered.can_transition_to(Infected));
        assert!(!Dead.can_transition_to(Susceptible));
        assert!(!Infected.can_transition_to(Susceptible));
    }

    #[test]
    fn terminal_states() {
        assert!(HealthStatus::Recovered.is_terminal());
        assert!(HealthStatus::Dead.is_terminal());
        assert!(!HealthStatus::Infected.is_terminal());
        assert!(!HealthStatus::Dead.is_alive());
    }

    #[test]
    fn codes_and_labels() {
        let codes: String = HealthStatus::ALL.iter().map(|s| s.code()).collect();
        assert_eq!(codes, "SIRD");
        assert_eq!(HealthStatus::Recovered.to_string(), "recovered");
    }

    #[test]
    fn tally_record_moves_one_unit() {
        let mut t = StatusTally::all_susceptible(10);
        t.record(HealthStatus::Susceptible, HealthStatus::Infected).unwrap();
        t.record(HealthStatus::Infected, HealthStatus::Dead).unwrap();
        assert_eq!(t.susceptible(), 9);
        assert_eq!(t.infected(), 0);
        assert_eq!(t.dead(), 1);
        assert_eq!(t.total(), 10);
        assert_eq!(t.to_string(), "S=9 I=0 R=0 D=1");
    }

    #[test]
    fn tally_underflow_is_invariant_violation() {
        let mut t = StatusTally::all_susceptible(2);
        let err = t.record(HealthStatus::Infected, HealthStatus::Recovered).unwrap_err();
        assert!(matches!(err, ep_core::EpiError::InvariantViolation(_)));
        assert_eq!(t, StatusTally::all_susceptible(2), "failed record must not mutate");
    }

    #[test]
    fn from_statuses_counts() {
        use HealthStatus::*;
        let t = StatusTally::from_statuses([Susceptible, Infected, Infected, Dead]);
        assert_eq!((t.susceptible(), t.infected(), t.recovered(), t.dead()), (1, 2, 0, 1));
    }
}

#[cfg(test)]
mod population {
    use ep_core::{AgentId, ClusterId, EpiError, Tick};

    use super::{init, line};
    use crate::{HealthStatus, Population, StatusTally};

    #[test]
    fn push_assigns_sequential_ids() {
        let mut pop = Population::new();
        assert!(pop.is_empty());
        assert_eq!(pop.push_agent(init(0)), AgentId(0));
        assert_eq!(pop.push_agent(init(1)), AgentId(1));
        assert_eq!(pop.count, 2);
        assert_eq!(pop.cluster[1], ClusterId(1));
        assert_eq!(pop.status(AgentId(0)), HealthStatus::Susceptible);
    }

    #[test]
    fn push_clamps_attributes() {
        let mut pop = Population::new();
        let a = pop.push_agent(crate::AgentInit { age: 140, immunity: 1.5, mobility: -0.1, ..init(0) });
        let v = pop.agent(a).unwrap();
        assert_eq!(v.age, 100);
        assert_eq!(v.immunity, 1.0);
        assert_eq!(v.mobility, 0.0);
    }

    #[test]
    fn edges_are_symmetric() {
        let mut pop = line(3);
        assert!(pop.has_edge(AgentId(0), AgentId(1)));
        assert!(pop.has_edge(AgentId(1), AgentId(0)));
        assert!(!pop.add_edge(AgentId(1), AgentId(0)), "duplicate edge");
        assert!(!pop.add_edge(AgentId(2), AgentId(2)), "self-loop");
        assert!(!pop.add_edge(AgentId(2), AgentId(9)), "unknown id");
        assert_eq!(pop.edge_count(), 2);
        pop.check_invariants().unwrap();
    }

    #[test]
    fn isolate_removes_both_sides() {
        let mut pop = line(3);
        assert_eq!(pop.isolate(AgentId(1)), 2);
        assert_eq!(pop.degree(AgentId(0)), 0);
        assert_eq!(pop.degree(AgentId(2)), 0);
        assert_eq!(pop.edge_count(), 0);
    }

    #[test]
    fn infection_stamps_onset() {
        let mut pop = line(2);
        let mut tally = pop.tally();
        assert_eq!(pop.agent(AgentId(0)).unwrap().last_infected_timestep(), -1);
        pop.transition(AgentId(0), HealthStatus::Infected, Tick(3), &mut tally).unwrap();
        assert_eq!(pop.last_infected(AgentId(0)), Some(Tick(3)));
        assert_eq!(pop.agent(AgentId(0)).unwrap().last_infected_timestep(), 3);
        assert_eq!(tally.infected(), 1);
        assert_eq!(tally, pop.tally());
    }

    #[test]
    fn death_isolates_agent() {
        let mut pop = line(3);
        let mut tally = pop.tally();
        pop.transition(AgentId(1), HealthStatus::Infected, Tick(0), &mut tally).unwrap();
        pop.transition(AgentId(1), HealthStatus::Dead, Tick(5), &mut tally).unwrap();
        assert!(pop.neighbours(AgentId(1)).is_empty());
        assert!(!pop.neighbours(AgentId(0)).contains(&AgentId(1)));
        assert!(!pop.neighbours(AgentId(2)).contains(&AgentId(1)));
        assert!(!pop.add_edge(AgentId(0), AgentId(1)), "dead agents take no new edges");
        pop.check_invariants().unwrap();
    }

    #[test]
    fn terminal_states_reject_transitions() {
        let mut pop = line(2);
        let mut tally = pop.tally();
        let a = AgentId(0);
        pop.transition(a, HealthStatus::Infected, Tick(0), &mut tally).unwrap();
        pop.transition(a, HealthStatus::Recovered, Tick(9), &mut tally).unwrap();
        let err = pop.transition(a, HealthStatus::Infected, Tick(10), &mut tally).unwrap_err();
        assert!(matches!(err, EpiError::InvariantViolation(_)));
        assert_eq!(pop.status(a), HealthStatus::Recovered);
        assert_eq!(pop.last_infected(a), Some(Tick(0)), "onset unchanged");
        assert_eq!(tally, pop.tally());
    }

    #[test]
    fn unknown_agent_transition_fails() {
        let mut pop = line(1);
        let mut tally = StatusTally::all_susceptible(1);
        let err = pop
            .transition(AgentId(5), HealthStatus::Infected, Tick(0), &mut tally)
            .unwrap_err();
        assert!(matches!(err, EpiError::AgentNotFound(AgentId(5))));
        assert!(pop.agent(AgentId(5)).is_none());
    }

    #[test]
    fn ids_with_status_ascending() {
        let mut pop = line(4);
        let mut tally = pop.tally();
        pop.transition(AgentId(3), HealthStatus::Infected, Tick(0), &mut tally).unwrap();
        pop.transition(AgentId(1), HealthStatus::Infected, Tick(0), &mut tally).unwrap();
        assert_eq!(pop.ids_with_status(HealthStatus::Infected), vec![AgentId(1), AgentId(3)]);
    }
}

#[cfg(test)]
mod rngs {
    use ep_core::AgentId;

    use crate::AgentRngs;

    #[test]
    fn correct_count() {
        let rngs = AgentRngs::new(500, 1);
        assert_eq!(rngs.len(), 500);
        assert!(AgentRngs::new(0, 1).is_empty());
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = AgentRngs::new(4, 99);
        let mut b = AgentRngs::new(4, 99);
        let x: u64 = a.get_mut(AgentId(2)).random();
        let y: u64 = b.get_mut(AgentId(2)).random();
        assert_eq!(x, y);
    }
}
