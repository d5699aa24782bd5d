use agtron_core::{Constraint, ErrorCode, System};
use proptest::prelude::*;

use generators::*;

const MAX_NODES: usize = 8;

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(512))]

    #[test]
    fn random_dags_validate(dag in arb_dag(MAX_NODES)) {
        let system = System::new(Vec::new(), dag.constraints.clone()).expect("dag is acyclic");
        prop_assert!(system.is_acyclic());
        prop_assert!(system.is_valid());
    }

    #[test]
    fn closing_a_reachable_pair_is_a_cycle(dag in arb_dag(MAX_NODES)) {
        let reach = dag.reachability();
        for (i, row) in reach.iter().enumerate() {
            for (j, &reachable) in row.iter().enumerate() {
                if !reachable {
                    continue;
                }
                let mut constraints = dag.constraints.clone();
                constraints.push(
                    Constraint::hard(dag.nodes[j].clone(), dag.nodes[i].clone()).expect("distinct"),
                );
                let err = System::new(Vec::new(), constraints).expect_err("closing edge");
                prop_assert_eq!(err.code(), ErrorCode::CyclicDependency);
            }
        }
    }

    #[test]
    fn direct_implies_indirect_and_self_is_never_indirect(dag in arb_dag(MAX_NODES)) {
        let system = System::new(Vec::new(), dag.constraints.clone()).expect("dag is acyclic");
        for a in &dag.nodes {
            prop_assert!(!system.indirect_constraint_exists(a, a));
            prop_assert!(system.constraint_path(a, a).is_empty());
            for b in &dag.nodes {
                if system.direct_constraint_exists(a, b) {
                    prop_assert!(system.indirect_constraint_exists(a, b));
                }
            }
        }
    }

    #[test]
    fn indirect_matches_reachability(dag in arb_dag(MAX_NODES)) {
        let system = System::new(Vec::new(), dag.constraints.clone()).expect("dag is acyclic");
        let reach = dag.reachability();
        for (i, a) in dag.nodes.iter().enumerate() {
            for (j, b) in dag.nodes.iter().enumerate() {
                prop_assert_eq!(system.indirect_constraint_exists(a, b), reach[i][j]);
                // Every path fits the length bound at this size.
                prop_assert_eq!(!system.constraint_path(a, b).is_empty(), reach[i][j]);
            }
        }
    }

    #[test]
    fn paths_are_simple_bounded_and_follow_edges(dag in arb_dag(MAX_NODES)) {
        let system = System::new(Vec::new(), dag.constraints.clone()).expect("dag is acyclic");
        let origin = &dag.nodes[0];
        let target = &dag.nodes[dag.nodes.len() - 1];
        let found = system.constraint_path(origin, target);

        for path in found.paths() {
            prop_assert!(path.len() >= 2);
            prop_assert!(path.len() <= agtron_core::graph::MAX_PATH_LEN);
            prop_assert_eq!(&path[0], origin);
            prop_assert_eq!(&path[path.len() - 1], target);

            let mut seen = std::collections::HashSet::new();
            for node in path {
                prop_assert!(seen.insert(node), "repeated node {} in {:?}", node, path);
            }
            for pair in path.windows(2) {
                prop_assert!(system.direct_constraint_exists(&pair[0], &pair[1]));
            }
        }

        let unique: std::collections::HashSet<&[String]> = found.paths().into_iter().collect();
        prop_assert_eq!(unique.len(), found.path_count());
    }

    #[test]
    fn chain_paths_respect_the_length_bound(len in 2usize..16) {
        let nodes: Vec<String> = (0..len).map(node_name).collect();
        let constraints: Vec<Constraint> = nodes
            .windows(2)
            .map(|pair| Constraint::hard(pair[0].clone(), pair[1].clone()).expect("distinct"))
            .collect();
        let system = System::new(Vec::new(), constraints).expect("chain is acyclic");

        let found = system.constraint_path(&nodes[0], &nodes[len - 1]);
        prop_assert_eq!(found.path_count(), usize::from(len <= agtron_core::graph::MAX_PATH_LEN));
        prop_assert!(system.indirect_constraint_exists(&nodes[0], &nodes[len - 1]));
    }

    #[test]
    fn availability_fails_iff_a_dependency_is_less_available(
        dag in arb_dag(MAX_NODES),
        availabilities in arb_availabilities(MAX_NODES),
    ) {
        let reach = dag.reachability();
        let expected_violation = reach.iter().enumerate().any(|(i, row)| {
            row.iter().enumerate().any(|(j, &reachable)| {
                reachable
                    && matches!(
                        (availabilities[i], availabilities[j]),
                        (Some(component), Some(dependency)) if dependency < component
                    )
            })
        });

        let result = System::new(components(&dag.nodes, &availabilities), dag.constraints.clone());
        prop_assert_eq!(result.is_err(), expected_violation);
        if let Err(err) = result {
            prop_assert_eq!(err.code(), ErrorCode::AvailabilityConstraintViolation);
        }
    }

    #[test]
    fn isolated_identifiers_get_the_default_range(dag in arb_dag(MAX_NODES)) {
        let system = System::new(Vec::new(), dag.constraints.clone()).expect("dag is acyclic");
        let range = system.recommend_availability_range("not-in-graph");
        prop_assert_eq!(range.min, 0.0);
        prop_assert_eq!(range.max, 100.0);
    }
}
