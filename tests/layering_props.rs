//! Property tests for layer resolution
//!
//! Random acyclic node sets are built by letting each node depend only on
//! nodes generated before it, then shuffling the input order.

use std::collections::HashMap;

use dep_layers::{resolve, LayerError, Node};
use proptest::prelude::*;
use proptest::sample::Index;

/// Acyclic node set in shuffled input order
fn acyclic_nodes() -> impl Strategy<Value = Vec<Node>> {
    (1usize..40)
        .prop_flat_map(|len| {
            (
                Just(len),
                prop::collection::vec(prop::collection::vec(any::<Index>(), 0..4), len),
            )
        })
        .prop_map(|(len, picks)| {
            (0..len)
                .map(|i| {
                    let deps: Vec<String> = if i == 0 {
                        vec![]
                    } else {
                        picks[i].iter().map(|p| format!("n{}", p.index(i))).collect()
                    };
                    Node::new(format!("n{}", i), deps)
                })
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
}

/// Earliest possible layer per node, computed recursively
fn expected_depth(nodes: &[Node]) -> HashMap<String, usize> {
    fn depth(
        name: &str,
        by_name: &HashMap<&str, &Node>,
        memo: &mut HashMap<String, usize>,
    ) -> usize {
        if let Some(&d) = memo.get(name) {
            return d;
        }
        let node = by_name[name];
        let d = node
            .dependencies
            .iter()
            .map(|dep| depth(dep, by_name, memo) + 1)
            .max()
            .unwrap_or(0);
        memo.insert(name.to_string(), d);
        d
    }

    let by_name: HashMap<&str, &Node> = nodes.iter().map(|n| (n.name.as_str(), n)).collect();
    let mut memo = HashMap::new();
    for node in nodes {
        depth(&node.name, &by_name, &mut memo);
    }
    memo
}

proptest! {
    #[test]
    fn every_node_placed_once(nodes in acyclic_nodes()) {
        let solution = resolve(&nodes).unwrap();
        prop_assert_eq!(solution.node_count(), nodes.len());

        let mut seen: Vec<&str> = solution.flatten().into_iter().map(|n| n.name.as_str()).collect();
        seen.sort_unstable();
        seen.dedup();
        prop_assert_eq!(seen.len(), nodes.len());
    }

    #[test]
    fn dependencies_sit_in_earlier_layers(nodes in acyclic_nodes()) {
        let solution = resolve(&nodes).unwrap();
        for node in &nodes {
            let layer = solution.layer_of(&node.name).unwrap();
            for dep in &node.dependencies {
                prop_assert!(solution.layer_of(dep).unwrap() < layer);
            }
        }
    }

    #[test]
    fn nodes_sit_in_earliest_layer(nodes in acyclic_nodes()) {
        let solution = resolve(&nodes).unwrap();
        let expected = expected_depth(&nodes);
        for node in &nodes {
            prop_assert_eq!(solution.layer_of(&node.name), Some(expected[&node.name]));
        }
    }

    #[test]
    fn layers_keep_input_order(nodes in acyclic_nodes()) {
        let solution = resolve(&nodes).unwrap();
        let position: HashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.name.as_str(), i))
            .collect();

        for layer in &solution {
            let order: Vec<usize> = layer.iter().map(|n| position[n.name.as_str()]).collect();
            prop_assert!(order.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn back_edge_creates_cycle(nodes in acyclic_nodes()) {
        // Make the first node depend on every other node, including itself
        let mut nodes = nodes;
        let all: Vec<String> = nodes.iter().map(|n| n.name.clone()).collect();
        nodes[0].dependencies = all;

        let err = resolve(&nodes).unwrap_err();
        let unplaced = match &err {
            LayerError::Cycle { unplaced } => unplaced.clone(),
            other => panic!("expected cycle, got {other:?}"),
        };
        prop_assert!(unplaced.contains(&nodes[0].name));
    }
}

#[test]
fn documented_scenarios() {
    let nodes: Vec<Node> = ["A", "B", "C: A, B", "D: C", "E: A, D", "F: B", "G: F"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    let solution = resolve(&nodes).unwrap();
    let layers: Vec<Vec<&str>> = solution.iter().map(|l| l.names()).collect();
    assert_eq!(
        layers,
        vec![vec!["A", "B"], vec!["C", "F"], vec!["D", "G"], vec!["E"]]
    );

    let nodes: Vec<Node> = ["A", "B: A, D", "C: A, B", "D: B"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    assert!(matches!(resolve(&nodes), Err(LayerError::Cycle { .. })));
}
