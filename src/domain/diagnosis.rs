//! Node set diagnostics
//!
//! Collects every problem in a node set at once instead of stopping at the
//! first one like resolution does.

use serde::Serialize;
use std::collections::HashSet;

use super::graph::{DependencyGraph, UnknownDependencies};
use super::node::Node;

/// A dependency name that matches no node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownReference {
    pub node: String,
    pub dependency: String,
}

/// Problems found in a node set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnosis {
    /// Names declared more than once, in first-repeat order
    pub duplicates: Vec<String>,

    /// Dependency names with no matching node
    pub unknown: Vec<UnknownReference>,

    /// Dependency cycles, members in input order
    pub cycles: Vec<Vec<String>>,
}

impl Diagnosis {
    /// Diagnoses a node set
    ///
    /// Later nodes sharing a name with an earlier one are ignored for the
    /// unknown and cycle checks.
    pub fn of(nodes: &[Node]) -> Self {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        let mut unique = Vec::with_capacity(nodes.len());

        for node in nodes {
            if seen.insert(node.name.as_str()) {
                unique.push(node.clone());
            } else if !duplicates.contains(&node.name) {
                duplicates.push(node.name.clone());
            }
        }

        let graph = match DependencyGraph::from_nodes(&unique, UnknownDependencies::Block) {
            Ok(graph) => graph,
            // Names are unique and unknown names only block
            Err(_) => return Self { duplicates, ..Self::default() },
        };

        let unknown = graph
            .unknown_dependencies()
            .into_iter()
            .map(|(node, dependency)| UnknownReference { node, dependency })
            .collect();

        Self {
            duplicates,
            unknown,
            cycles: graph.cycles(),
        }
    }

    /// Returns true if nothing was found
    pub fn is_clean(&self) -> bool {
        self.duplicates.is_empty() && self.unknown.is_empty() && self.cycles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_set() {
        let nodes = vec![Node::leaf("A"), Node::new("B", ["A"])];
        let diagnosis = Diagnosis::of(&nodes);
        assert!(diagnosis.is_clean());
    }

    #[test]
    fn empty_set_is_clean() {
        assert!(Diagnosis::of(&[]).is_clean());
    }

    #[test]
    fn collects_every_problem() {
        let nodes = vec![
            Node::leaf("A"),
            Node::new("B", ["A", "D"]),
            Node::new("A", ["Q"]),
            Node::new("D", ["B", "ghost"]),
            Node::leaf("A"),
        ];
        let diagnosis = Diagnosis::of(&nodes);

        assert!(!diagnosis.is_clean());
        assert_eq!(diagnosis.duplicates, vec!["A"]);
        assert_eq!(
            diagnosis.unknown,
            vec![UnknownReference {
                node: "D".into(),
                dependency: "ghost".into()
            }]
        );
        assert_eq!(diagnosis.cycles, vec![vec!["B".to_string(), "D".to_string()]]);
    }
}
