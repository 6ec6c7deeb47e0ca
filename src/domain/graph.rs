//! Dependency graph and layer resolution
//!
//! Builds a petgraph graph from a node set and peels it into layers with
//! in-degree counting. A node lands in the earliest layer whose predecessors
//! cover all of its dependencies, so layer `i` only depends on layers `< i`.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use super::node::Node;
use super::solution::{Layer, Solution};

#[derive(Debug, Error, PartialEq)]
pub enum LayerError {
    #[error("Dependency cycle: unable to place {}", .unplaced.join(", "))]
    Cycle { unplaced: Vec<String> },

    #[error("Duplicate node name: {0}")]
    DuplicateNode(String),

    #[error("Node {node} depends on unknown node {dependency}")]
    UnknownDependency { node: String, dependency: String },
}

impl LayerError {
    /// Returns the names that could not be placed, for cycle errors
    pub fn unplaced(&self) -> &[String] {
        match self {
            LayerError::Cycle { unplaced } => unplaced,
            _ => &[],
        }
    }
}

/// How to treat dependency names that match no node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownDependencies {
    /// The referencing node can never be placed and ends up in the cycle error
    #[default]
    Block,
    /// Fail before resolving
    Reject,
}

impl UnknownDependencies {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnknownDependencies::Block => "block",
            UnknownDependencies::Reject => "reject",
        }
    }
}

/// A dependency graph over named nodes
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// Edge direction is dependency -> dependent
    graph: DiGraph<Node, ()>,

    /// Map from node name to node index
    node_map: HashMap<String, NodeIndex>,

    /// Unmatched dependency names, indexed like the graph nodes
    unknown: Vec<Vec<String>>,
}

impl DependencyGraph {
    /// Builds a graph from a node set
    ///
    /// Node indices follow input order. Repeated entries in a dependency list
    /// count once.
    pub fn from_nodes(nodes: &[Node], policy: UnknownDependencies) -> Result<Self, LayerError> {
        let mut graph = Self::default();

        // First pass: add all nodes
        for node in nodes {
            if graph.node_map.contains_key(&node.name) {
                return Err(LayerError::DuplicateNode(node.name.clone()));
            }
            let idx = graph.graph.add_node(node.clone());
            graph.node_map.insert(node.name.clone(), idx);
            graph.unknown.push(vec![]);
        }

        // Second pass: add all edges
        for node in nodes {
            let idx = graph.node_map[&node.name];
            let mut seen = HashSet::new();

            for dep in &node.dependencies {
                if !seen.insert(dep.as_str()) {
                    continue;
                }

                match graph.node_map.get(dep) {
                    Some(&dep_idx) => {
                        graph.graph.add_edge(dep_idx, idx, ());
                    }
                    None if policy == UnknownDependencies::Reject => {
                        return Err(LayerError::UnknownDependency {
                            node: node.name.clone(),
                            dependency: dep.clone(),
                        });
                    }
                    None => {
                        tracing::debug!(node = %node.name, dependency = %dep, "unknown dependency blocks node");
                        graph.unknown[idx.index()].push(dep.clone());
                    }
                }
            }
        }

        Ok(graph)
    }

    /// Peels the graph into layers
    ///
    /// Fails with [`LayerError::Cycle`] when nodes remain that can never
    /// become ready, listing them in input order.
    pub fn resolve(&self) -> Result<Solution, LayerError> {
        // Unsatisfied dependencies per node
        let mut pending: Vec<usize> = self
            .graph
            .node_indices()
            .map(|idx| {
                self.graph.edges_directed(idx, Direction::Incoming).count()
                    + self.unknown[idx.index()].len()
            })
            .collect();

        let mut frontier: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|idx| pending[idx.index()] == 0)
            .collect();

        let mut layers = Vec::new();
        let mut placed = 0;

        while !frontier.is_empty() {
            let mut next = Vec::new();
            for &idx in &frontier {
                for dependent in self.graph.neighbors_directed(idx, Direction::Outgoing) {
                    let count = &mut pending[dependent.index()];
                    *count -= 1;
                    if *count == 0 {
                        next.push(dependent);
                    }
                }
            }
            // Indices follow input order
            next.sort_unstable();

            placed += frontier.len();
            let layer = Layer::new(frontier.iter().map(|&idx| self.graph[idx].clone()).collect());
            tracing::debug!(index = layers.len(), size = layer.len(), "committed layer");
            layers.push(layer);

            frontier = next;
        }

        if placed < self.graph.node_count() {
            let unplaced: Vec<String> = self
                .graph
                .node_indices()
                .filter(|idx| pending[idx.index()] > 0)
                .map(|idx| self.graph[idx].name.clone())
                .collect();
            tracing::debug!(count = unplaced.len(), "resolution stalled");
            return Err(LayerError::Cycle { unplaced });
        }

        Ok(Solution::new(layers))
    }

    /// Returns the dependency cycles in the graph
    ///
    /// Each cycle lists its members in input order; self-dependencies count
    /// as cycles of one.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut components: Vec<Vec<NodeIndex>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| {
                scc.len() > 1 || self.graph.find_edge(scc[0], scc[0]).is_some()
            })
            .map(|mut scc| {
                scc.sort_unstable();
                scc
            })
            .collect();
        components.sort_unstable_by_key(|scc| scc[0]);

        components
            .into_iter()
            .map(|scc| scc.into_iter().map(|idx| self.graph[idx].name.clone()).collect())
            .collect()
    }

    /// Returns `(node, dependency)` pairs whose dependency matches no node
    pub fn unknown_dependencies(&self) -> Vec<(String, String)> {
        self.graph
            .node_indices()
            .flat_map(|idx| {
                let name = &self.graph[idx].name;
                self.unknown[idx.index()]
                    .iter()
                    .map(move |dep| (name.clone(), dep.clone()))
            })
            .collect()
    }

    /// Returns the direct dependencies of a node that are in the graph
    pub fn dependencies(&self, name: &str) -> Vec<&str> {
        self.neighbors(name, Direction::Incoming)
    }

    /// Returns the nodes that depend directly on `name`
    pub fn dependents(&self, name: &str) -> Vec<&str> {
        self.neighbors(name, Direction::Outgoing)
    }

    fn neighbors(&self, name: &str, direction: Direction) -> Vec<&str> {
        let idx = match self.node_map.get(name) {
            Some(idx) => *idx,
            None => return vec![],
        };

        let mut found: Vec<NodeIndex> = self.graph.neighbors_directed(idx, direction).collect();
        found.sort_unstable();
        found
            .into_iter()
            .map(|idx| self.graph[idx].name.as_str())
            .collect()
    }

    /// Returns true if the graph contains the node
    pub fn contains(&self, name: &str) -> bool {
        self.node_map.contains_key(name)
    }

    /// Returns the number of nodes in the graph
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns true if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}

/// Resolves nodes into layers, blocking on unknown dependency names
pub fn resolve(nodes: &[Node]) -> Result<Solution, LayerError> {
    resolve_with(nodes, UnknownDependencies::default())
}

/// Resolves nodes into layers with an explicit unknown-dependency policy
pub fn resolve_with(nodes: &[Node], policy: UnknownDependencies) -> Result<Solution, LayerError> {
    DependencyGraph::from_nodes(nodes, policy)?.resolve()
}
