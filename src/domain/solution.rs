//! Layered resolution results

use serde::Serialize;
use std::fmt;

use super::node::Node;

/// Nodes that can be placed in the same step
///
/// Nodes keep their relative input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Layer {
    nodes: Vec<Node>,
}

impl Layer {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns the node names in layer order
    pub fn names(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.iter().any(|n| n.name == name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", node)?;
        }
        write!(f, "]")
    }
}

impl<'a> IntoIterator for &'a Layer {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// The full resolution: layer `i` depends only on layers before it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Solution {
    layers: Vec<Layer>,
}

impl Solution {
    pub fn new(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Number of layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Total number of placed nodes
    pub fn node_count(&self) -> usize {
        self.layers.iter().map(Layer::len).sum()
    }

    /// Returns the index of the layer holding `name`
    pub fn layer_of(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|layer| layer.contains(name))
    }

    /// Returns all nodes in a valid dependency order
    pub fn flatten(&self) -> Vec<&Node> {
        self.layers.iter().flat_map(Layer::iter).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Layer> {
        self.layers.iter()
    }

    pub fn into_layers(self) -> Vec<Layer> {
        self.layers
    }
}

/// One line per layer: `{index}: [{node}, ...]`
impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, layer) in self.layers.iter().enumerate() {
            writeln!(f, "{}: {}", i, layer)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Solution {
    type Item = &'a Layer;
    type IntoIter = std::slice::Iter<'a, Layer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}
