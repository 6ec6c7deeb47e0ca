//! Node domain model
//!
//! A node is a named unit of work with an ordered list of prerequisite names.
//! Nodes can be written inline as `name: dep1, dep2`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum NodeParseError {
    #[error("Node name is empty in '{0}'")]
    EmptyName(String),

    #[error("Invalid node name '{0}': names may not contain ':' or ','")]
    InvalidName(String),

    #[error("Empty dependency name in '{0}'")]
    EmptyDependency(String),
}

/// A named node with the names it depends on
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    /// Unique name within a single resolution
    pub name: String,

    /// Names of nodes that must be placed first
    #[serde(default, alias = "depends_on")]
    pub dependencies: Vec<String>,
}

impl Node {
    /// Creates a node from a name and its dependency names
    pub fn new<I, S>(name: impl Into<String>, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            dependencies: dependencies.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a node without dependencies
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dependencies: vec![],
        }
    }

    /// Returns true if the node has no dependencies
    pub fn is_leaf(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// Returns true if this node lists `name` as a dependency
    pub fn depends_on(&self, name: &str) -> bool {
        self.dependencies.iter().any(|d| d == name)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [{}]", self.name, self.dependencies.join(", "))
    }
}

impl FromStr for Node {
    type Err = NodeParseError;

    /// Parses `name`, `name:` or `name: dep1, dep2`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, deps) = match s.split_once(':') {
            Some((name, deps)) => (name.trim(), deps.trim()),
            None => (s, ""),
        };

        if name.is_empty() {
            return Err(NodeParseError::EmptyName(s.to_string()));
        }
        if name.contains(',') {
            return Err(NodeParseError::InvalidName(name.to_string()));
        }

        // Accept the rendered form `name: [a, b]` as well
        let deps = deps
            .strip_prefix('[')
            .and_then(|d| d.strip_suffix(']'))
            .unwrap_or(deps)
            .trim();

        let mut dependencies = Vec::new();
        if !deps.is_empty() {
            for dep in deps.split(',') {
                let dep = dep.trim();
                if dep.is_empty() {
                    return Err(NodeParseError::EmptyDependency(s.to_string()));
                }
                if dep.contains(':') {
                    return Err(NodeParseError::InvalidName(dep.to_string()));
                }
                dependencies.push(dep.to_string());
            }
        }

        Ok(Self {
            name: name.to_string(),
            dependencies,
        })
    }
}
