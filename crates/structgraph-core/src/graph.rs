//! Graph container with id-indexed nodes and triple-indexed edges

use std::collections::HashMap;

use crate::error::GraphError;
use crate::model::*;
use crate::value::{Properties, PropertyValue};

/// The property graph. Sole owner of its nodes and edges.
///
/// Storage is insertion ordered; the hash indexes only map keys to slots.
#[derive(Clone, Default)]
pub struct Graph {
    name: String,
    metadata: Properties,
    nodes: Vec<Node>,
    node_index: HashMap<String, usize>,
    edges: Vec<Edge>,
    edge_index: HashMap<EdgeKey, usize>,
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("name", &self.name)
            .field("node_count", &self.nodes.len())
            .field("edge_count", &self.edges.len())
            .finish()
    }
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.metadata == other.metadata
            && self.nodes == other.nodes
            && self.edges == other.edges
    }
}

impl Graph {
    pub fn new(name: impl Into<String>) -> Self {
        Graph {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metadata(&self) -> &Properties {
        &self.metadata
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Add a node. Re-adding an identical node is a no-op and returns `Ok(false)`.
    pub fn add_node(&mut self, node: Node) -> Result<bool, GraphError> {
        if let Some(&slot) = self.node_index.get(node.id()) {
            if self.nodes[slot] == node {
                return Ok(false);
            }
            return Err(GraphError::ConflictingNode {
                id: node.id().to_string(),
            });
        }
        self.node_index.insert(node.id().to_string(), self.nodes.len());
        self.nodes.push(node);
        Ok(true)
    }

    /// Get a node by id.
    pub fn find_node_by_id(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&slot| &self.nodes[slot])
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// Add `weight` to the edge identified by (source, labels, target), creating it if absent.
    ///
    /// A new edge takes `extra` as its properties; an existing one keeps its own.
    pub fn add_or_accumulate(
        &mut self,
        source: &str,
        target: &str,
        labels: &[&str],
        weight: u64,
        extra: Properties,
    ) -> &Edge {
        let edge = Edge::new(source, target, labels.iter().copied()).with_weight(weight);
        let edge = extra
            .into_iter()
            .fold(edge, |edge, (key, value)| edge.with_property(key, value));
        self.insert_edge(edge)
    }

    /// Insert a fully built edge, merging into an existing one with the same key.
    pub fn insert_edge(&mut self, edge: Edge) -> &Edge {
        let key = edge.key();
        match self.edge_index.get(&key) {
            Some(&slot) => {
                self.edges[slot].accumulate(edge.weight());
                &self.edges[slot]
            }
            None => {
                let slot = self.edges.len();
                self.edge_index.insert(key, slot);
                self.edges.push(edge);
                &self.edges[slot]
            }
        }
    }

    /// Find the edge for a (source, label, target) triple.
    pub fn find_edge(&self, source: &str, label: &str, target: &str) -> Option<&Edge> {
        self.edge_index
            .get(&EdgeKey::new(source, label, target))
            .map(|&slot| &self.edges[slot])
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Iterate over all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Iterate over all edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Get all nodes carrying a label.
    pub fn nodes_with_label<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes.iter().filter(move |n| n.has_label(label))
    }

    /// Get all edges carrying a label.
    pub fn edges_with_label<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.labels().contains(label))
    }
}
