//! Core data structures for the property graph

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::identity;
use crate::value::{Properties, PropertyValue};

/// A labeled node. The id is fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: String,
    labels: BTreeSet<String>,
    properties: Properties,
}

impl Node {
    pub fn new<I, S>(id: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Node {
            id: id.into(),
            labels: labels.into_iter().map(Into::into).collect(),
            properties: Properties::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn labels(&self) -> &BTreeSet<String> {
        &self.labels
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Builder form of [`Node::set_property`].
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.set_property(key, value);
        self
    }

    /// Builder that only sets the property when a value is present.
    pub fn with_optional(self, key: &str, value: Option<impl Into<PropertyValue>>) -> Self {
        match value {
            Some(v) => self.with_property(key, v),
            None => self,
        }
    }

    /// Merge a property map over the current properties.
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties.extend(properties);
        self
    }
}

/// The identity triple of an edge: (source, joined labels, target).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    pub source: String,
    pub label: String,
    pub target: String,
}

impl EdgeKey {
    pub fn new(source: &str, label: &str, target: &str) -> Self {
        EdgeKey {
            source: source.to_string(),
            label: label.to_string(),
            target: target.to_string(),
        }
    }
}

/// A directed, weighted relationship between two node ids.
///
/// Endpoints are plain ids; whether they exist is up to whoever builds the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    id: String,
    source: String,
    target: String,
    labels: BTreeSet<String>,
    weight: u64,
    properties: Properties,
}

impl Edge {
    /// Create an edge of weight 1 whose id is derived from its identity triple.
    pub fn new<I, S>(source: impl Into<String>, target: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let source = source.into();
        let target = target.into();
        let labels: BTreeSet<String> = labels.into_iter().map(Into::into).collect();
        let id = identity::edge_id(&source, &identity::join_labels(&labels), &target);
        Edge {
            id,
            source,
            target,
            labels,
            weight: 1,
            properties: Properties::new(),
        }
    }

    /// Rebuild an edge from already-encoded parts, keeping the stored id.
    pub fn from_parts(
        id: String,
        source: String,
        target: String,
        labels: BTreeSet<String>,
        weight: u64,
        properties: Properties,
    ) -> Self {
        Edge {
            id,
            source,
            target,
            labels,
            weight,
            properties,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn labels(&self) -> &BTreeSet<String> {
        &self.labels
    }

    /// Labels joined with `,` in sorted order.
    pub fn label(&self) -> String {
        identity::join_labels(&self.labels)
    }

    pub fn weight(&self) -> u64 {
        self.weight
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(key.into(), value.into());
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.set_property(key, value);
        self
    }

    pub fn with_weight(mut self, weight: u64) -> Self {
        self.weight = weight;
        self
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey {
            source: self.source.clone(),
            label: self.label(),
            target: self.target.clone(),
        }
    }

    pub(crate) fn accumulate(&mut self, weight: u64) {
        self.weight = self.weight.saturating_add(weight);
    }
}
