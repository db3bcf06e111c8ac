//! Multiplicity-aware edge aggregation
//!
//! Extraction collects every reference a member makes for one relationship,
//! counts repeats in a single grouping pass and only then touches the graph,
//! once per distinct target.

use std::collections::HashMap;

use crate::graph::Graph;
use crate::value::Properties;

/// Pending edges sharing one (source, label) pair.
#[derive(Debug)]
pub struct EdgeBatch {
    source: String,
    label: String,
    order: Vec<String>,
    tallies: HashMap<String, (u64, Properties)>,
}

impl EdgeBatch {
    pub fn new(source: impl Into<String>, label: impl Into<String>) -> Self {
        EdgeBatch {
            source: source.into(),
            label: label.into(),
            order: Vec::new(),
            tallies: HashMap::new(),
        }
    }

    /// Count one reference to `target`.
    pub fn push(&mut self, target: impl Into<String>) {
        self.push_with(target, Properties::new());
    }

    /// Count one reference to `target`; `properties` only matter on first sight.
    pub fn push_with(&mut self, target: impl Into<String>, properties: Properties) {
        let target = target.into();
        let order = &mut self.order;
        let tally = self.tallies.entry(target).or_insert_with_key(|target| {
            order.push(target.clone());
            (0, properties)
        });
        tally.0 += 1;
    }

    /// Number of distinct targets collected so far.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Count for a target, 0 when it was never pushed.
    pub fn count(&self, target: &str) -> u64 {
        self.tallies.get(target).map_or(0, |(count, _)| *count)
    }

    /// Write one weighted edge per distinct target, in first-seen order.
    pub fn flush(mut self, graph: &mut Graph) -> usize {
        let written = self.order.len();
        for target in self.order {
            if let Some((count, properties)) = self.tallies.remove(&target) {
                graph.add_or_accumulate(&self.source, &target, &[self.label.as_str()], count, properties);
            }
        }
        if written > 0 {
            tracing::trace!("{} -[{}]-> {} targets", self.source, self.label, written);
        }
        written
    }
}
