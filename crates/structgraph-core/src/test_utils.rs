//! Test utilities for StructGraph

use crate::graph::Graph;
use crate::model::Node;
use crate::value::Properties;

/// A small graph exercising every property value shape.
///
/// `node1 -[relates]-> node2` with weight 3.
pub fn sample_graph() -> Graph {
    let mut graph = Graph::new("G");
    graph.set_metadata("schemaVersion", "2.0");

    graph
        .add_node(
            Node::new("node1", ["label1", "label2"])
                .with_property("strProp", "value1")
                .with_property("numProp", 2)
                .with_property("boolProp", true)
                .with_property("listProp", vec!["a", "b"])
                .with_property("ratio", 0.5),
        )
        .unwrap();
    graph
        .add_node(
            Node::new("node2", ["label1"])
                .with_property("strProp", "one, two")
                .with_property("quote", "say \"hi\""),
        )
        .unwrap();

    let mut extra = Properties::new();
    extra.insert("kind".to_string(), "strong".into());
    graph.add_or_accumulate("node1", "node2", &["relates"], 3, extra);

    graph
}

/// A graph with `count` unlabeled nodes and no edges.
pub fn graph_with_nodes(count: usize) -> Graph {
    let mut graph = Graph::new("nodes");
    for i in 0..count {
        graph.add_node(Node::new(format!("n{i}"), ["Structure"])).unwrap();
    }
    graph
}
