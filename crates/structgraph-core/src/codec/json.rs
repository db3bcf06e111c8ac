//! Cytoscape-style JSON codec
//!
//! ```json
//! { "data": { "name": "...", "properties": { } },
//!   "elements": {
//!     "nodes": [ { "data": { "id": "...", "labels": [], "properties": { } } } ],
//!     "edges": [ { "data": { "id": "...", "source": "...", "target": "...",
//!                            "labels": [], "properties": { "weight": 1 } } } ] } }
//! ```
//!
//! The only codec with a decoder; `decode(encode(g)) == g`. Graphs that could
//! not survive that trip (non-finite floats, an edge property named `weight`)
//! fail to encode.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{GraphCodec, OutputFormat, output_path, write_file};
use crate::error::CodecError;
use crate::graph::Graph;
use crate::model::{Edge, Node};
use crate::value::{Properties, PropertyValue};

/// Edge weight travels inside the property map under this key.
const WEIGHT_KEY: &str = "weight";

#[derive(Debug, Serialize, Deserialize)]
struct CyDocument {
    #[serde(default)]
    data: CyGraphData,
    elements: CyElements,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CyGraphData {
    #[serde(default)]
    name: String,
    #[serde(default)]
    properties: Properties,
}

#[derive(Debug, Serialize, Deserialize)]
struct CyElements {
    #[serde(default)]
    nodes: Vec<CyElement<CyNode>>,
    #[serde(default)]
    edges: Vec<CyElement<CyEdge>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CyElement<T> {
    data: T,
}

#[derive(Debug, Serialize, Deserialize)]
struct CyNode {
    id: String,
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default)]
    properties: Properties,
}

#[derive(Debug, Serialize, Deserialize)]
struct CyEdge {
    id: String,
    source: String,
    target: String,
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default)]
    properties: Properties,
}

fn is_finite(value: &PropertyValue) -> bool {
    match value {
        PropertyValue::Float(x) => x.is_finite(),
        PropertyValue::List(items) => items.iter().all(is_finite),
        _ => true,
    }
}

/// JSON has no NaN or infinity; serde_json would write `null`.
fn check_finite(properties: &Properties, owner: &str) -> Result<(), CodecError> {
    match properties.iter().find(|(_, value)| !is_finite(value)) {
        Some((key, value)) => Err(CodecError::Unencodable(format!(
            "{owner}: property `{key}` is {value}"
        ))),
        None => Ok(()),
    }
}

pub struct CyJsonCodec;

impl CyJsonCodec {
    fn encode_node(node: &Node) -> Result<CyElement<CyNode>, CodecError> {
        check_finite(node.properties(), &format!("node `{}`", node.id()))?;
        Ok(CyElement {
            data: CyNode {
                id: node.id().to_string(),
                labels: node.labels().iter().cloned().collect(),
                properties: node.properties().clone(),
            },
        })
    }

    fn encode_edge(edge: &Edge) -> Result<CyElement<CyEdge>, CodecError> {
        let owner = format!("edge `{}`", edge.id());
        check_finite(edge.properties(), &owner)?;
        if edge.properties().contains_key(WEIGHT_KEY) {
            return Err(CodecError::Unencodable(format!(
                "{owner}: property `{WEIGHT_KEY}` collides with the edge weight"
            )));
        }
        let mut properties = edge.properties().clone();
        properties.insert(WEIGHT_KEY.to_string(), PropertyValue::from(edge.weight()));
        Ok(CyElement {
            data: CyEdge {
                id: edge.id().to_string(),
                source: edge.source().to_string(),
                target: edge.target().to_string(),
                labels: edge.labels().iter().cloned().collect(),
                properties,
            },
        })
    }

    fn decode_node(element: CyElement<CyNode>) -> Node {
        let CyNode { id, labels, properties } = element.data;
        properties
            .into_iter()
            .fold(Node::new(id, labels), |node, (key, value)| node.with_property(key, value))
    }

    fn decode_edge(element: CyElement<CyEdge>) -> Result<Edge, CodecError> {
        let CyEdge {
            id,
            source,
            target,
            labels,
            mut properties,
        } = element.data;
        let weight = match properties.remove(WEIGHT_KEY) {
            None => 1,
            Some(PropertyValue::Int(w)) if w >= 0 => w as u64,
            Some(other) => {
                return Err(CodecError::Malformed(format!("edge `{id}` has invalid weight `{other}`")));
            }
        };
        Ok(Edge::from_parts(
            id,
            source,
            target,
            labels.into_iter().collect(),
            weight,
            properties,
        ))
    }

    /// Rebuild a graph from its JSON encoding.
    pub fn decode(&self, input: &str) -> Result<Graph, CodecError> {
        let doc: CyDocument = serde_json::from_str(input)?;

        let mut graph = Graph::new(doc.data.name);
        for (key, value) in doc.data.properties {
            graph.set_metadata(key, value);
        }
        for element in doc.elements.nodes {
            graph.add_node(Self::decode_node(element))?;
        }
        for element in doc.elements.edges {
            graph.insert_edge(Self::decode_edge(element)?);
        }
        tracing::debug!(
            "Decoded {} nodes, {} edges from JSON",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }
}

impl GraphCodec for CyJsonCodec {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn encode(&self, graph: &Graph) -> Result<String, CodecError> {
        check_finite(graph.metadata(), "graph")?;
        let doc = CyDocument {
            data: CyGraphData {
                name: graph.name().to_string(),
                properties: graph.metadata().clone(),
            },
            elements: CyElements {
                nodes: graph.nodes().map(Self::encode_node).collect::<Result<_, _>>()?,
                edges: graph.edges().map(Self::encode_edge).collect::<Result<_, _>>()?,
            },
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    fn write_to_dir(&self, graph: &Graph, dir: &Path, base_name: &str) -> Result<Vec<PathBuf>, CodecError> {
        let encoded = self.encode(graph)?;
        let path = write_file(output_path(dir, base_name, ".json"), &encoded)?;
        Ok(vec![path])
    }
}
