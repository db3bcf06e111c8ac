//! GraphML codec
//!
//! GraphML wants every `<data key>` declared up front, so encoding scans all
//! elements for property names before the graph body is written.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{GraphCodec, OutputFormat, output_path, write_file};
use crate::error::CodecError;
use crate::graph::Graph;
use crate::model::{Edge, Node};
use crate::value::Properties;

const GRAPHML_NS: &str = "http://graphml.graphdrawing.org/xmlns";
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
const SCHEMA_LOCATION: &str =
    "http://graphml.graphdrawing.org/xmlns http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd";

/// Dedicated attribute, declared once per element type and never taken from properties.
const LABELS_KEY: &str = "labels";
const WEIGHT_KEY: &str = "weight";

/// Escape text for XML content and attribute values.
pub fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Key id for an attribute of an element type, e.g. `node_kind`.
fn key_id(domain: &str, name: &str) -> String {
    format!("{domain}_{name}")
}

/// Distinct property names and their `attr.type`, sorted by name.
///
/// Mixed integer/float columns widen to `double`; any other mix is `string`.
fn collect_keys<'a>(
    maps: impl Iterator<Item = &'a Properties>,
    reserved: &[&str],
) -> BTreeMap<String, &'static str> {
    let mut keys: BTreeMap<String, &'static str> = BTreeMap::new();
    for (name, value) in maps.flat_map(|m| m.iter()) {
        if reserved.contains(&name.as_str()) {
            continue;
        }
        let ty = value.xml_type();
        keys.entry(name.clone())
            .and_modify(|current| {
                *current = match (*current, ty) {
                    (a, b) if a == b => a,
                    ("long", "double") | ("double", "long") => "double",
                    _ => "string",
                }
            })
            .or_insert(ty);
    }
    keys
}

pub struct GraphMlCodec;

impl GraphMlCodec {
    fn push_key(out: &mut String, domain: &str, name: &str, ty: &str) {
        out.push_str(&format!(
            "  <key id=\"{}\" for=\"{}\" attr.name=\"{}\" attr.type=\"{}\"/>\n",
            xml_escape(&key_id(domain, name)),
            domain,
            xml_escape(name),
            ty
        ));
    }

    fn push_data(out: &mut String, indent: &str, domain: &str, name: &str, value: &str) {
        out.push_str(&format!(
            "{indent}<data key=\"{}\">{}</data>\n",
            xml_escape(&key_id(domain, name)),
            xml_escape(value)
        ));
    }

    fn push_properties(out: &mut String, domain: &str, properties: &Properties, reserved: &[&str]) {
        for (name, value) in properties {
            if reserved.contains(&name.as_str()) {
                continue;
            }
            Self::push_data(out, "      ", domain, name, &value.to_string());
        }
    }

    fn push_node(out: &mut String, node: &Node) {
        let labels = node
            .labels()
            .iter()
            .map(|l| format!(":{l}"))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&format!(
            "    <node id=\"{}\" labels=\"{}\">\n",
            xml_escape(node.id()),
            xml_escape(&labels)
        ));
        Self::push_data(out, "      ", "node", LABELS_KEY, &labels);
        Self::push_properties(out, "node", node.properties(), &[LABELS_KEY]);
        out.push_str("    </node>\n");
    }

    fn push_edge(out: &mut String, edge: &Edge) {
        let labels = edge.label();
        out.push_str(&format!(
            "    <edge id=\"{}\" source=\"{}\" target=\"{}\" labels=\"{}\">\n",
            xml_escape(edge.id()),
            xml_escape(edge.source()),
            xml_escape(edge.target()),
            xml_escape(&labels)
        ));
        Self::push_data(out, "      ", "edge", LABELS_KEY, &labels);
        Self::push_data(out, "      ", "edge", WEIGHT_KEY, &edge.weight().to_string());
        Self::push_properties(out, "edge", edge.properties(), &[LABELS_KEY, WEIGHT_KEY]);
        out.push_str("    </edge>\n");
    }
}

impl GraphCodec for GraphMlCodec {
    fn format(&self) -> OutputFormat {
        OutputFormat::GraphMl
    }

    fn encode(&self, graph: &Graph) -> Result<String, CodecError> {
        let graph_keys = collect_keys(std::iter::once(graph.metadata()), &[]);
        let node_keys = collect_keys(graph.nodes().map(Node::properties), &[LABELS_KEY]);
        let edge_keys = collect_keys(graph.edges().map(Edge::properties), &[LABELS_KEY, WEIGHT_KEY]);

        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str(&format!(
            "<graphml xmlns=\"{GRAPHML_NS}\" xmlns:xsi=\"{XSI_NS}\" xsi:schemaLocation=\"{SCHEMA_LOCATION}\">\n"
        ));

        for (name, ty) in &graph_keys {
            Self::push_key(&mut out, "graph", name, ty);
        }
        Self::push_key(&mut out, "node", LABELS_KEY, "string");
        for (name, ty) in &node_keys {
            Self::push_key(&mut out, "node", name, ty);
        }
        Self::push_key(&mut out, "edge", LABELS_KEY, "string");
        Self::push_key(&mut out, "edge", WEIGHT_KEY, "long");
        for (name, ty) in &edge_keys {
            Self::push_key(&mut out, "edge", name, ty);
        }

        out.push_str(&format!(
            "  <graph id=\"{}\" edgedefault=\"directed\">\n",
            xml_escape(graph.name())
        ));
        for (name, value) in graph.metadata() {
            Self::push_data(&mut out, "    ", "graph", name, &value.to_string());
        }
        for node in graph.nodes() {
            Self::push_node(&mut out, node);
        }
        for edge in graph.edges() {
            Self::push_edge(&mut out, edge);
        }
        out.push_str("  </graph>\n");
        out.push_str("</graphml>\n");

        tracing::debug!(
            "GraphML keys: {} graph, {} node, {} edge",
            graph_keys.len(),
            node_keys.len() + 1,
            edge_keys.len() + 2
        );
        Ok(out)
    }

    fn write_to_dir(&self, graph: &Graph, dir: &Path, base_name: &str) -> Result<Vec<PathBuf>, CodecError> {
        let encoded = self.encode(graph)?;
        let path = write_file(output_path(dir, base_name, ".xml"), &encoded)?;
        Ok(vec![path])
    }
}
