//! Stable identifiers for edges and member nodes
//!
//! Every id here is a pure function of names and signatures, so the same
//! source always produces the same graph.

use std::collections::BTreeSet;

/// Unit separator; never part of a qualified name or label.
const SEP: char = '\u{1f}';

/// Hex MD5 digest of `source SEP label SEP target`.
pub fn edge_id(source: &str, label: &str, target: &str) -> String {
    let input = format!("{source}{SEP}{label}{SEP}{target}");
    format!("{:x}", md5::compute(input.as_bytes()))
}

/// Labels joined with `,`; a `BTreeSet` keeps them sorted.
pub fn join_labels(labels: &BTreeSet<String>) -> String {
    labels.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}

/// `{type}#{field}`
pub fn field_id(type_id: &str, field_name: &str) -> String {
    format!("{type_id}#{field_name}")
}

/// `{type}#{signature}` for methods, constructors and initializers.
pub fn operation_id(type_id: &str, signature: &str) -> String {
    format!("{type_id}#{signature}")
}

/// `{operation}:{index}`
pub fn parameter_id(operation_id: &str, index: usize) -> String {
    format!("{operation_id}:{index}")
}

/// `Metrics#{name}`
pub fn metric_id(name: &str) -> String {
    format!("Metrics#{name}")
}
