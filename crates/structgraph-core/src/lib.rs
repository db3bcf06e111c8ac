//! StructGraph Core: labeled property graph, identity rules and codecs

pub mod aggregation;
pub mod codec;
pub mod error;
pub mod graph;
pub mod identity;
pub mod model;
pub mod value;


#[cfg(test)]
pub mod test_utils;

pub use aggregation::EdgeBatch;
pub use codec::{CsvCodec, CyJsonCodec, GraphCodec, GraphMlCodec, OutputFormat};
pub use error::{CodecError, GraphError};
pub use graph::Graph;
pub use model::{Edge, EdgeKey, Node};
pub use value::{Properties, PropertyValue};
