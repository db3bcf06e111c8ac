//! Program model access and structure extraction

pub mod error;
pub mod extractor;
pub mod features;
pub mod model;
pub mod options;
pub mod snapshot;
pub mod strategy;
pub mod vocabulary;


#[cfg(test)]
pub mod test_utils;

pub use error::ModelError;
pub use extractor::GraphExtractor;
pub use model::ProgramModel;
pub use options::{DetailLevel, ExtractOptions};
pub use snapshot::{ModelSnapshot, SnapshotFormat};
pub use strategy::StructureExtractor;
