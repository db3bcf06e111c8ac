//! Graph extractor trait definition

use structgraph_core::Graph;

use crate::model::ProgramModel;

/// Turns a resolved program model into a property graph.
///
/// Extraction never fails: references that cannot be resolved are dropped.
pub trait GraphExtractor {
    fn extract(&self, project_name: &str, model: &dyn ProgramModel) -> Graph;
}
