//! Node labels, relationship labels and metric names emitted by extraction

/// Node labels.
pub mod node {
    pub const PRIMITIVE: &str = "Primitive";
    pub const CONTAINER: &str = "Container";
    pub const STRUCTURE: &str = "Structure";
    pub const VARIABLE: &str = "Variable";
    pub const OPERATION: &str = "Operation";
    pub const CONSTRUCTOR: &str = "Constructor";
    pub const SCRIPT: &str = "Script";
    pub const METRIC: &str = "Metric";
}

/// Relationship labels.
pub mod rel {
    // structural
    pub const CONTAINS: &str = "contains";
    pub const SPECIALIZES: &str = "specializes";
    pub const HAS_VARIABLE: &str = "hasVariable";
    pub const HAS_SCRIPT: &str = "hasScript";
    pub const HAS_PARAMETER: &str = "hasParameter";

    // type to type
    pub const HOLDS: &str = "holds";
    pub const RETURNS: &str = "returns";
    pub const ACCEPTS: &str = "accepts";
    pub const ACCESSES: &str = "accesses";
    pub const CALLS: &str = "calls";
    pub const CONSTRUCTS: &str = "constructs";

    // member level
    pub const TYPE: &str = "type";
    pub const RETURN_TYPE: &str = "returnType";
    pub const INVOKES: &str = "invokes";
    pub const OVERRIDES: &str = "overrides";

    pub const MEASURES: &str = "measures";
}

pub mod metric {
    pub const NUM_METHODS: &str = "NumMethods";
    pub const NUM_FIELDS: &str = "NumFields";
    pub const NUM_STATEMENTS: &str = "NumStatements";
}
