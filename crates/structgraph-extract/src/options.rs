//! Extraction options

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Java primitive names seeded as `Primitive` nodes by default.
pub const JAVA_PRIMITIVES: [&str; 8] = ["boolean", "byte", "char", "short", "int", "long", "float", "double"];

pub const JAVA_STRING: &str = "java.lang.String";

pub const DEFAULT_SCHEMA_VERSION: &str = "2.0";

/// How much of the program structure to emit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    /// Packages, types and type-to-type relations only.
    Coarse,
    /// Coarse plus fields, operations, parameters and member relations.
    #[default]
    Fine,
}

impl FromStr for DetailLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coarse" => Ok(DetailLevel::Coarse),
            "fine" => Ok(DetailLevel::Fine),
            other => Err(format!("unknown detail level `{other}` (expected coarse or fine)")),
        }
    }
}

impl fmt::Display for DetailLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DetailLevel::Coarse => "coarse",
            DetailLevel::Fine => "fine",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    pub detail: DetailLevel,
    pub include_metrics: bool,
    /// Count and ratio properties on type and operation nodes.
    pub include_features: bool,
    pub schema_version: String,
    pub primitive_types: Vec<String>,
    pub string_type: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            detail: DetailLevel::default(),
            include_metrics: false,
            include_features: false,
            schema_version: DEFAULT_SCHEMA_VERSION.to_string(),
            primitive_types: JAVA_PRIMITIVES.iter().map(|p| p.to_string()).collect(),
            string_type: JAVA_STRING.to_string(),
        }
    }
}

impl ExtractOptions {
    pub fn coarse() -> Self {
        ExtractOptions {
            detail: DetailLevel::Coarse,
            ..Default::default()
        }
    }

    pub fn with_metrics(mut self, include: bool) -> Self {
        self.include_metrics = include;
        self
    }

    pub fn with_features(mut self, include: bool) -> Self {
        self.include_features = include;
        self
    }

    /// Whether fields, operations and parameters become nodes.
    pub fn include_members(&self) -> bool {
        self.detail == DetailLevel::Fine
    }
}
