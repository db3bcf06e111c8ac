//! `structgraph.toml` settings
//!
//! ```toml
//! [extract]
//! detail = "fine"
//! include_metrics = false
//! include_features = false
//! schema_version = "2.0"
//!
//! [output]
//! format = "graphml"
//! directory = "out"
//! base_name = "Shop"
//! csv_delimiter = ";"
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use structgraph_extract::{DetailLevel, ExtractOptions};

pub const DEFAULT_CONFIG_FILE: &str = "structgraph.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub extract: ExtractSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractSettings {
    pub detail: DetailLevel,
    pub include_metrics: bool,
    pub include_features: bool,
    pub schema_version: String,
    pub primitive_types: Vec<String>,
    pub string_type: String,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        let options = ExtractOptions::default();
        ExtractSettings {
            detail: options.detail,
            include_metrics: options.include_metrics,
            include_features: options.include_features,
            schema_version: options.schema_version,
            primitive_types: options.primitive_types,
            string_type: options.string_type,
        }
    }
}

impl ExtractSettings {
    pub fn to_options(&self) -> ExtractOptions {
        ExtractOptions {
            detail: self.detail,
            include_metrics: self.include_metrics,
            include_features: self.include_features,
            schema_version: self.schema_version.clone(),
            primitive_types: self.primitive_types.clone(),
            string_type: self.string_type.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    /// Validated later so the error names the selector.
    pub format: String,
    pub directory: PathBuf,
    pub base_name: String,
    /// Overrides the locale-derived CSV delimiter.
    pub csv_delimiter: Option<char>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            format: "csv".to_string(),
            directory: PathBuf::from("."),
            base_name: "Project".to_string(),
            csv_delimiter: None,
        }
    }
}

impl Settings {
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load settings. An explicit path must exist; the default file is optional.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !path.exists() {
                    tracing::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    return Ok(Settings::default());
                }
                path
            }
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let settings =
            Self::parse(&text).with_context(|| format!("Invalid config {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(settings)
    }
}
