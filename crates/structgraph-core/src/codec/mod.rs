//! Graph codecs: Cytoscape JSON, CSV tables and GraphML

pub mod csv;
pub mod graphml;
pub mod json;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::CodecError;
use crate::graph::Graph;

pub use self::csv::{CsvCodec, CsvTable};
pub use self::graphml::GraphMlCodec;
pub use self::json::CyJsonCodec;

/// A serialization format for a whole graph.
pub trait GraphCodec {
    fn format(&self) -> OutputFormat;

    /// The complete textual encoding. Multi-file formats concatenate their parts.
    fn encode(&self, graph: &Graph) -> Result<String, CodecError>;

    /// Write the encoding under `dir`, returning every file written.
    fn write_to_dir(&self, graph: &Graph, dir: &Path, base_name: &str) -> Result<Vec<PathBuf>, CodecError>;
}

/// Output format selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Json,
    Csv,
    GraphMl,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Json, OutputFormat::Csv, OutputFormat::GraphMl];

    /// Build the codec. `csv_delimiter` overrides locale detection for CSV.
    pub fn codec(self, csv_delimiter: Option<char>) -> Box<dyn GraphCodec> {
        match self {
            OutputFormat::Json => Box::new(CyJsonCodec),
            OutputFormat::Csv => Box::new(match csv_delimiter {
                Some(d) => CsvCodec::with_delimiter(d),
                None => CsvCodec::from_env(),
            }),
            OutputFormat::GraphMl => Box::new(GraphMlCodec),
        }
    }

    /// Accepted spellings, for help output.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            OutputFormat::Json => &["json", "cyjs"],
            OutputFormat::Csv => &["csv"],
            OutputFormat::GraphMl => &["graphml", "xml"],
        }
    }
}

impl FromStr for OutputFormat {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        OutputFormat::ALL
            .into_iter()
            .find(|f| f.aliases().contains(&wanted.as_str()))
            .ok_or_else(|| CodecError::UnknownFormat(s.to_string()))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.aliases()[0])
    }
}

/// `{dir}/{base}{suffix}`
pub fn output_path(dir: &Path, base_name: &str, suffix: &str) -> PathBuf {
    dir.join(format!("{base_name}{suffix}"))
}

/// Write one output file, creating the directory if needed.
pub(crate) fn write_file(path: PathBuf, contents: &str) -> Result<PathBuf, CodecError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|source| CodecError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    std::fs::write(&path, contents).map_err(|source| CodecError::Write {
        path: path.clone(),
        source,
    })?;
    tracing::debug!("Wrote {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_selector() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("xml".parse::<OutputFormat>().unwrap(), OutputFormat::GraphMl);
        assert_eq!(" graphml ".parse::<OutputFormat>().unwrap(), OutputFormat::GraphMl);

        let err = "yaml".parse::<OutputFormat>().unwrap_err();
        assert!(matches!(err, CodecError::UnknownFormat(ref s) if s == "yaml"));
    }

    #[test]
    fn test_codec_matches_format() {
        for format in OutputFormat::ALL {
            assert_eq!(format.codec(None).format(), format);
        }
    }

    #[test]
    fn test_output_path() {
        let p = output_path(Path::new("out"), "Project", "-nodes.csv");
        assert_eq!(p, Path::new("out").join("Project-nodes.csv"));
    }
}
