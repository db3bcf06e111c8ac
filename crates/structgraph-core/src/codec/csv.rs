//! CSV codec: one table for nodes, one for edges
//!
//! Rows are flat, so the header is the union of every row's keys,
//! discovered before anything is written.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use super::{GraphCodec, OutputFormat, output_path, write_file};
use crate::error::CodecError;
use crate::graph::Graph;
use crate::identity;

pub const DEFAULT_DELIMITER: char = ',';
/// Used instead of `,` when the locale writes decimals with a comma.
pub const DECIMAL_COMMA_DELIMITER: char = ';';

const QUOTE: char = '"';
const LINE_END: &str = "\n";

const NODE_COLUMNS: [&str; 2] = ["id", "labels"];
const EDGE_COLUMNS: [&str; 4] = ["id", "labels", "source", "target"];

/// Languages whose default numeric format uses a decimal comma.
const DECIMAL_COMMA_LANGUAGES: &[&str] = &[
    "af", "az", "be", "bg", "bs", "ca", "cs", "da", "de", "el", "es", "et", "eu", "fi", "fo", "fr", "gl",
    "hr", "hu", "hy", "id", "is", "it", "ka", "kk", "ky", "lt", "lv", "mk", "mn", "nb", "nl", "nn", "no",
    "pl", "pt", "ro", "ru", "sk", "sl", "sq", "sr", "sv", "tr", "uk", "uz", "vi",
];

/// Regions that override their language's decimal comma with a point.
const DECIMAL_POINT_REGIONS: &[(&str, &str)] = &[
    ("de", "CH"),
    ("de", "LI"),
    ("it", "CH"),
    ("es", "MX"),
    ("es", "US"),
    ("es", "PR"),
    ("es", "DO"),
    ("es", "GT"),
    ("es", "HN"),
    ("es", "NI"),
    ("es", "PA"),
    ("es", "SV"),
];

/// Decimal separator for a POSIX locale name such as `de_DE.UTF-8`.
pub fn decimal_separator(locale: &str) -> char {
    let name = locale.split(['.', '@']).next().unwrap_or_default();
    let mut parts = name.split(['_', '-']);
    let language = parts.next().unwrap_or_default().to_ascii_lowercase();
    let region = parts.next().unwrap_or_default().to_ascii_uppercase();

    if !DECIMAL_COMMA_LANGUAGES.contains(&language.as_str()) {
        return '.';
    }
    if DECIMAL_POINT_REGIONS
        .iter()
        .any(|(l, r)| *l == language && *r == region)
    {
        return '.';
    }
    ','
}

/// Field delimiter for a locale; `None` means the C locale.
pub fn delimiter_for_locale(locale: Option<&str>) -> char {
    match locale.map(decimal_separator) {
        Some(',') => DECIMAL_COMMA_DELIMITER,
        _ => DEFAULT_DELIMITER,
    }
}

/// The numeric locale named by `LC_ALL`, `LC_NUMERIC` and `LANG`, first set wins.
///
/// `None` when nothing is set or the winner is the C/POSIX locale.
pub fn numeric_locale<'a>(
    lc_all: Option<&'a str>,
    lc_numeric: Option<&'a str>,
    lang: Option<&'a str>,
) -> Option<&'a str> {
    [lc_all, lc_numeric, lang]
        .into_iter()
        .flatten()
        .find(|value| !value.is_empty())
        .filter(|value| *value != "C" && *value != "POSIX" && !value.starts_with("C."))
}

fn active_locale() -> Option<String> {
    let var = |name: &str| std::env::var(name).ok();
    let (lc_all, lc_numeric, lang) = (var("LC_ALL"), var("LC_NUMERIC"), var("LANG"));
    numeric_locale(lc_all.as_deref(), lc_numeric.as_deref(), lang.as_deref()).map(str::to_string)
}

/// Quote a cell if it holds the delimiter, a quote or a line break.
pub fn escape(token: &str, delimiter: char) -> String {
    if token.contains(delimiter) || token.contains(QUOTE) || token.contains(['\n', '\r']) {
        let doubled = token.replace(QUOTE, "\"\"");
        format!("{QUOTE}{doubled}{QUOTE}")
    } else {
        token.to_string()
    }
}

/// A flat table whose columns are discovered from its rows.
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    preferred: Vec<String>,
    rows: Vec<BTreeMap<String, String>>,
}

impl CsvTable {
    /// `preferred` columns always lead the header, in the given order.
    pub fn new(preferred: &[&str]) -> Self {
        CsvTable {
            preferred: preferred.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: BTreeMap<String, String>) {
        self.rows.push(row);
    }

    /// Preferred columns, then every other key seen in any row, sorted.
    pub fn columns(&self) -> Vec<String> {
        let discovered: BTreeSet<&String> = self.rows.iter().flat_map(|row| row.keys()).collect();
        let mut columns = self.preferred.clone();
        columns.extend(
            discovered
                .into_iter()
                .filter(|c| !self.preferred.contains(*c))
                .cloned(),
        );
        columns
    }

    pub fn render(&self, delimiter: char) -> String {
        let columns = self.columns();
        let sep = delimiter.to_string();
        let mut out = String::new();

        let header: Vec<String> = columns.iter().map(|c| escape(c, delimiter)).collect();
        out.push_str(&header.join(&sep));
        out.push_str(LINE_END);

        for row in &self.rows {
            let cells: Vec<String> = columns
                .iter()
                .map(|c| escape(row.get(c).map(String::as_str).unwrap_or(""), delimiter))
                .collect();
            out.push_str(&cells.join(&sep));
            out.push_str(LINE_END);
        }
        out
    }

    /// Read a rendered table back into string rows keyed by header.
    pub fn parse(text: &str, delimiter: char) -> Result<Vec<BTreeMap<String, String>>, CodecError> {
        let mut records = split_records(text, delimiter)?.into_iter();
        let Some(header) = records.next() else {
            return Ok(Vec::new());
        };

        records
            .enumerate()
            .map(|(i, record)| {
                if record.len() != header.len() {
                    return Err(CodecError::Malformed(format!(
                        "row {} has {} fields, header has {}",
                        i + 1,
                        record.len(),
                        header.len()
                    )));
                }
                Ok(header.iter().cloned().zip(record).collect::<BTreeMap<_, _>>())
            })
            .collect()
    }
}

/// Split CSV text into records of unescaped fields.
fn split_records(text: &str, delimiter: char) -> Result<Vec<Vec<String>>, CodecError> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == QUOTE {
                if chars.peek() == Some(&QUOTE) {
                    field.push(QUOTE);
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else if c == QUOTE && field.is_empty() {
            in_quotes = true;
        } else if c == delimiter {
            record.push(std::mem::take(&mut field));
        } else if c == '\n' || c == '\r' {
            if c == '\r' && chars.peek() == Some(&'\n') {
                chars.next();
            }
            record.push(std::mem::take(&mut field));
            records.push(std::mem::take(&mut record));
        } else {
            field.push(c);
        }
    }

    if in_quotes {
        return Err(CodecError::Malformed("unterminated quoted field".to_string()));
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    Ok(records)
}

/// Writes `<base>-nodes.csv` and `<base>-edges.csv`.
#[derive(Debug, Clone)]
pub struct CsvCodec {
    delimiter: char,
}

impl CsvCodec {
    pub fn with_delimiter(delimiter: char) -> Self {
        CsvCodec { delimiter }
    }

    /// Pick the delimiter from the process locale.
    pub fn from_env() -> Self {
        let locale = active_locale();
        let delimiter = delimiter_for_locale(locale.as_deref());
        tracing::debug!("CSV delimiter {:?} for locale {:?}", delimiter, locale);
        CsvCodec { delimiter }
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn node_table(&self, graph: &Graph) -> CsvTable {
        let mut table = CsvTable::new(&NODE_COLUMNS);
        for node in graph.nodes() {
            let mut row: BTreeMap<String, String> = node
                .properties()
                .iter()
                .map(|(k, v)| (k.clone(), v.to_string()))
                .collect();
            row.insert("id".into(), node.id().to_string());
            row.insert("labels".into(), identity::join_labels(node.labels()));
            table.push(row);
        }
        table
    }

    pub fn edge_table(&self, graph: &Graph) -> CsvTable {
        let mut table = CsvTable::new(&EDGE_COLUMNS);
        for edge in graph.edges() {
            let mut row: BTreeMap<String, String> = edge
                .properties()
                .iter()
                .map(|(k, v)| (k.clone(), v.to_string()))
                .collect();
            row.insert("id".into(), edge.id().to_string());
            row.insert("labels".into(), edge.label());
            row.insert("source".into(), edge.source().to_string());
            row.insert("target".into(), edge.target().to_string());
            row.insert("weight".into(), edge.weight().to_string());
            table.push(row);
        }
        table
    }
}

impl GraphCodec for CsvCodec {
    fn format(&self) -> OutputFormat {
        OutputFormat::Csv
    }

    fn encode(&self, graph: &Graph) -> Result<String, CodecError> {
        Ok(format!(
            "{}{}{}",
            self.node_table(graph).render(self.delimiter),
            LINE_END,
            self.edge_table(graph).render(self.delimiter)
        ))
    }

    fn write_to_dir(&self, graph: &Graph, dir: &Path, base_name: &str) -> Result<Vec<PathBuf>, CodecError> {
        let nodes = write_file(
            output_path(dir, base_name, "-nodes.csv"),
            &self.node_table(graph).render(self.delimiter),
        )?;
        let edges = write_file(
            output_path(dir, base_name, "-edges.csv"),
            &self.edge_table(graph).render(self.delimiter),
        )?;
        Ok(vec![nodes, edges])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Node;
    use crate::test_utils::sample_graph;

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain", ','), "plain");
        assert_eq!(escape("a,b", ','), "\"a,b\"");
        assert_eq!(escape("a,b", ';'), "a,b");
        assert_eq!(escape("say \"hi\"", ','), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("two\nlines", ','), "\"two\nlines\"");
    }

    #[test]
    fn test_locale_delimiter() {
        assert_eq!(delimiter_for_locale(None), ',');
        assert_eq!(delimiter_for_locale(Some("en_US.UTF-8")), ',');
        assert_eq!(delimiter_for_locale(Some("de_DE.UTF-8")), ';');
        assert_eq!(delimiter_for_locale(Some("fr_FR@euro")), ';');
        assert_eq!(delimiter_for_locale(Some("nl")), ';');
        assert_eq!(delimiter_for_locale(Some("de_CH.UTF-8")), ',');
        assert_eq!(delimiter_for_locale(Some("es-MX")), ',');
        assert_eq!(delimiter_for_locale(Some("ja_JP.UTF-8")), ',');
    }

    #[test]
    fn test_numeric_locale_precedence() {
        assert_eq!(numeric_locale(None, None, None), None);
        assert_eq!(numeric_locale(None, None, Some("de_DE.UTF-8")), Some("de_DE.UTF-8"));
        assert_eq!(numeric_locale(None, Some("fr_FR"), Some("en_US")), Some("fr_FR"));
        assert_eq!(numeric_locale(Some("nl_NL"), Some("fr_FR"), Some("en_US")), Some("nl_NL"));
        // Empty values do not count as set.
        assert_eq!(numeric_locale(Some(""), None, Some("de_DE")), Some("de_DE"));
        // The C locale wins without falling through.
        assert_eq!(numeric_locale(Some("C"), None, Some("de_DE")), None);
        assert_eq!(numeric_locale(None, Some("POSIX"), Some("de_DE")), None);
        assert_eq!(numeric_locale(Some("C.UTF-8"), None, None), None);
    }

    #[test]
    fn test_columns_union_and_order() {
        let mut table = CsvTable::new(&["id", "name"]);
        table.push(BTreeMap::from([
            ("col2".to_string(), "Hello \"world\"".to_string()),
            ("col1".to_string(), "123".to_string()),
            ("id".to_string(), "1".to_string()),
            ("name".to_string(), "One".to_string()),
        ]));
        table.push(BTreeMap::from([
            ("col1".to_string(), "12.3".to_string()),
            ("name".to_string(), "Two".to_string()),
            ("col3".to_string(), "true".to_string()),
            ("col4".to_string(), "this contains, comma".to_string()),
            ("id".to_string(), "2".to_string()),
        ]));

        assert_eq!(table.columns(), vec!["id", "name", "col1", "col2", "col3", "col4"]);
        insta::assert_snapshot!(table.render(','), @r#"
        id,name,col1,col2,col3,col4
        1,One,123,"Hello ""world""",,
        2,Two,12.3,,true,"this contains, comma"
        "#);
    }

    #[test]
    fn test_parse_inverts_render() {
        let mut table = CsvTable::new(&["id"]);
        table.push(BTreeMap::from([
            ("id".to_string(), "x".to_string()),
            ("value".to_string(), "a,b".to_string()),
            ("quote".to_string(), "say \"hi\"\nbye".to_string()),
        ]));
        table.push(BTreeMap::from([("id".to_string(), "y".to_string())]));

        let rendered = table.render(',');
        let rows = CsvTable::parse(&rendered, ',').unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["value"], "a,b");
        assert_eq!(rows[0]["quote"], "say \"hi\"\nbye");
        assert_eq!(rows[1]["value"], "");
    }

    #[test]
    fn test_parse_rejects_ragged_rows() {
        let err = CsvTable::parse("a,b\n1\n", ',').unwrap_err();
        assert!(matches!(err, CodecError::Malformed(_)));
        let err = CsvTable::parse("a\n\"open\n", ',').unwrap_err();
        assert!(matches!(err, CodecError::Malformed(_)));
    }

    #[test]
    fn test_node_table() {
        let mut graph = Graph::new("g");
        graph
            .add_node(Node::new("pkg.A", ["Structure", "Container"]).with_property("doc", "a,b"))
            .unwrap();
        graph
            .add_node(Node::new("int", ["Primitive"]).with_property("kind", "primitive"))
            .unwrap();

        let codec = CsvCodec::with_delimiter(',');
        insta::assert_snapshot!(codec.node_table(&graph).render(','), @r#"
        id,labels,doc,kind
        pkg.A,"Container,Structure","a,b",
        int,Primitive,,primitive
        "#);
        insta::assert_snapshot!(codec.node_table(&graph).render(';'), @r#"
        id;labels;doc;kind
        pkg.A;Container,Structure;a,b;
        int;Primitive;;primitive
        "#);
    }

    #[test]
    fn test_edge_table_columns() {
        let graph = sample_graph();
        let codec = CsvCodec::with_delimiter(',');
        let table = codec.edge_table(&graph);
        let columns = table.columns();
        assert_eq!(&columns[..4], &["id", "labels", "source", "target"]);
        assert!(columns.contains(&"weight".to_string()));

        let rows = CsvTable::parse(&table.render(','), ',').unwrap();
        assert_eq!(rows[0]["source"], "node1");
        assert_eq!(rows[0]["weight"], "3");
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let codec = CsvCodec::with_delimiter(',');
        let paths = codec.write_to_dir(&sample_graph(), dir.path(), "Sample").unwrap();
        assert_eq!(
            paths,
            vec![dir.path().join("Sample-nodes.csv"), dir.path().join("Sample-edges.csv")]
        );

        let nodes = std::fs::read_to_string(&paths[0]).unwrap();
        assert!(nodes.starts_with("id,labels,"));
        let rows = CsvTable::parse(&nodes, ',').unwrap();
        assert_eq!(rows.len(), sample_graph().node_count());
    }
}
