//! Integration tests for StructGraph
//!
//! These tests drive the CLI binary and the library pipeline end to end.

use std::path::Path;
use std::process::Command;

use structgraph_core::{CsvCodec, CyJsonCodec, GraphCodec, OutputFormat, codec::CsvTable};
use structgraph_extract::{ExtractOptions, GraphExtractor, ModelSnapshot, StructureExtractor};
use tempfile::TempDir;

const MODEL: &str = r#"{
  "packages": [{"qualified_name": "com.example", "simple_name": "example"}],
  "types": [{
    "qualified_name": "com.example.Foo",
    "simple_name": "Foo",
    "package": "com.example",
    "fields": [{"name": "x", "type_ref": {"name": "int"}}],
    "methods": [{"signature": "run()", "simple_name": "run", "return_type": {"name": "void"}}]
  }]
}"#;

fn write_model(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("model.json");
    std::fs::write(&path, MODEL).unwrap();
    path
}

fn structgraph(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_structgraph"));
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

/// Test that the CLI can be invoked
#[test]
fn test_cli_invocation() {
    let dir = TempDir::new().unwrap();
    let output = structgraph(dir.path()).arg("--help").output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Extract a labeled property graph"));

    let output = structgraph(dir.path()).arg("version").output().unwrap();
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("StructGraph v"));
}

#[test]
fn test_formats_command() {
    let dir = TempDir::new().unwrap();
    let output = structgraph(dir.path()).arg("formats").output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("json, cyjs"));
    assert!(stdout.contains("graphml, xml"));
}

#[test]
fn test_extract_writes_csv_by_default() {
    let dir = TempDir::new().unwrap();
    let model = write_model(dir.path());
    let output = structgraph(dir.path())
        .args(["extract", model.to_str().unwrap(), "--output", "out"])
        .env("LC_ALL", "C")
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let nodes = std::fs::read_to_string(dir.path().join("out/Project-nodes.csv")).unwrap();
    let edges = std::fs::read_to_string(dir.path().join("out/Project-edges.csv")).unwrap();
    let node_rows = CsvTable::parse(&nodes, ',').unwrap();
    let edge_rows = CsvTable::parse(&edges, ',').unwrap();
    assert_eq!(node_rows.len(), 13);
    assert!(edge_rows.iter().any(|r| r["labels"] == "hasVariable" && r["target"] == "com.example.Foo#x"));
}

#[test]
fn test_extract_to_stdout_as_json() {
    let dir = TempDir::new().unwrap();
    let model = write_model(dir.path());
    let output = structgraph(dir.path())
        .args(["extract", model.to_str().unwrap(), "--format", "json", "--stdout", "--name", "Demo"])
        .output()
        .unwrap();
    assert!(output.status.success());

    // Logs never reach stdout.
    let stdout = String::from_utf8(output.stdout).unwrap();
    let graph = CyJsonCodec.decode(&stdout).unwrap();
    assert_eq!(graph.name(), "Demo");
    assert!(graph.contains_node("com.example.Foo#run()"));
    assert!(!dir.path().join("Demo.json").exists());
}

#[test]
fn test_config_file_is_honored() {
    let dir = TempDir::new().unwrap();
    let model = write_model(dir.path());
    std::fs::write(
        dir.path().join("structgraph.toml"),
        "[extract]\ndetail = \"coarse\"\n[output]\nformat = \"graphml\"\nbase_name = \"Cfg\"\n",
    )
    .unwrap();

    let output = structgraph(dir.path())
        .args(["extract", model.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let xml = std::fs::read_to_string(dir.path().join("Cfg.xml")).unwrap();
    assert!(xml.contains(r#"<node id="com.example.Foo" labels=":Structure">"#));
    assert!(!xml.contains("com.example.Foo#x"));
}

#[test]
fn test_unknown_format_fails_before_extraction() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("structgraph.toml"), "[output]\nformat = \"dot\"\n").unwrap();

    // The model does not exist; the format error must come first.
    let output = structgraph(dir.path())
        .args(["extract", "missing.json"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown output format `dot`"), "{stderr}");

    let output = structgraph(dir.path())
        .args(["extract", "missing.json", "--format", "dot"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_missing_model_reports_path() {
    let dir = TempDir::new().unwrap();
    let output = structgraph(dir.path())
        .args(["extract", "nowhere.yaml"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nowhere.yaml"));
}

#[test]
fn test_library_pipeline_all_formats() {
    let dir = TempDir::new().unwrap();
    let model = ModelSnapshot::load(&write_model(dir.path())).unwrap();
    let graph = StructureExtractor::new(ExtractOptions::default()).extract("Pipeline", &model);

    for format in OutputFormat::ALL {
        let out = dir.path().join(format.to_string());
        let written = format.codec(Some(',')).write_to_dir(&graph, &out, "Pipeline").unwrap();
        assert!(written.iter().all(|p| p.exists()));
    }

    let json = std::fs::read_to_string(dir.path().join("json/Pipeline.json")).unwrap();
    assert_eq!(CyJsonCodec.decode(&json).unwrap(), graph);

    let csv = CsvCodec::with_delimiter(';');
    let nodes = csv.node_table(&graph).render(';');
    assert!(nodes.starts_with("id;labels;"));
}

#[test]
fn test_features_flag() {
    let dir = TempDir::new().unwrap();
    let model = write_model(dir.path());
    let output = structgraph(dir.path())
        .args(["extract", model.to_str().unwrap(), "--format", "json", "--stdout", "--features"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let graph = CyJsonCodec.decode(&String::from_utf8(output.stdout).unwrap()).unwrap();
    let foo = graph.find_node_by_id("com.example.Foo").unwrap();
    assert_eq!(foo.property("numFields").and_then(|v| v.as_int()), Some(1));
    assert_eq!(foo.property("numPrimitiveFields").and_then(|v| v.as_int()), Some(1));
    let run = graph.find_node_by_id("com.example.Foo#run()").unwrap();
    assert_eq!(run.property("numStatements").and_then(|v| v.as_int()), Some(0));
}
