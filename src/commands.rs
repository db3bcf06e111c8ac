//! CLI command implementations

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use structgraph_core::OutputFormat;
use structgraph_extract::{DetailLevel, ExtractOptions, GraphExtractor, ModelSnapshot, StructureExtractor};

use crate::config::Settings;

/// Arguments of `structgraph extract`, already parsed by clap.
#[derive(Debug, Default)]
pub struct ExtractArgs {
    pub model: PathBuf,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
    pub name: Option<String>,
    pub detail: Option<DetailLevel>,
    pub metrics: bool,
    pub features: bool,
    pub config: Option<PathBuf>,
    pub stdout: bool,
}

/// Everything an extraction run needs, after merging CLI flags over settings.
#[derive(Debug)]
pub struct ExtractPlan {
    pub options: ExtractOptions,
    pub format: OutputFormat,
    pub directory: PathBuf,
    pub project_name: String,
    pub csv_delimiter: Option<char>,
}

impl ExtractPlan {
    /// CLI flag > config file > default. Fails on an unknown format selector.
    pub fn resolve(args: &ExtractArgs, settings: &Settings) -> anyhow::Result<Self> {
        let format = match args.format {
            Some(format) => format,
            None => settings
                .output
                .format
                .parse::<OutputFormat>()
                .context("Invalid output format in config")?,
        };

        let mut options = settings.extract.to_options();
        if let Some(detail) = args.detail {
            options.detail = detail;
        }
        if args.metrics {
            options.include_metrics = true;
        }
        if args.features {
            options.include_features = true;
        }

        Ok(ExtractPlan {
            options,
            format,
            directory: args.output.clone().unwrap_or_else(|| settings.output.directory.clone()),
            project_name: args.name.clone().unwrap_or_else(|| settings.output.base_name.clone()),
            csv_delimiter: settings.output.csv_delimiter,
        })
    }
}

pub fn extract(args: ExtractArgs) -> anyhow::Result<()> {
    let settings = Settings::load(args.config.as_deref())?;
    let plan = ExtractPlan::resolve(&args, &settings)?;
    tracing::info!("Extracting {} as {} ({} detail)", args.model.display(), plan.format, plan.options.detail);

    let model = ModelSnapshot::load(&args.model)
        .with_context(|| format!("Failed to load model {}", args.model.display()))?;
    let graph = StructureExtractor::new(plan.options).extract(&plan.project_name, &model);
    let codec = plan.format.codec(plan.csv_delimiter);

    if args.stdout {
        let encoded = codec.encode(&graph)?;
        let mut out = std::io::stdout().lock();
        out.write_all(encoded.as_bytes()).context("Failed to write to stdout")?;
        out.flush()?;
        return Ok(());
    }

    let written = codec
        .write_to_dir(&graph, &plan.directory, &plan.project_name)
        .with_context(|| format!("Failed to write output to {}", plan.directory.display()))?;
    tracing::info!("Wrote {} nodes, {} edges", graph.node_count(), graph.edge_count());
    for path in written {
        tracing::info!("  {}", path.display());
    }
    Ok(())
}

pub fn formats() -> anyhow::Result<()> {
    for format in OutputFormat::ALL {
        let files = match format {
            OutputFormat::Json => "<name>.json",
            OutputFormat::Csv => "<name>-nodes.csv, <name>-edges.csv",
            OutputFormat::GraphMl => "<name>.xml",
        };
        println!("{:<24} {}", format.aliases().join(", "), files);
    }
    Ok(())
}
