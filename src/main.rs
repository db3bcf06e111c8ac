//! StructGraph CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use structgraph_core::OutputFormat;
use structgraph_extract::DetailLevel;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "structgraph")]
#[command(about = "Extract a labeled property graph from a resolved program model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a graph from a model snapshot (.json, .yaml, .yml)
    Extract {
        /// Model snapshot file
        model: PathBuf,

        /// Output format: json, csv or graphml
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Project name, also the base name of output files
        #[arg(short, long)]
        name: Option<String>,

        /// Detail level: coarse or fine
        #[arg(short, long)]
        detail: Option<DetailLevel>,

        /// Emit metric nodes
        #[arg(long)]
        metrics: bool,

        /// Add count and ratio features to type and operation nodes
        #[arg(long)]
        features: bool,

        /// Config file (defaults to ./structgraph.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the encoded graph instead of writing files
        #[arg(long)]
        stdout: bool,
    },
    /// List output formats
    Formats,
    /// Show version
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so --stdout output stays clean. RUST_LOG wins when set.
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("structgraph={}", log_level)));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Extract {
            model,
            format,
            output,
            name,
            detail,
            metrics,
            features,
            config,
            stdout,
        } => commands::extract(commands::ExtractArgs {
            model,
            format,
            output,
            name,
            detail,
            metrics,
            features,
            config,
            stdout,
        }),
        Commands::Formats => commands::formats(),
        Commands::Version => {
            println!("StructGraph v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
