use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use portlay_definition::{Format, GraphDefinition};
use portlay_layout::{Graph, LayoutEngine};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

mod config;

use config::Config;

/// Lay out a graph of port-connected nodes and print the result
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Graph definition, RON or JSON (picked from the extension)
    input: PathBuf,

    /// RON file with `style`, `layout` and `diagonal` sections
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = Engine::Sugiyama)]
    engine: Engine,

    /// Output format of the laid-out graph
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Ron)]
    format: OutputFormat,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long)]
    viewport_width: Option<f32>,

    /// Keep dummy nodes and temporary edges in the output
    #[arg(long)]
    retain_dummies: bool,

    #[arg(long)]
    no_crossing_minimization: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Engine {
    Sugiyama,
    Diagonal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Ron,
    Json,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Ron => Format::Ron,
            OutputFormat::Json => Format::Json,
        }
    }
}

/// Apply the command-line overrides on top of the config file
fn configure(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(width) = args.viewport_width {
        config.layout.viewport_width = width;
    }
    if args.retain_dummies {
        config.layout.retain_dummy_nodes = true;
    }
    if args.no_crossing_minimization {
        config.layout.enable_crossing_minimization = false;
    }
    Ok(config)
}

fn run(args: &Args) -> Result<String> {
    let config = configure(args)?;

    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let input_format = Format::from_path(&args.input).unwrap_or_default();
    let definition: GraphDefinition = input_format
        .parse(&text)
        .with_context(|| format!("Invalid graph definition {}", args.input.display()))?;

    let mut graph = Graph::from_definition(&definition, config.style.clone())
        .context("Failed to build graph")?;

    let engine: &dyn LayoutEngine = match args.engine {
        Engine::Sugiyama => &config.layout,
        Engine::Diagonal => &config.diagonal,
    };
    let report = engine.layout(&mut graph).context("Layout failed")?;
    info!(
        "Laid out {} nodes on {} layers ({} crossings, {} reversed edges)",
        graph.nodes().len(),
        report.layers,
        report.crossings,
        report.reversed_edges
    );

    let output = Format::from(args.format)
        .write(&graph.snapshot())
        .context("Failed to serialize layout")?;
    Ok(output)
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    debug!("{args:?}");
    let output = run(&args)?;
    match &args.output {
        Some(path) => std::fs::write(path, output)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{output}"),
    }
    Ok(())
}
