use std::{fs, process};

use clap::{Parser, ValueEnum};
use medflow::{Config, FlowLayoutEngine, FlowModel, cost::FlowComparison};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// React Flow compatible JSON
    #[default]
    Json,
    /// Plain-text node and edge listing
    Schema,
}

/// Lays out a clinical flow as a fixed, single-column diagram
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the flow JSON file
    flow_path: String,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Vertical distance between nodes, overrides the configuration
    #[arg(short, long)]
    spacing: Option<f64>,

    /// Omit the start node
    #[arg(long)]
    no_start: bool,

    /// Omit the end node
    #[arg(long)]
    no_end: bool,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Compare the flow, taken as the ideal one, against another flow JSON file
    #[arg(long, value_name = "OTHER_JSON")]
    compare: Option<String>,
}

fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        exit_with_error(&e.to_string());
    }
}

fn load_flow(path: &str) -> medflow::Result<FlowModel> {
    let text = fs::read_to_string(path).map_err(|e| medflow::MedflowError::IoError(format!("failed to read flow file '{}': {}", path, e)))?;
    FlowModel::from_json(&text)
}

fn run(cli: Cli) -> medflow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::create(path)?,
        None => Config::default(),
    };
    if let Some(spacing) = cli.spacing {
        config.layout.step_spacing = spacing;
    }
    if cli.no_start {
        config.layout.show_start_node = false;
    }
    if cli.no_end {
        config.layout.show_end_node = false;
    }
    debug!("layout config: {:?}", config.layout);
    let engine = FlowLayoutEngine::new(config.layout)?;

    let flow = load_flow(&cli.flow_path)?;
    info!("loaded flow {} with {} steps", flow.id, flow.steps().len());

    let diagram = engine.layout(&flow);
    match cli.format {
        OutputFormat::Json => println!("{}", diagram.to_json()?),
        OutputFormat::Schema => println!("{}", diagram.schema()),
    }

    if let Some(other) = &cli.compare {
        let real = load_flow(other)?;
        let comparison = FlowComparison::compare(&flow, &real);
        match cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&comparison)?),
            OutputFormat::Schema => {
                println!();
                println!("=== Comparison: {} vs {} ===", flow.id, real.id);
                println!("Added steps:   {}", comparison.differences.added_steps.join(", "));
                println!("Removed steps: {}", comparison.differences.removed_steps.join(", "));
                println!("Duration diff: {:+} min", comparison.differences.duration_difference);
                println!("Cost diff:     {:+}", comparison.differences.cost_difference);
                println!("Efficiency:    {:.1}% ({})", comparison.efficiency(), comparison.rating().as_ref());
                for rec in comparison.recommendations.iter() {
                    println!("  - {}", rec);
                }
            }
        }
    }

    Ok(())
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("error: {}", message);
    process::exit(1);
}
