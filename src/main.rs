use analytics::ColumnExtractor;
use anyhow::Context;
use chart::{ChartPlan, Legend};
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use configuration::{load_config, load_config_from, Config};
use core_types::{DisplayMode, HighlightMode, RenderInput};
use layout::LayoutEngine;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// The main entry point for the return map.
fn main() {
    // Logs go to stderr so `render --json` output stays machine readable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = match load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Execute the appropriate command
    let result = match cli.command {
        Commands::Render(args) => handle_render(args, &config).context("render failed"),
        Commands::Columns(args) => handle_columns(args, &config).context("column listing failed"),
        Commands::Geographies => handle_geographies(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Ranks assets column by column and prints the resulting return map.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file. Defaults to `config.toml` in the working directory, if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out and color the map of one geography.
    Render(RenderArgs),
    /// Show which metrics-table headers were recognised as columns.
    Columns(GeoArgs),
    /// List the configured geographies.
    Geographies,
}

#[derive(Parser)]
struct RenderArgs {
    /// Geography key from the configuration (e.g. "br", "ex").
    #[arg(long, default_value = "br")]
    geo: String,

    /// Display mode: "stacked", "zero" or "asset". Unknown values render stacked.
    #[arg(long)]
    mode: Option<String>,

    /// Highlight mode: "class", "asset" or "return".
    #[arg(long)]
    highlight: Option<String>,

    /// Asset id to align on in asset mode. Defaults to the first asset.
    #[arg(long)]
    reference: Option<String>,

    /// Print the full render plan as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct GeoArgs {
    /// Geography key from the configuration (e.g. "br", "ex").
    #[arg(long, default_value = "br")]
    geo: String,
}

fn load(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => load_config_from(path).with_context(|| format!("reading {}", path.display()))?,
        None => load_config()?,
    };
    Ok(config)
}

// ==============================================================================
// Render Command Logic
// ==============================================================================

fn handle_render(args: RenderArgs, config: &Config) -> anyhow::Result<()> {
    let geography = config.geography(&args.geo)?;
    let dataset = ingestion::load_geography(&config.data_dir, geography)
        .with_context(|| format!("loading geography '{}'", args.geo))?;

    let mode = args
        .mode
        .as_deref()
        .map_or(config.display.default_mode, DisplayMode::from_name);
    let highlight = args
        .highlight
        .as_deref()
        .map_or(config.display.default_highlight, HighlightMode::from_name);

    let mut input = RenderInput::new(args.geo.as_str())
        .with_display_mode(mode)
        .with_highlight_mode(highlight);
    if let Some(reference) = args.reference {
        input = input.with_reference_asset(reference);
    }

    let engine = LayoutEngine::new(config.display.card_height, config.display.gap);
    let plan = ChartPlan::build(&dataset, &input, &engine, config.display.locale);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_plan(&plan, &engine);
    }

    Ok(())
}

/// Prints one table row per card slot. A marker row is inserted where a
/// column's zero or reference line falls.
fn print_plan(plan: &ChartPlan, engine: &LayoutEngine) {
    println!("{}", plan.subtitle);

    let pitch = engine.pitch();
    let slots = ((plan.height + engine.gap()) / pitch).round().max(0.0) as usize;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(plan.columns.iter().map(|c| c.label.clone()).collect::<Vec<_>>());

    for slot in 0..slots {
        let top = slot as f64 * pitch;

        let on_line: Vec<bool> = plan
            .columns
            .iter()
            .map(|c| c.baseline.is_some_and(|b| (b + engine.gap() / 2.0 - top).abs() < 0.5))
            .collect();
        if on_line.iter().any(|marked| *marked) {
            let marker = match plan.display_mode {
                DisplayMode::Asset => "── ref ──",
                _ => "── 0 ──",
            };
            table.add_row(
                on_line
                    .iter()
                    .map(|marked| if *marked { marker } else { "" })
                    .collect::<Vec<_>>(),
            );
        }

        table.add_row(
            plan.columns
                .iter()
                .map(|c| {
                    c.cards
                        .iter()
                        .find(|card| (card.top - top).abs() < 0.5)
                        .map(|card| format!("{}\n{}", card.display, card.formatted))
                        .unwrap_or_default()
                })
                .collect::<Vec<_>>(),
        );
    }

    println!("{table}");

    match &plan.legend {
        Legend::Gradient { below, above } => println!("{below} ◀──▶ {above}"),
        Legend::Classes { chips } => {
            let labels: Vec<&str> = chips.iter().map(|c| c.label.as_str()).collect();
            println!("Classes: {}", labels.join(", "));
        }
        Legend::None => {}
    }
}

// ==============================================================================
// Listing Commands
// ==============================================================================

fn handle_columns(args: GeoArgs, config: &Config) -> anyhow::Result<()> {
    let geography = config.geography(&args.geo)?;
    let path = config.data_dir.join(&geography.folder).join(&geography.metrics_file);
    let metrics = ingestion::read_table_file(&path)?;

    let extracted = ColumnExtractor::new().extract(&metrics.header);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Id", "Label", "Kind", "Source header"]);

    for column in extracted.all() {
        table.add_row(vec![
            column.id.clone(),
            column.label.clone(),
            format!("{:?}", column.kind),
            column.source.clone().unwrap_or_else(|| "(derived)".to_string()),
        ]);
    }

    println!("{table}");

    if let Some(total) = &extracted.total_period_source {
        println!("Multi-year return (not ranked): {total}");
    }

    Ok(())
}

fn handle_geographies(config: &Config) -> anyhow::Result<()> {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Key", "Label", "Folder", "Risk-free", "Currency"]);

    for (key, geography) in &config.geographies {
        table.add_row(vec![
            key.as_str(),
            geography.label.as_str(),
            geography.folder.as_str(),
            geography.reference_asset.as_str(),
            geography.currency.as_str(),
        ]);
    }

    println!("{table}");
    Ok(())
}
