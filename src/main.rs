//! QSSMA CLI - Load, inspect and serve training-cost data
//!
//! # Main Commands
//!
//! ```bash
//! qssma serve data.csv             # Start HTTP API server (port 3000)
//! qssma summary data.csv           # Print the KPI block and rankings
//! qssma parse data.csv             # Dump the cleaned record set as JSON
//! qssma audit data.csv             # Largest individual external costs
//! ```
//!
//! The data file can also come from the `QSSMA_DATA_FILE` environment
//! variable (or a `.env` file); `QSSMA_PORT` overrides the default port.

use clap::{Parser, Subcommand};
use qssma::{
    category_breakdown, format_brl, load_file, rank_external_cost, rank_internal_savings,
    top_costs, Dataset, GroupField, Summary,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "qssma")]
#[command(about = "Training cost and savings backend for QSSMA dashboards", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a data file and dump the cleaned record set as JSON
    Parse {
        /// Input data file (falls back to QSSMA_DATA_FILE)
        input: Option<PathBuf>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the KPI block and top-10 rankings
    Summary {
        /// Input data file (falls back to QSSMA_DATA_FILE)
        input: Option<PathBuf>,

        /// Grouping dimension for rankings
        #[arg(short, long, value_enum, default_value = "coordinator")]
        group_by: GroupField,
    },

    /// List the largest individual external costs (value audit)
    Audit {
        /// Input data file (falls back to QSSMA_DATA_FILE)
        input: Option<PathBuf>,

        /// How many records to show
        #[arg(short, long, default_value = "50")]
        top: usize,
    },

    /// Start the HTTP API server
    Serve {
        /// Input data file (falls back to QSSMA_DATA_FILE)
        input: Option<PathBuf>,

        /// Port to listen on (falls back to QSSMA_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse { input, output } => cmd_parse(input, output.as_deref()),

        Commands::Summary { input, group_by } => cmd_summary(input, group_by),

        Commands::Audit { input, top } => cmd_audit(input, top),

        Commands::Serve { input, port } => cmd_serve(input, port).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

/// Resolve the input file from the argument or the environment.
fn resolve_input(input: Option<PathBuf>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(path) = input {
        return Ok(path);
    }
    match std::env::var("QSSMA_DATA_FILE") {
        Ok(path) if !path.trim().is_empty() => Ok(PathBuf::from(path)),
        _ => Err("no input file given and QSSMA_DATA_FILE is not set".into()),
    }
}

fn load(input: Option<PathBuf>) -> Result<Dataset, Box<dyn std::error::Error>> {
    let path = resolve_input(input)?;
    eprintln!("📄 Loading: {}", path.display());
    let dataset = load_file(&path)?;
    eprintln!(
        "   Encoding: {}  Delimiter: '{}'",
        dataset.info.encoding, dataset.info.delimiter
    );
    eprintln!(
        "   {} source rows → {} records ({} training types)",
        dataset.info.source_rows,
        dataset.info.record_count,
        dataset.info.training_columns.len()
    );
    if !dataset.info.dropped_columns.is_empty() {
        eprintln!(
            "   Dropped aggregate column(s): {}",
            dataset.info.dropped_columns.join(", ")
        );
    }
    Ok(dataset)
}

fn cmd_parse(
    input: Option<PathBuf>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = load(input)?;
    let json = serde_json::to_string_pretty(&dataset)?;
    write_output(&json, output)?;
    Ok(())
}

fn cmd_summary(
    input: Option<PathBuf>,
    group_by: GroupField,
) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = load(input)?;
    let records = &dataset.records;

    let summary = Summary::compute(records, group_by);

    println!("\n📊 KPIs");
    println!("   Investimento Total:      {}", format_brl(summary.total_external_cost));
    println!("   Total Registros:         {}", summary.total_records);
    println!(
        "   Realizados Internamente: {} (Economia: {})",
        summary.internal_count,
        format_brl(summary.savings_estimate)
    );
    println!(
        "   Maior Investidor:        {} ({})",
        summary.top_spender.group,
        format_brl(summary.top_spender.value)
    );

    println!("\n💸 Top 10 Custos Externos ({:?})", group_by);
    for entry in rank_external_cost(records, group_by, 10).iter().rev() {
        println!("   {:<40} {}", entry.group, format_brl(entry.value));
    }

    println!("\n🛡️ Top 10 Saving Interno ({:?})", group_by);
    for entry in rank_internal_savings(records, group_by, 10).iter().rev() {
        println!("   {:<40} {}", entry.group, format_brl(entry.value));
    }

    println!("\n📈 Interno vs Externo (top 10 por volume)");
    for entry in category_breakdown(records, group_by) {
        println!("   {:<40} {:<18} {}", entry.group, entry.category, entry.count);
    }

    Ok(())
}

fn cmd_audit(input: Option<PathBuf>, top: usize) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = load(input)?;
    let audit = top_costs(&dataset.records, top);

    println!("\n🕵️ Top {} custos unitários", audit.len());
    for record in audit {
        println!(
            "   {:<12} {:<25} {:<20} {}",
            record.training_type,
            record.site,
            record.coordinator,
            format_brl(record.cost)
        );
    }

    Ok(())
}

async fn cmd_serve(
    input: Option<PathBuf>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = resolve_input(input)?;
    let port = match port {
        Some(p) => p,
        None => std::env::var("QSSMA_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000),
    };
    qssma::server::start_server(&path, port).await
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
