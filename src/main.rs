use analytics::{StatisticsEngine, classify_market_condition};
use api_client::{SeriesProvider, YahooClient};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table};
use core_types::DispersionMode;
use std::path::PathBuf;

/// The main entry point for the BTC statistics service.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if one exists.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = configuration::load_config(cli.config.as_deref())?;
    let _guard = configuration::init_tracing(&config.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve => web_server::run_server(config).await?,
        Commands::Stats(args) => handle_stats(args, &config).await?,
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Bitcoin price statistics: trailing mean, standard deviation and z-score.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (defaults to ./config.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve,
    /// Fetch the trailing window once and print its statistics.
    Stats(StatsArgs),
}

#[derive(Parser)]
struct StatsArgs {
    /// Number of trailing days (defaults to statistics.window_days).
    #[arg(long)]
    days: Option<u32>,

    /// Variance denominator: "population" (n) or "sample" (n - 1).
    #[arg(long, default_value = "population")]
    mode: DispersionMode,
}

// ==============================================================================
// Stats Command Logic
// ==============================================================================

/// Fetches one window from the provider and renders the statistics as a table.
async fn handle_stats(args: StatsArgs, config: &configuration::Config) -> anyhow::Result<()> {
    let days = args.days.unwrap_or(config.statistics.window_days);
    anyhow::ensure!(
        (1..=config.statistics.max_window_days).contains(&days),
        "--days must be between 1 and {}",
        config.statistics.max_window_days
    );

    let provider = YahooClient::new(&config.provider)?;
    let end = Utc::now();
    let start = end - Duration::days(i64::from(days));
    let series = provider
        .fetch_history(&config.provider.symbol, start, end)
        .await?;
    tracing::info!(days, samples = series.len(), "Fetched price window.");

    let engine = StatisticsEngine::new();
    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![Cell::new("Symbol"), Cell::new(&config.provider.symbol)]);
    table.add_row(vec![Cell::new("Window"), Cell::new(format!("{} days ({} samples)", days, series.len()))]);
    table.add_row(vec![Cell::new("Mode"), Cell::new(args.mode)]);

    match engine.summarize(&series, args.mode) {
        Ok(summary) => {
            table.add_row(vec![Cell::new("Mean"), Cell::new(format!("{:.2}", summary.mean))]);
            table.add_row(vec![Cell::new("Std Dev"), Cell::new(format!("{:.2}", summary.stddev))]);
        }
        Err(e) => {
            table.add_row(vec![Cell::new("Statistics"), Cell::new(e)]);
        }
    }

    match engine.score_latest(&series, args.mode) {
        Ok(score) => {
            table.add_row(vec![Cell::new("Latest Price"), Cell::new(format!("{:.2}", score.value))]);
            table.add_row(vec![Cell::new("Z-Score"), Cell::new(format!("{:.4}", score.zscore))]);
            table.add_row(vec![
                Cell::new("Condition"),
                Cell::new(classify_market_condition(score.zscore)),
            ]);
        }
        Err(e) => {
            table.add_row(vec![Cell::new("Z-Score"), Cell::new(e)]);
        }
    }

    println!("{table}");
    Ok(())
}
