use anyhow::Result;
use clap::Parser;
use pbfx::core::log::init_logging;

/// Fetch PrivatBank cash exchange rates for the last few days.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Number of recent days to fetch, counting back from today (1 to 10)
    days: u32,

    /// Additional currency codes to include beyond USD and EUR
    currencies: Vec<String>,

    /// Print the result as JSON instead of tables
    #[arg(short, long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long)]
    config_path: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = pbfx::run(
        cli.days,
        cli.currencies,
        cli.json,
        cli.config_path.as_deref(),
    )
    .await;

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
