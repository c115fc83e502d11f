pub mod cli;
pub mod core;
pub mod providers;

use anyhow::Result;
use chrono::Local;
use tracing::{debug, info};

use crate::core::config::AppConfig;
use crate::core::currency::CurrencyCatalog;
use crate::providers::privatbank::{self, PrivatBankProvider};

/// Fetches and renders PrivatBank exchange rates for the last `days` days.
///
/// `extra_currencies` are added on top of the configured defaults. Unknown
/// codes produce a warning, never an error.
pub async fn run(
    days: u32,
    extra_currencies: Vec<String>,
    json: bool,
    config_path: Option<&str>,
) -> Result<()> {
    info!("Exchange rate fetch starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let catalog = CurrencyCatalog::privatbank();
    let requested: Vec<String> = config
        .currencies
        .iter()
        .cloned()
        .chain(extra_currencies)
        .collect();
    let (selection, rejected) = catalog.select(&requested);
    debug!("Selected currencies: {:?}", selection.codes());

    let base_url = config
        .providers
        .privatbank
        .as_ref()
        .map_or(privatbank::DEFAULT_BASE_URL, |p| &p.base_url);
    let provider = PrivatBankProvider::new(base_url)?;

    let anchor = Local::now().date_naive();
    cli::rates::run(&provider, &selection, &rejected, days, anchor, json).await
}
