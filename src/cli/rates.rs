//! The rates command: fetch a few days of exchange rates and render them.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use comfy_table::Cell;
use indicatif::ProgressBar;

use crate::cli::ui;
use crate::core::currency::CurrencySelection;
use crate::core::history::fetch_history;
use crate::core::rates::{DailyOutcome, DailyReport, QuoteMap, RateSource};

/// Ticks a progress bar as each date's fetch completes, in any order.
struct ProgressSource<'a> {
    inner: &'a dyn RateSource,
    bar: ProgressBar,
}

#[async_trait]
impl RateSource for ProgressSource<'_> {
    async fn daily_rates(&self, date: NaiveDate, selection: &CurrencySelection) -> DailyOutcome {
        let outcome = self.inner.daily_rates(date, selection).await;
        self.bar.inc(1);
        outcome
    }
}

/// Fetches `day_count` days of rates ending at `anchor` and prints them,
/// either as styled tables or as a JSON document.
pub async fn run(
    source: &dyn RateSource,
    selection: &CurrencySelection,
    rejected: &[String],
    day_count: u32,
    anchor: NaiveDate,
    json: bool,
) -> Result<()> {
    if !rejected.is_empty() {
        eprintln!(
            "{}",
            ui::style_text(
                &format!("Warning: Unknown currencies ignored: {}", rejected.join(", ")),
                ui::StyleType::Warning,
            )
        );
    }

    let bar = ui::new_progress_bar(u64::from(day_count));
    bar.set_message("Fetching exchange rates...");
    let progress = ProgressSource {
        inner: source,
        bar: bar.clone(),
    };

    let history = fetch_history(&progress, day_count, selection, anchor).await;
    bar.finish_and_clear();
    let history = history?;

    if json {
        println!("{}", serde_json::to_string_pretty(&history)?);
        return Ok(());
    }

    let day_total = history.len();
    for (index, report) in history.iter().enumerate() {
        println!("{}", render_daily_report(report, selection));
        if index < day_total - 1 {
            ui::print_separator();
        }
    }

    Ok(())
}

fn render_daily_report(report: &DailyReport, selection: &CurrencySelection) -> String {
    let title = ui::style_text(&report.date, ui::StyleType::Title);
    let body = match &report.outcome {
        DailyOutcome::Rates(quotes) => render_quote_table(quotes, selection),
        DailyOutcome::Failed(reason) => ui::style_text(reason, ui::StyleType::Error),
    };

    format!("Exchange rates on {title}\n\n{body}")
}

/// Rows follow selection order, so the base currencies always lead.
fn render_quote_table(quotes: &QuoteMap, selection: &CurrencySelection) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Sale"),
        ui::header_cell("Purchase"),
    ]);

    for code in selection.codes() {
        let quote = quotes.get(code).copied().flatten();
        table.add_row(vec![
            Cell::new(code),
            ui::format_optional_cell(quote.map(|q| q.sale), |v| format!("{v:.2}")),
            ui::format_optional_cell(quote.map(|q| q.purchase), |v| format!("{v:.2}")),
        ]);
    }

    table.to_string()
}
