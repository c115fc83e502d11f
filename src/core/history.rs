//! Concurrent assembly of multi-day rate history.

use chrono::NaiveDate;
use futures::future::join_all;
use tracing::debug;

use crate::core::currency::CurrencySelection;
use crate::core::dates::{DATE_FORMAT, InvalidRange, date_range};
use crate::core::rates::{DailyReport, RateSource};

/// Fetches rates for `day_count` days back from `anchor`, one concurrent
/// request per date.
///
/// Reports come back in range order (most recent first) regardless of which
/// request finishes first, and one failed date never disturbs its siblings.
/// An out-of-range day count fails the whole call before any request is
/// made.
pub async fn fetch_history(
    source: &dyn RateSource,
    day_count: u32,
    selection: &CurrencySelection,
    anchor: NaiveDate,
) -> Result<Vec<DailyReport>, InvalidRange> {
    let dates = date_range(day_count, anchor)?;
    debug!("Fetching rates for {} day(s) back from {}", dates.len(), anchor);

    let fetches = dates.iter().map(|date| source.daily_rates(*date, selection));
    let outcomes = join_all(fetches).await;

    Ok(dates
        .iter()
        .zip(outcomes)
        .map(|(date, outcome)| DailyReport {
            date: date.format(DATE_FORMAT).to_string(),
            outcome,
        })
        .collect())
}
