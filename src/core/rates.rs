//! Exchange rate result model and the per-date fetch abstraction.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use crate::core::currency::CurrencySelection;

/// Cash sale and purchase rates for one currency on one date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateQuote {
    pub sale: f64,
    pub purchase: f64,
}

/// Per-currency quotes keyed by code. `None` marks a currency the source
/// did not quote that day.
pub type QuoteMap = BTreeMap<String, Option<RateQuote>>;

/// What one date's fetch produced: a quote slot per selected currency, or a
/// single failure reason covering the whole date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DailyOutcome {
    #[serde(rename = "rates")]
    Rates(QuoteMap),
    #[serde(rename = "error")]
    Failed(String),
}

/// One date's labelled outcome, in batch order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyReport {
    pub date: String,
    #[serde(flatten)]
    pub outcome: DailyOutcome,
}

/// A single-date exchange rate source the history assembler fans out over.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetches rates for every selected currency on one date. Failures fold
    /// into the outcome; this never aborts a batch.
    async fn daily_rates(&self, date: NaiveDate, selection: &CurrencySelection) -> DailyOutcome;
}
