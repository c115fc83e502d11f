//! Core domain: currency selection, date ranges and rate history assembly.

pub mod config;
pub mod currency;
pub mod dates;
pub mod history;
pub mod log;
pub mod rates;

// Re-export main types for cleaner imports
pub use currency::{CurrencyCatalog, CurrencySelection};
pub use dates::{DATE_FORMAT, InvalidRange, MAX_HISTORY_DAYS, date_range};
pub use history::fetch_history;
pub use rates::{DailyOutcome, DailyReport, QuoteMap, RateQuote, RateSource};
