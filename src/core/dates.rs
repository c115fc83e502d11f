//! Target date generation for historical rate queries.

use chrono::{Duration, NaiveDate};
use thiserror::Error;

/// Upper bound on how many days back a single batch may reach. The API is
/// queried once per date, so the bound keeps a batch to a small burst.
pub const MAX_HISTORY_DAYS: u32 = 10;

/// Date format the PrivatBank API expects, also used for report labels.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Requested day count falls outside the supported range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("day count must be between 1 and 10, got {requested}")]
pub struct InvalidRange {
    pub requested: u32,
}

/// Produces the target dates for a batch, most recent first.
///
/// Element `i` is `anchor` minus `i` days, so index 0 is the anchor itself.
/// The anchor is passed in rather than read from the clock to keep ranges
/// reproducible.
pub fn date_range(day_count: u32, anchor: NaiveDate) -> Result<Vec<NaiveDate>, InvalidRange> {
    if !(1..=MAX_HISTORY_DAYS).contains(&day_count) {
        return Err(InvalidRange {
            requested: day_count,
        });
    }

    Ok((0..i64::from(day_count))
        .map(|offset| anchor - Duration::days(offset))
        .collect())
}
