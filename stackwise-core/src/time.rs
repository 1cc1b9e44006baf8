//! Time utilities: civil "today" in the user's timezone.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::{EngineError, Result};

/// Parse an IANA timezone name like "America/Chicago".
pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.trim()
        .parse()
        .map_err(|_| EngineError::InvalidTimezone(tz.to_string()))
}

/// The user's civil date at `now`. Cycle day counts are taken between these
/// midnight-aligned dates, never between raw timestamps.
pub fn local_today(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}
