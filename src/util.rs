use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};

use crate::error::{CensusError, Result};

/// Number of leading bytes inspected when deciding whether a file is binary.
pub const BINARY_SNIFF_LEN: usize = 8192;

/// Coarse grouping key for a matched file: the first two path segments with
/// the extension of the last kept segment removed. A leading dot is a name, not an extension.
pub fn module_key(path: &str) -> String {
    let mut key = path.splitn(3, '/').take(2).collect::<Vec<_>>().join("/");
    let name_start = key.rfind('/').map_or(0, |i| i + 1);
    if let Some(dot) = key[name_start..].rfind('.') {
        if dot > 0 {
            key.truncate(name_start + dot);
        }
    }
    key
}

pub fn is_binary(data: &[u8]) -> bool {
    data.iter().take(BINARY_SNIFF_LEN).any(|&b| b == 0)
}

/// Midnight of the most recent Monday in `now`'s timezone. Today counts if it is a Monday.
pub fn week_start<Tz: TimeZone>(now: &DateTime<Tz>) -> Result<DateTime<Utc>> {
    let local = now.naive_local();
    let back = i64::from(local.weekday().num_days_from_monday());
    let monday = local.date() - Duration::days(back);
    let midnight = monday
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| CensusError::InvalidDate(format!("No midnight on {monday}")))?;

    now.timezone()
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| CensusError::InvalidDate(format!("Midnight on {monday} does not exist locally")))
}

/// Parse a cutoff given as RFC3339 or `YYYY-MM-DD` (midnight UTC).
pub fn parse_date(input: &str) -> Result<DateTime<Utc>> {
    // RFC3339
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    // YYYY-MM-DD
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(datetime) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&datetime));
        }
    }

    Err(CensusError::InvalidDate(format!(
        "Expected RFC3339 or YYYY-MM-DD, got '{input}'"
    )))
}
