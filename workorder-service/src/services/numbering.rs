//! Estimate number generation.
//!
//! Numbers take the form `EST-<year>-<MM>-<NNNNN>`, unique and
//! monotonically increasing within a calendar month, counting from
//! `00001`. The counter is derived from the lexicographically greatest
//! number already issued under the month prefix; uniqueness under
//! concurrent creates is enforced by the store at insert time, and the
//! caller retries allocation on conflict.

use chrono::{Datelike, Utc};

/// Prefix for the given calendar month, e.g. `EST-2025-06`.
pub fn month_prefix(year: i32, month: u32) -> String {
    format!("EST-{}-{:02}", year, month)
}

/// Prefix for the current calendar month.
pub fn current_month_prefix() -> String {
    let today = Utc::now().date_naive();
    month_prefix(today.year(), today.month())
}

/// Next number under `prefix`, given the latest issued number for that
/// prefix (if any). Starts at 1 when the month has no numbers yet, or
/// when the trailing counter cannot be parsed.
pub fn next_in_sequence(prefix: &str, latest: Option<&str>) -> String {
    let next = latest
        .and_then(|number| number.rsplit('-').next())
        .and_then(|counter| counter.parse::<u32>().ok())
        .map(|counter| counter + 1)
        .unwrap_or(1);

    format!("{}-{:05}", prefix, next)
}
