//! Time utilities: hours normalization, `H:MM` parsing and formatting.

use crate::errors::{AppError, AppResult};

/// Upper bound for a single entry, in hours.
pub const MAX_HOURS_PER_ENTRY: f64 = 24.0;

/// Parse a duration given either as `H:MM` or as decimal hours (`1.5`).
pub fn parse_hours(input: &str) -> AppResult<f64> {
    let s = input.trim();
    let err = || AppError::InvalidHours(s.to_string());

    let hours = if let Some((h, m)) = s.split_once(':') {
        let h: u32 = h.parse().map_err(|_| err())?;
        if m.len() != 2 {
            return Err(err());
        }
        let m: u32 = m.parse().map_err(|_| err())?;
        if m >= 60 {
            return Err(err());
        }
        h as f64 + m as f64 / 60.0
    } else {
        s.parse::<f64>().map_err(|_| err())?
    };

    validate_hours(hours, MAX_HOURS_PER_ENTRY)?;
    Ok(hours)
}

/// Hours must be finite, worth at least one minute and not above `max`.
pub fn validate_hours(hours: f64, max: f64) -> AppResult<()> {
    if !hours.is_finite() || hours_to_minutes(hours) < 1 || hours > max {
        return Err(AppError::InvalidHours(format!(
            "{hours} (expected 0:01 <= hours <= {max})"
        )));
    }
    Ok(())
}

pub fn hours_to_minutes(hours: f64) -> i64 {
    (hours * 60.0).round() as i64
}

/// Decimal hours → `H:MM`, rounded to the nearest minute.
pub fn format_hours(hours: f64) -> String {
    format_minutes(hours_to_minutes(hours))
}

/// Minutes → `H:MM` (hours not padded).
pub fn format_minutes(mins: i64) -> String {
    let sign = if mins < 0 { "-" } else { "" };
    let m = mins.abs();
    format!("{}{}:{:02}", sign, m / 60, m % 60)
}

pub fn parse_optional_hours(input: Option<&String>) -> AppResult<Option<f64>> {
    input.map(|s| parse_hours(s)).transpose()
}
