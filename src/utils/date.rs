use crate::errors::{AppError, AppResult};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Parse an optional `YYYY-MM-DD`, defaulting to today.
pub fn parse_date_or_today(s: Option<&String>) -> AppResult<NaiveDate> {
    match s {
        Some(v) => parse_date(v).ok_or_else(|| AppError::InvalidDate(v.clone())),
        None => Ok(today()),
    }
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> AppResult<Self> {
        if end < start {
            return Err(AppError::InvalidRange(format!("{start} is after {end}")));
        }
        Ok(Self { start, end })
    }

    /// First instant of the window (00:00:00).
    pub fn start_at(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    /// Last second of the window (23:59:59).
    pub fn end_at(&self) -> NaiveDateTime {
        // 23:59:59 is always a valid time
        self.end
            .and_hms_opt(23, 59, 59)
            .unwrap_or_else(|| self.end.and_time(NaiveTime::MIN))
    }

    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn days(&self) -> Vec<NaiveDate> {
        self.start.iter_days().take(self.len_days() as usize).collect()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn previous(&self) -> Self {
        let shift = Duration::days(self.len_days());
        Self {
            start: self.start - shift,
            end: self.end - shift,
        }
    }

    pub fn next(&self) -> Self {
        let shift = Duration::days(self.len_days());
        Self {
            start: self.start + shift,
            end: self.end + shift,
        }
    }

    pub fn label(&self) -> String {
        if self.start == self.end {
            self.start.format("%Y-%m-%d").to_string()
        } else {
            format!(
                "{} → {}",
                self.start.format("%Y-%m-%d"),
                self.end.format("%Y-%m-%d")
            )
        }
    }
}

/// Monday..Sunday week containing `reference`.
pub fn week_window(reference: NaiveDate) -> DateWindow {
    let offset = reference.weekday().number_from_monday() as i64 - 1;
    let start = reference - Duration::days(offset);
    DateWindow {
        start,
        end: start + Duration::days(6),
    }
}

pub fn day_window(reference: NaiveDate) -> DateWindow {
    DateWindow {
        start: reference,
        end: reference,
    }
}

/// Parse a range expression.
///
/// Supported:
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
/// - any of the above as `start:end` (both sides of the same format)
pub fn parse_range(r: &str) -> AppResult<DateWindow> {
    let r = r.trim();

    if let Some((start_raw, end_raw)) = r.split_once(':') {
        let start = start_raw.trim();
        let end = end_raw.trim();

        if start.len() != end.len() {
            return Err(AppError::InvalidRange(format!(
                "start and end must have same format: {r}"
            )));
        }

        let first = parse_period(start)?;
        let last = parse_period(end)?;
        return DateWindow::new(first.start, last.end);
    }

    parse_period(r)
}

fn parse_period(p: &str) -> AppResult<DateWindow> {
    let err = || AppError::InvalidRange(p.to_string());

    match p.len() {
        // YYYY
        4 => {
            let y: i32 = p.parse().map_err(|_| err())?;
            let d1 = NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(err)?;
            let d2 = NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(err)?;
            Ok(DateWindow { start: d1, end: d2 })
        }
        // YYYY-MM
        7 => {
            let d1 = NaiveDate::parse_from_str(&format!("{p}-01"), "%Y-%m-%d").map_err(|_| err())?;
            let next_month = if d1.month() == 12 {
                NaiveDate::from_ymd_opt(d1.year() + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(d1.year(), d1.month() + 1, 1)
            }
            .ok_or_else(err)?;
            Ok(DateWindow {
                start: d1,
                end: next_month - Duration::days(1),
            })
        }
        // YYYY-MM-DD
        10 => {
            let d = parse_date(p).ok_or_else(err)?;
            Ok(day_window(d))
        }
        _ => Err(err()),
    }
}
