//! Per-day and per-week totals over a loaded [`TimeEntryStore`].
//!
//! Totals are summed in whole minutes after rounding each entry, so the
//! rendered day totals always add up to the rendered week total.

use crate::core::store::TimeEntryStore;
use crate::models::time_entry::TimeEntry;
use crate::utils::date::DateWindow;
use crate::utils::time::format_minutes;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct DayTotal {
    pub date: NaiveDate,
    pub weekday: String,
    pub minutes: i64,
    pub hhmm: String,
    pub entries: Vec<TimeEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectTotal {
    pub project_id: i64,
    pub minutes: i64,
    pub hhmm: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekSummary {
    pub employee_id: i64,
    pub window: DateWindow,
    pub days: Vec<DayTotal>,
    pub projects: Vec<ProjectTotal>,
    pub total_minutes: i64,
    pub total_hhmm: String,
    /// Every entry of the window is finally submitted (false when empty).
    pub submitted: bool,
}

pub fn total_minutes<'a>(entries: impl IntoIterator<Item = &'a TimeEntry>) -> i64 {
    entries.into_iter().map(TimeEntry::minutes).sum()
}

fn day_total(store: &TimeEntryStore, date: NaiveDate) -> DayTotal {
    let entries: Vec<TimeEntry> = store.entries_on(date).cloned().collect();
    let minutes = total_minutes(&entries);
    DayTotal {
        date,
        weekday: date.weekday().to_string(),
        minutes,
        hhmm: format_minutes(minutes),
        entries,
    }
}

pub fn summarize_day(store: &TimeEntryStore, date: NaiveDate) -> DayTotal {
    day_total(store, date)
}

/// Minutes per project, sorted by project id.
pub fn project_totals(store: &TimeEntryStore) -> Vec<ProjectTotal> {
    let mut by_project: BTreeMap<i64, i64> = BTreeMap::new();
    for e in store.entries() {
        *by_project.entry(e.project_id).or_default() += e.minutes();
    }

    by_project
        .into_iter()
        .map(|(project_id, minutes)| ProjectTotal {
            project_id,
            minutes,
            hhmm: format_minutes(minutes),
        })
        .collect()
}

pub fn is_submitted(store: &TimeEntryStore) -> bool {
    !store.is_empty() && store.entries().iter().all(TimeEntry::is_locked)
}

/// One zero-filled bucket per day of the store's window.
pub fn summarize_week(store: &TimeEntryStore) -> WeekSummary {
    let days: Vec<DayTotal> = store
        .window()
        .days()
        .into_iter()
        .map(|d| day_total(store, d))
        .collect();

    let total = days.iter().map(|d| d.minutes).sum();

    WeekSummary {
        employee_id: store.employee_id(),
        window: *store.window(),
        days,
        projects: project_totals(store),
        total_minutes: total,
        total_hhmm: format_minutes(total),
        submitted: is_submitted(store),
    }
}
