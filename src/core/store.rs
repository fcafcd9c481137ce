//! In-memory collection of the time entries of the currently loaded window.

use crate::db::tasks;
use crate::errors::{AppError, AppResult};
use crate::models::task::TaskRecord;
use crate::models::time_entry::TimeEntry;
use crate::utils::date::DateWindow;
use chrono::NaiveDate;
use rusqlite::Connection;

#[derive(Debug, Clone)]
pub struct TimeEntryStore {
    employee_id: i64,
    window: DateWindow,
    entries: Vec<TimeEntry>,
}

impl TimeEntryStore {
    /// Fetch the employee's task records for `window` and normalize them.
    pub fn load(conn: &Connection, employee_id: i64, window: DateWindow) -> AppResult<Self> {
        let records = tasks::load_window(conn, employee_id, &window)?;
        Ok(Self::from_records(employee_id, window, &records))
    }

    /// Records outside the window are dropped.
    pub fn from_records(employee_id: i64, window: DateWindow, records: &[TaskRecord]) -> Self {
        let mut entries: Vec<TimeEntry> = records
            .iter()
            .filter(|r| r.employee_id == employee_id && window.contains(r.date))
            .map(TimeEntry::from)
            .collect();
        entries.sort_by_key(|e| (e.date, e.id));

        Self {
            employee_id,
            window,
            entries,
        }
    }

    pub fn employee_id(&self) -> i64 {
        self.employee_id
    }

    pub fn window(&self) -> &DateWindow {
        &self.window
    }

    pub fn entries(&self) -> &[TimeEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries_on(&self, date: NaiveDate) -> impl Iterator<Item = &TimeEntry> {
        self.entries.iter().filter(move |e| e.date == date)
    }

    pub fn get(&self, id: i64) -> Option<&TimeEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// An entry can change only while it exists here and is not submitted.
    pub fn ensure_editable(&self, id: i64) -> AppResult<&TimeEntry> {
        let entry = self.get(id).ok_or_else(|| AppError::not_found("Time entry", id))?;
        if entry.is_locked() {
            return Err(AppError::Locked(format!(
                "time entry #{id} on {} was finally submitted",
                entry.date
            )));
        }
        Ok(entry)
    }

    /// True when any entry of the window was finally submitted.
    pub fn has_submitted(&self) -> bool {
        self.entries.iter().any(TimeEntry::is_locked)
    }

    /// New or moved entries may only land in a window nobody submitted yet.
    pub fn ensure_open(&self) -> AppResult<()> {
        if self.has_submitted() {
            return Err(AppError::Locked(format!(
                "week {} is already submitted for employee #{}",
                self.window.label(),
                self.employee_id
            )));
        }
        Ok(())
    }
}
