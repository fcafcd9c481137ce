use super::task::TaskRecord;
use crate::utils::time::{format_hours, hours_to_minutes};
use chrono::NaiveDate;
use serde::Serialize;

/// Timesheet view of a task record, as held by the in-memory store.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimeEntry {
    pub id: i64,
    pub date: NaiveDate,
    pub project_id: i64,
    pub workstream_id: i64,
    pub notes: String,
    pub hours: f64,
    pub final_submit: bool,
}

impl TimeEntry {
    pub fn minutes(&self) -> i64 {
        hours_to_minutes(self.hours)
    }

    /// Duration rendered as `H:MM`.
    pub fn hhmm(&self) -> String {
        format_hours(self.hours)
    }

    pub fn is_locked(&self) -> bool {
        self.final_submit
    }
}

impl From<&TaskRecord> for TimeEntry {
    fn from(rec: &TaskRecord) -> Self {
        Self {
            id: rec.id,
            date: rec.date,
            project_id: rec.project_id,
            workstream_id: rec.workstream_id,
            notes: rec.notes.clone(),
            hours: rec.hours,
            final_submit: rec.final_submit,
        }
    }
}
