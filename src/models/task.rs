use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// A persisted time-track task: one block of hours booked by an employee
/// on a project workstream for a given day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskRecord {
    pub id: i64,
    pub employee_id: i64,
    pub date: NaiveDate,   // ⇔ tasks.date (TEXT "YYYY-MM-DD")
    pub project_id: i64,   // ⇔ tasks.project_id
    pub workstream_id: i64, // ⇔ tasks.workstream_id
    pub notes: String,
    pub hours: f64,         // ⇔ tasks.hours (REAL, decimal hours)
    pub final_submit: bool, // ⇔ tasks.final_submit (INT 0/1)
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
    pub employee_id: i64,
    pub date: NaiveDate,
    pub project_id: i64,
    pub workstream_id: i64,
    #[serde(default)]
    pub notes: String,
    pub hours: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    pub date: Option<NaiveDate>,
    pub project_id: Option<i64>,
    pub workstream_id: Option<i64>,
    pub notes: Option<String>,
    pub hours: Option<f64>,
}

impl TaskRecord {
    /// Build a not-yet-persisted record (`id = 0`) from a creation payload.
    pub fn from_new(task: &NewTask) -> Self {
        let now = Local::now().to_rfc3339();
        Self {
            id: 0,
            employee_id: task.employee_id,
            date: task.date,
            project_id: task.project_id,
            workstream_id: task.workstream_id,
            notes: task.notes.trim().to_string(),
            hours: task.hours,
            final_submit: false,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(d) = patch.date {
            self.date = d;
        }
        if let Some(p) = patch.project_id {
            self.project_id = p;
        }
        if let Some(w) = patch.workstream_id {
            self.workstream_id = w;
        }
        if let Some(n) = &patch.notes {
            self.notes = n.trim().to_string();
        }
        if let Some(h) = patch.hours {
            self.hours = h;
        }
        self.updated_at = Local::now().to_rfc3339();
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.project_id.is_none()
            && self.workstream_id.is_none()
            && self.notes.is_none()
            && self.hours.is_none()
    }
}
