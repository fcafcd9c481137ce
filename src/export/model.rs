use serde::Serialize;

/// Flat, denormalized time entry row for exports.
#[derive(Serialize, Clone, Debug)]
pub struct TaskExport {
    pub id: i64,
    pub employee: String,
    pub date: String,
    pub project: String,
    pub workstream: String,
    pub notes: String,
    pub hours: f64,
    pub hhmm: String,
    pub final_submit: bool,
}

/// Header for CSV / XLSX, in field order.
pub(crate) fn get_headers() -> Vec<&'static str> {
    vec![
        "id",
        "employee",
        "date",
        "project",
        "workstream",
        "notes",
        "hours",
        "hhmm",
        "final_submit",
    ]
}

pub(crate) fn task_to_row(t: &TaskExport) -> Vec<String> {
    vec![
        t.id.to_string(),
        t.employee.clone(),
        t.date.clone(),
        t.project.clone(),
        t.workstream.clone(),
        t.notes.clone(),
        format!("{:.2}", t.hours),
        t.hhmm.clone(),
        t.final_submit.to_string(),
    ]
}
