use crate::core::access::Viewer;
use crate::db::log::ttlog;
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::TaskExport;
use crate::export::xlsx::export_xlsx;
use crate::ui::messages::warning;
use crate::utils::date::{DateWindow, parse_range};
use crate::utils::path::expand_tilde;
use crate::utils::time::format_hours;
use rusqlite::types::Value;
use rusqlite::{Connection, Row, params_from_iter};

/// High-level export of time entries.
pub struct ExportLogic;

impl ExportLogic {
    /// Export the time entries visible to `viewer`.
    ///
    /// - `range`: `None`, `"all"` or a range expression (`YYYY`, `YYYY-MM`,
    ///   `YYYY-MM-DD`, or `start:end` of the same format)
    /// - `employee_id`: restrict to one employee (employees are always restricted to themselves)
    ///
    /// Returns the number of exported rows.
    pub fn export(
        conn: &Connection,
        viewer: &Viewer,
        format: ExportFormat,
        file: &str,
        range: Option<&str>,
        employee_id: Option<i64>,
        force: bool,
    ) -> AppResult<usize> {
        let path = expand_tilde(file);
        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "output file path must be absolute: {file}"
            )));
        }

        let window = match range {
            None => None,
            Some(r) if r.eq_ignore_ascii_case("all") => None,
            Some(r) => Some(parse_range(r)?),
        };

        let scope = viewer.scope(employee_id)?;
        let rows = load_rows(conn, scope, window.as_ref())?;

        if rows.is_empty() {
            warning("No time entries found for the selected range.");
            return Ok(0);
        }

        ensure_writable(&path, force)?;

        match format {
            ExportFormat::Csv => export_csv(&rows, &path)?,
            ExportFormat::Json => export_json(&rows, &path)?,
            ExportFormat::Xlsx => export_xlsx(&rows, &path)?,
        }

        ttlog(
            conn,
            "export",
            &path.to_string_lossy(),
            &format!("{} rows as {}", rows.len(), format.as_str()),
        )?;

        Ok(rows.len())
    }
}

/// Load denormalized rows, ordered by date, employee and id.
fn load_rows(
    conn: &Connection,
    employee_id: Option<i64>,
    window: Option<&DateWindow>,
) -> AppResult<Vec<TaskExport>> {
    let mut sql = String::from(
        "SELECT t.id, e.name, t.date, p.name, w.name, t.notes, t.hours, t.final_submit
         FROM tasks t
         JOIN employees e ON e.id = t.employee_id
         JOIN projects p ON p.id = t.project_id
         JOIN workstreams w ON w.id = t.workstream_id",
    );
    let mut conditions = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(e) = employee_id {
        conditions.push("t.employee_id = ?");
        values.push(Value::Integer(e));
    }
    if let Some(w) = window {
        conditions.push("t.date BETWEEN ? AND ?");
        values.push(Value::Text(w.start.to_string()));
        values.push(Value::Text(w.end.to_string()));
    }
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    sql.push_str(" ORDER BY t.date ASC, e.name ASC, t.id ASC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values.iter()), map_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<TaskExport> {
    let hours: f64 = row.get(6)?;
    Ok(TaskExport {
        id: row.get(0)?,
        employee: row.get(1)?,
        date: row.get(2)?,
        project: row.get(3)?,
        workstream: row.get(4)?,
        notes: row.get(5)?,
        hours,
        hhmm: format_hours(hours),
        final_submit: row.get::<_, i32>(7)? == 1,
    })
}
