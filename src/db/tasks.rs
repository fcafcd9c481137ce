use crate::db::paging::{Filter, ListQuery, ListSpec, Page, fetch_page};
use crate::errors::{AppError, AppResult};
use crate::models::task::TaskRecord;
use crate::utils::date::DateWindow;
use chrono::{Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension, Row, params};

const COLUMNS: &str = "id, employee_id, date, project_id, workstream_id, notes, hours, final_submit, created_at, updated_at";

pub const LIST_SPEC: ListSpec = ListSpec {
    table: "tasks",
    columns: COLUMNS,
    search_columns: &["notes"],
    sortable: &[
        ("id", "id"),
        ("date", "date"),
        ("hours", "hours"),
        ("project_id", "project_id"),
        ("workstream_id", "workstream_id"),
        ("employee_id", "employee_id"),
    ],
    default_sort: "date",
};

/// Tables whose rows can be referenced by tasks.
#[derive(Debug, Clone, Copy)]
pub enum TaskRef {
    Employee,
    Project,
    Workstream,
}

impl TaskRef {
    fn column(&self) -> &'static str {
        match self {
            TaskRef::Employee => "employee_id",
            TaskRef::Project => "project_id",
            TaskRef::Workstream => "workstream_id",
        }
    }
}

pub fn map_row(row: &Row) -> rusqlite::Result<TaskRecord> {
    let date_str: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(date_str.clone())),
        )
    })?;

    Ok(TaskRecord {
        id: row.get("id")?,
        employee_id: row.get("employee_id")?,
        date,
        project_id: row.get("project_id")?,
        workstream_id: row.get("workstream_id")?,
        notes: row.get("notes")?,
        hours: row.get("hours")?,
        final_submit: row.get::<_, i32>("final_submit")? == 1,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn insert(conn: &Connection, t: &TaskRecord) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO tasks (employee_id, date, project_id, workstream_id, notes, hours, final_submit, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            t.employee_id,
            t.date_str(),
            t.project_id,
            t.workstream_id,
            t.notes,
            t.hours,
            if t.final_submit { 1 } else { 0 },
            t.created_at,
            t.updated_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find(conn: &Connection, id: i64) -> AppResult<Option<TaskRecord>> {
    let mut stmt = conn.prepare_cached(&format!("SELECT {COLUMNS} FROM tasks WHERE id = ?1"))?;
    Ok(stmt.query_row([id], map_row).optional()?)
}

pub fn get(conn: &Connection, id: i64) -> AppResult<TaskRecord> {
    find(conn, id)?.ok_or_else(|| AppError::not_found("Task", id))
}

/// Update every editable field. The lock flag is only touched by the submission gate.
pub fn update(conn: &Connection, t: &TaskRecord) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE tasks
         SET date = ?1, project_id = ?2, workstream_id = ?3,
             notes = ?4, hours = ?5, updated_at = ?6
         WHERE id = ?7",
        params![
            t.date_str(),
            t.project_id,
            t.workstream_id,
            t.notes,
            t.hours,
            t.updated_at,
            t.id,
        ],
    )?;
    if n == 0 {
        return Err(AppError::not_found("Task", t.id));
    }
    Ok(())
}

pub fn delete(conn: &Connection, id: i64) -> AppResult<()> {
    let n = conn.execute("DELETE FROM tasks WHERE id = ?1", [id])?;
    if n == 0 {
        return Err(AppError::not_found("Task", id));
    }
    Ok(())
}

/// All records of one employee inside the window, ordered by date then id.
pub fn load_window(
    conn: &Connection,
    employee_id: i64,
    window: &DateWindow,
) -> AppResult<Vec<TaskRecord>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {COLUMNS} FROM tasks
         WHERE employee_id = ?1 AND date >= ?2 AND date <= ?3
         ORDER BY date ASC, id ASC"
    ))?;

    let rows = stmt.query_map(
        params![employee_id, window.start.to_string(), window.end.to_string()],
        map_row,
    )?;

    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Paginated listing, optionally filtered by employee and date window.
pub fn list(
    conn: &Connection,
    employee_id: Option<i64>,
    window: Option<&DateWindow>,
    query: &ListQuery,
    default_per_page: u32,
) -> AppResult<Page<TaskRecord>> {
    let mut filter = Filter::new();
    if let Some(e) = employee_id {
        filter = filter.eq("employee_id", e);
    }
    if let Some(w) = window {
        filter = filter.between("date", w.start.to_string(), w.end.to_string());
    }
    fetch_page(conn, &LIST_SPEC, filter, query, default_per_page, map_row)
}

/// Flip the lock flag for the employee's records in the window.
/// Returns the number of rows whose flag actually changed.
pub fn set_final_submit(
    conn: &Connection,
    employee_id: i64,
    window: &DateWindow,
    value: bool,
) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE tasks SET final_submit = ?1, updated_at = ?2
         WHERE employee_id = ?3 AND date >= ?4 AND date <= ?5 AND final_submit != ?1",
        params![
            if value { 1 } else { 0 },
            Local::now().to_rfc3339(),
            employee_id,
            window.start.to_string(),
            window.end.to_string(),
        ],
    )?;
    Ok(n)
}

/// Minutes already booked by the employee on `date`, ignoring `except_id`.
/// Each row is rounded to whole minutes first, like the timesheet totals.
pub fn day_minutes(
    conn: &Connection,
    employee_id: i64,
    date: NaiveDate,
    except_id: Option<i64>,
) -> AppResult<i64> {
    let mut stmt = conn.prepare_cached(
        "SELECT COALESCE(SUM(CAST(ROUND(hours * 60) AS INTEGER)), 0) FROM tasks
         WHERE employee_id = ?1 AND date = ?2 AND id != ?3",
    )?;
    Ok(stmt.query_row(
        params![employee_id, date.to_string(), except_id.unwrap_or(0)],
        |row| row.get(0),
    )?)
}

pub fn count_referencing(conn: &Connection, target: TaskRef, id: i64) -> AppResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM tasks WHERE {} = ?1", target.column());
    Ok(conn.query_row(&sql, [id], |row| row.get(0))?)
}

/// Tasks booked on any workstream of the project.
pub fn count_for_project_workstreams(conn: &Connection, project_id: i64) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM tasks t JOIN workstreams w ON w.id = t.workstream_id
         WHERE w.project_id = ?1",
        [project_id],
        |row| row.get(0),
    )?)
}
