use crate::db::paging::{Filter, ListQuery, ListSpec, Page, fetch_page};
use crate::errors::{AppError, AppResult};
use crate::models::workstream::{NewWorkstream, Workstream};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::collections::HashMap;

const COLUMNS: &str = "id, project_id, name, description, created_at";

pub const LIST_SPEC: ListSpec = ListSpec {
    table: "workstreams",
    columns: COLUMNS,
    search_columns: &["name", "description"],
    sortable: &[
        ("id", "id"),
        ("name", "name"),
        ("project_id", "project_id"),
        ("created_at", "created_at"),
    ],
    default_sort: "name",
};

pub fn map_row(row: &Row) -> rusqlite::Result<Workstream> {
    Ok(Workstream {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
    })
}

pub fn insert(conn: &Connection, w: &NewWorkstream) -> AppResult<Workstream> {
    conn.execute(
        "INSERT INTO workstreams (project_id, name, description, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            w.project_id,
            w.name.trim(),
            w.description,
            Local::now().to_rfc3339()
        ],
    )?;
    get(conn, conn.last_insert_rowid())
}

pub fn find(conn: &Connection, id: i64) -> AppResult<Option<Workstream>> {
    let mut stmt =
        conn.prepare_cached(&format!("SELECT {COLUMNS} FROM workstreams WHERE id = ?1"))?;
    Ok(stmt.query_row([id], map_row).optional()?)
}

pub fn get(conn: &Connection, id: i64) -> AppResult<Workstream> {
    find(conn, id)?.ok_or_else(|| AppError::not_found("Workstream", id))
}

pub fn name_taken(
    conn: &Connection,
    project_id: i64,
    name: &str,
    except_id: Option<i64>,
) -> AppResult<bool> {
    let mut stmt = conn.prepare_cached(
        "SELECT 1 FROM workstreams WHERE project_id = ?1 AND name = ?2 AND id != ?3 LIMIT 1",
    )?;
    Ok(stmt.exists(params![project_id, name.trim(), except_id.unwrap_or(0)])?)
}

/// List workstreams, optionally restricted to one project.
pub fn list(
    conn: &Connection,
    project_id: Option<i64>,
    query: &ListQuery,
    default_per_page: u32,
) -> AppResult<Page<Workstream>> {
    let filter = match project_id {
        Some(p) => Filter::new().eq("project_id", p),
        None => Filter::new(),
    };
    fetch_page(conn, &LIST_SPEC, filter, query, default_per_page, map_row)
}

pub fn update(conn: &Connection, w: &Workstream) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE workstreams SET name = ?1, description = ?2 WHERE id = ?3",
        params![w.name, w.description, w.id],
    )?;
    if n == 0 {
        return Err(AppError::not_found("Workstream", w.id));
    }
    Ok(())
}

pub fn delete(conn: &Connection, id: i64) -> AppResult<()> {
    let n = conn.execute("DELETE FROM workstreams WHERE id = ?1", [id])?;
    if n == 0 {
        return Err(AppError::not_found("Workstream", id));
    }
    Ok(())
}

/// id → name lookup used to render timesheets and exports.
pub fn names(conn: &Connection) -> AppResult<HashMap<i64, String>> {
    let mut stmt = conn.prepare_cached("SELECT id, name FROM workstreams")?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
    Ok(rows.collect::<Result<HashMap<_, _>, _>>()?)
}
