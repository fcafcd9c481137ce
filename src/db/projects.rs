use crate::db::paging::{Filter, ListQuery, ListSpec, Page, fetch_page};
use crate::errors::{AppError, AppResult};
use crate::models::project::{NewProject, Project};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::collections::HashMap;

const COLUMNS: &str = "id, name, client, description, active, created_at";

pub const LIST_SPEC: ListSpec = ListSpec {
    table: "projects",
    columns: COLUMNS,
    search_columns: &["name", "client"],
    sortable: &[
        ("id", "id"),
        ("name", "name"),
        ("client", "client COLLATE NOCASE"),
        ("created_at", "created_at"),
    ],
    default_sort: "name",
};

pub fn map_row(row: &Row) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get("id")?,
        name: row.get("name")?,
        client: row.get("client")?,
        description: row.get("description")?,
        active: row.get::<_, i32>("active")? == 1,
        created_at: row.get("created_at")?,
    })
}

pub fn insert(conn: &Connection, p: &NewProject) -> AppResult<Project> {
    conn.execute(
        "INSERT INTO projects (name, client, description, active, created_at)
         VALUES (?1, ?2, ?3, 1, ?4)",
        params![
            p.name.trim(),
            p.client.trim(),
            p.description,
            Local::now().to_rfc3339()
        ],
    )?;
    get(conn, conn.last_insert_rowid())
}

pub fn find(conn: &Connection, id: i64) -> AppResult<Option<Project>> {
    let mut stmt = conn.prepare_cached(&format!("SELECT {COLUMNS} FROM projects WHERE id = ?1"))?;
    Ok(stmt.query_row([id], map_row).optional()?)
}

pub fn get(conn: &Connection, id: i64) -> AppResult<Project> {
    find(conn, id)?.ok_or_else(|| AppError::not_found("Project", id))
}

/// Case-insensitive name clash with a project other than `except_id`.
pub fn name_taken(conn: &Connection, name: &str, except_id: Option<i64>) -> AppResult<bool> {
    let mut stmt =
        conn.prepare_cached("SELECT 1 FROM projects WHERE name = ?1 AND id != ?2 LIMIT 1")?;
    Ok(stmt.exists(params![name.trim(), except_id.unwrap_or(0)])?)
}

pub fn list(conn: &Connection, query: &ListQuery, default_per_page: u32) -> AppResult<Page<Project>> {
    fetch_page(conn, &LIST_SPEC, Filter::new(), query, default_per_page, map_row)
}

pub fn update(conn: &Connection, p: &Project) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE projects SET name = ?1, client = ?2, description = ?3, active = ?4 WHERE id = ?5",
        params![
            p.name,
            p.client,
            p.description,
            if p.active { 1 } else { 0 },
            p.id
        ],
    )?;
    if n == 0 {
        return Err(AppError::not_found("Project", p.id));
    }
    Ok(())
}

/// Delete a project; its workstreams go with it (ON DELETE CASCADE).
pub fn delete(conn: &Connection, id: i64) -> AppResult<()> {
    let n = conn.execute("DELETE FROM projects WHERE id = ?1", [id])?;
    if n == 0 {
        return Err(AppError::not_found("Project", id));
    }
    Ok(())
}

/// id → name lookup used to render timesheets and exports.
pub fn names(conn: &Connection) -> AppResult<HashMap<i64, String>> {
    let mut stmt = conn.prepare_cached("SELECT id, name FROM projects")?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
    Ok(rows.collect::<Result<HashMap<_, _>, _>>()?)
}
