use crate::db::paging::{Filter, ListQuery, ListSpec, Page, fetch_page};
use crate::errors::{AppError, AppResult};
use crate::models::employee::{Employee, NewEmployee, normalize_email};
use crate::models::role::Role;
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, Row, params};

const COLUMNS: &str = "id, name, email, designation, role, active, created_at";

pub const LIST_SPEC: ListSpec = ListSpec {
    table: "employees",
    columns: COLUMNS,
    search_columns: &["name", "email", "designation"],
    sortable: &[
        ("id", "id"),
        ("name", "name COLLATE NOCASE"),
        ("email", "email"),
        ("designation", "designation COLLATE NOCASE"),
        ("role", "role"),
        ("created_at", "created_at"),
    ],
    default_sort: "name",
};

pub fn map_row(row: &Row) -> rusqlite::Result<Employee> {
    let role_str: String = row.get("role")?;
    let role = Role::from_db_str(&role_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidRole(role_str.clone())),
        )
    })?;

    Ok(Employee {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        designation: row.get("designation")?,
        role,
        active: row.get::<_, i32>("active")? == 1,
        created_at: row.get("created_at")?,
    })
}

pub fn insert(conn: &Connection, e: &NewEmployee) -> AppResult<Employee> {
    conn.execute(
        "INSERT INTO employees (name, email, designation, role, active, created_at)
         VALUES (?1, ?2, ?3, ?4, 1, ?5)",
        params![
            e.name.trim(),
            normalize_email(&e.email),
            e.designation.trim(),
            e.role.to_db_str(),
            Local::now().to_rfc3339(),
        ],
    )?;
    get(conn, conn.last_insert_rowid())
}

pub fn find(conn: &Connection, id: i64) -> AppResult<Option<Employee>> {
    let mut stmt = conn.prepare_cached(&format!("SELECT {COLUMNS} FROM employees WHERE id = ?1"))?;
    Ok(stmt.query_row([id], map_row).optional()?)
}

pub fn get(conn: &Connection, id: i64) -> AppResult<Employee> {
    find(conn, id)?.ok_or_else(|| AppError::not_found("Employee", id))
}

/// True if `email` belongs to an employee other than `except_id`.
pub fn email_taken(conn: &Connection, email: &str, except_id: Option<i64>) -> AppResult<bool> {
    let mut stmt = conn.prepare_cached(
        "SELECT 1 FROM employees WHERE email = ?1 AND id != ?2 LIMIT 1",
    )?;
    Ok(stmt.exists(params![normalize_email(email), except_id.unwrap_or(0)])?)
}

pub fn list(conn: &Connection, query: &ListQuery, default_per_page: u32) -> AppResult<Page<Employee>> {
    fetch_page(conn, &LIST_SPEC, Filter::new(), query, default_per_page, map_row)
}

pub fn update(conn: &Connection, e: &Employee) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE employees
         SET name = ?1, email = ?2, designation = ?3, role = ?4, active = ?5
         WHERE id = ?6",
        params![
            e.name,
            e.email,
            e.designation,
            e.role.to_db_str(),
            if e.active { 1 } else { 0 },
            e.id,
        ],
    )?;
    if n == 0 {
        return Err(AppError::not_found("Employee", e.id));
    }
    Ok(())
}

pub fn delete(conn: &Connection, id: i64) -> AppResult<()> {
    let n = conn.execute("DELETE FROM employees WHERE id = ?1", [id])?;
    if n == 0 {
        return Err(AppError::not_found("Employee", id));
    }
    Ok(())
}

pub fn count_admins(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM employees WHERE role = 'admin' AND active = 1",
        [],
        |row| row.get(0),
    )?)
}
