//! Schema migrations.
//!
//! Every migration is identified by a version string and recorded in the
//! `log` table as a `migration_applied` row, so it runs exactly once.

use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension};

struct Migration {
    version: &'static str,
    message: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20260105_0001_create_core_tables",
        message: "Created employees, projects, workstreams and tasks tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS employees (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            name         TEXT NOT NULL,
            email        TEXT NOT NULL UNIQUE,
            designation  TEXT NOT NULL DEFAULT '',
            role         TEXT NOT NULL DEFAULT 'employee' CHECK(role IN ('admin','employee')),
            active       INTEGER NOT NULL DEFAULT 1,
            created_at   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS projects (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            name         TEXT NOT NULL UNIQUE COLLATE NOCASE,
            client       TEXT NOT NULL DEFAULT '',
            description  TEXT NOT NULL DEFAULT '',
            active       INTEGER NOT NULL DEFAULT 1,
            created_at   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS workstreams (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id   INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            name         TEXT NOT NULL COLLATE NOCASE,
            description  TEXT NOT NULL DEFAULT '',
            created_at   TEXT NOT NULL,
            UNIQUE(project_id, name)
        );

        CREATE TABLE IF NOT EXISTS tasks (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id    INTEGER NOT NULL REFERENCES employees(id) ON DELETE RESTRICT,
            date           TEXT NOT NULL,
            project_id     INTEGER NOT NULL REFERENCES projects(id) ON DELETE RESTRICT,
            workstream_id  INTEGER NOT NULL REFERENCES workstreams(id) ON DELETE RESTRICT,
            notes          TEXT NOT NULL DEFAULT '',
            hours          REAL NOT NULL CHECK(hours > 0),
            final_submit   INTEGER NOT NULL DEFAULT 0,
            created_at     TEXT NOT NULL,
            updated_at     TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20260105_0002_task_indexes",
        message: "Added task lookup indexes",
        sql: r#"
        CREATE INDEX IF NOT EXISTS idx_tasks_employee_date ON tasks(employee_id, date);
        CREATE INDEX IF NOT EXISTS idx_tasks_project ON tasks(project_id);
        CREATE INDEX IF NOT EXISTS idx_tasks_workstream ON tasks(workstream_id);
        CREATE INDEX IF NOT EXISTS idx_workstreams_project ON workstreams(project_id);
        "#,
    },
];

/// Ensure that the `log` table exists: it doubles as the migration ledger.
fn ensure_log_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )
}

fn is_applied(conn: &Connection, version: &str) -> rusqlite::Result<bool> {
    let mut chk = conn.prepare_cached(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(m.sql)
        .map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;

    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [m.version, m.message],
    )?;

    tx.commit()?;
    Ok(())
}

/// Public entry point: run all pending migrations.
/// Returns the versions applied by this call.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;

    let mut applied = Vec::new();
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m)?;
        applied.push(m.version);
    }

    Ok(applied)
}

/// Versions applied so far, oldest first.
pub fn applied_versions(conn: &Connection) -> AppResult<Vec<String>> {
    ensure_log_table(conn)?;
    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}
