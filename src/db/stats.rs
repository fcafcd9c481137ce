use crate::db::migrate::applied_versions;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension};
use std::fs;

#[derive(Debug, Clone, Default)]
pub struct DbStats {
    pub employees: i64,
    pub projects: i64,
    pub workstreams: i64,
    pub tasks: i64,
    pub submitted_tasks: i64,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

fn count(conn: &Connection, sql: &str) -> rusqlite::Result<i64> {
    conn.query_row(sql, [], |row| row.get(0))
}

pub fn collect(conn: &Connection) -> AppResult<DbStats> {
    let first_date: Option<String> = conn
        .query_row("SELECT MIN(date) FROM tasks", [], |row| row.get(0))
        .optional()?
        .flatten();
    let last_date: Option<String> = conn
        .query_row("SELECT MAX(date) FROM tasks", [], |row| row.get(0))
        .optional()?
        .flatten();

    Ok(DbStats {
        employees: count(conn, "SELECT COUNT(*) FROM employees")?,
        projects: count(conn, "SELECT COUNT(*) FROM projects")?,
        workstreams: count(conn, "SELECT COUNT(*) FROM workstreams")?,
        tasks: count(conn, "SELECT COUNT(*) FROM tasks")?,
        submitted_tasks: count(conn, "SELECT COUNT(*) FROM tasks WHERE final_submit = 1")?,
        first_date,
        last_date,
    })
}

pub fn print_db_info(conn: &Connection, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) ROW COUNTS
    //
    let s = collect(conn)?;
    println!("{}• Employees:{} {}{}{}", CYAN, RESET, GREEN, s.employees, RESET);
    println!("{}• Projects:{} {}{}{}", CYAN, RESET, GREEN, s.projects, RESET);
    println!("{}• Workstreams:{} {}{}{}", CYAN, RESET, GREEN, s.workstreams, RESET);
    println!(
        "{}• Time entries:{} {}{}{} ({} submitted)",
        CYAN, RESET, GREEN, s.tasks, RESET, s.submitted_tasks
    );

    let versions = applied_versions(conn)?;
    println!(
        "{}• Schema:{} {} migrations (latest: {})",
        CYAN,
        RESET,
        versions.len(),
        versions.last().map(String::as_str).unwrap_or("none")
    );

    //
    // 3) DATE RANGE
    //
    let fmt_first = s
        .first_date
        .clone()
        .unwrap_or_else(|| format!("{GREY}--{RESET}"));
    let fmt_last = s
        .last_date
        .clone()
        .unwrap_or_else(|| format!("{GREY}--{RESET}"));

    println!("{}• Date range:{}", CYAN, RESET);
    println!("    from: {}", fmt_first);
    println!("    to:   {}", fmt_last);

    //
    // 4) AVERAGE ENTRIES/DAY
    //
    if let (Some(f), Some(l)) = (&s.first_date, &s.last_date)
        && let (Ok(d1), Ok(d2)) = (
            NaiveDate::parse_from_str(f, "%Y-%m-%d"),
            NaiveDate::parse_from_str(l, "%Y-%m-%d"),
        )
    {
        let days = (d2 - d1).num_days() + 1;
        let avg = s.tasks as f64 / days as f64;
        println!("{}• Average entries/day:{} {:.2}", CYAN, RESET, avg);
    }

    println!();
    Ok(())
}
