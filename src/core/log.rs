use crate::db::log::{LogRow, load_log};
use crate::errors::AppResult;
use crate::utils::table::Table;
use ansi_term::Colour;
use rusqlite::Connection;

/// ANSI color for an audit operation.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "task_add" | "employee_add" | "project_add" | "workstream_add" => Colour::Green,
        "task_del" | "employee_del" | "project_del" | "workstream_del" => Colour::Red,
        "task_edit" | "employee_edit" | "project_edit" | "workstream_edit" => Colour::Yellow,
        "submit" => Colour::Cyan,
        "reopen" => Colour::RGB(255, 153, 51),
        "migration_applied" => Colour::Purple,
        "backup" | "export" => Colour::Blue,
        _ => Colour::White,
    }
}

fn format_date(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%FT%T%:z").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub struct LogLogic;

impl LogLogic {
    pub fn render(rows: &[LogRow], separator: char) -> String {
        let mut table = Table::new(vec!["ID", "DATE", "OPERATION", "MESSAGE"]);

        for r in rows {
            let op_target = if r.target.is_empty() {
                r.operation.clone()
            } else {
                format!("{} ({})", r.operation, r.target)
            };
            table.add_row(vec![
                r.id.to_string(),
                format_date(&r.date),
                color_for_operation(&r.operation).paint(op_target).to_string(),
                r.message.clone(),
            ]);
        }

        table.render(separator)
    }

    pub fn print_log(conn: &Connection, separator: char) -> AppResult<()> {
        let rows = load_log(conn)?;
        if rows.is_empty() {
            println!("No log entries.");
            return Ok(());
        }
        print!("{}", Self::render(&rows, separator));
        Ok(())
    }
}
