//! `week`, `day`, `submit` and `reopen`: the timesheet views of one employee.

use crate::cli::commands::{open_pool, resolve_viewer};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::aggregate::{DayTotal, WeekSummary};
use crate::core::submit::SubmissionGate;
use crate::core::timesheet::Timesheet;
use crate::db::{projects, workstreams};
use crate::errors::AppResult;
use crate::ui::messages::{confirm, header, info, locked, success, warning};
use crate::utils::colors::{RESET, color_for_day_total, colorize_duration};
use crate::utils::date::{parse_date_or_today, week_window};
use crate::utils::formatting::{bold, dim, ellipsize, lock_marker};
use crate::utils::table::Table;
use rusqlite::Connection;
use std::collections::HashMap;

pub fn handle(cmd: &Commands, cfg: &Config, acting: Option<i64>) -> AppResult<()> {
    let pool = open_pool(cfg)?;
    let conn = &pool.conn;

    match cmd {
        Commands::Week { date, employee } => {
            let viewer = resolve_viewer(&pool, acting, Some(*employee))?;
            let reference = parse_date_or_today(date.as_ref())?;
            let summary = Timesheet::week(conn, &viewer, *employee, reference)?;
            print!("{}", render_week(conn, &summary, cfg)?);
        }

        Commands::Day { date, employee } => {
            let viewer = resolve_viewer(&pool, acting, Some(*employee))?;
            let date = parse_date_or_today(date.as_ref())?;
            let day = Timesheet::day(conn, &viewer, *employee, date)?;
            print!("{}", render_day(conn, *employee, &day, cfg)?);
        }

        Commands::Submit {
            date,
            employee,
            yes,
        } => {
            let viewer = resolve_viewer(&pool, acting, Some(*employee))?;
            let window = week_window(parse_date_or_today(date.as_ref())?);

            if !*yes
                && !confirm(&format!(
                    "Finally submit week {} for employee #{}? Entries become read-only.",
                    window.label(),
                    employee
                ))
            {
                warning("Submission cancelled.");
                return Ok(());
            }

            let n = SubmissionGate::submit(conn, &viewer, *employee, &window)?;
            if n == 0 {
                warning(format!("No open entries in week {}.", window.label()));
            } else {
                locked(format!("Week {} submitted ({} entries locked).", window.label(), n));
            }
        }

        Commands::Reopen { date, employee } => {
            let viewer = resolve_viewer(&pool, acting, None)?;
            let window = week_window(parse_date_or_today(date.as_ref())?);
            let n = SubmissionGate::reopen(conn, &viewer, *employee, &window)?;
            if n == 0 {
                warning(format!("No submitted entries in week {}.", window.label()));
            } else {
                success(format!("Week {} reopened ({} entries).", window.label(), n));
            }
        }

        _ => {}
    }

    Ok(())
}

struct Names {
    projects: HashMap<i64, String>,
    workstreams: HashMap<i64, String>,
}

impl Names {
    fn load(conn: &Connection) -> AppResult<Self> {
        Ok(Self {
            projects: projects::names(conn)?,
            workstreams: workstreams::names(conn)?,
        })
    }

    fn project(&self, id: i64) -> String {
        self.projects.get(&id).cloned().unwrap_or_else(|| format!("#{id}"))
    }

    fn workstream(&self, id: i64) -> String {
        self.workstreams
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("#{id}"))
    }
}

fn colored_total(day: &DayTotal, expected_minutes: i64) -> String {
    format!(
        "{}{}{}",
        color_for_day_total(day.minutes, expected_minutes),
        day.hhmm,
        RESET
    )
}

fn add_day_rows(table: &mut Table, day: &DayTotal, names: &Names) {
    if day.entries.is_empty() {
        table.add_row(vec![
            day.date.to_string(),
            day.weekday.clone(),
            String::new(),
            dim("-"),
            dim("-"),
            colorize_duration("0:00", 0),
            String::new(),
            String::new(),
        ]);
        return;
    }

    for (i, e) in day.entries.iter().enumerate() {
        let (date, weekday) = if i == 0 {
            (day.date.to_string(), day.weekday.clone())
        } else {
            (String::new(), String::new())
        };
        table.add_row(vec![
            date,
            weekday,
            e.id.to_string(),
            names.project(e.project_id),
            names.workstream(e.workstream_id),
            colorize_duration(&e.hhmm(), e.minutes()),
            lock_marker(e.final_submit),
            ellipsize(&e.notes, 40),
        ]);
    }
}

fn entry_table() -> Table {
    Table::new(vec![
        "DATE", "DAY", "ID", "PROJECT", "WORKSTREAM", "HOURS", "STATUS", "NOTES",
    ])
}

pub fn render_week(conn: &Connection, s: &WeekSummary, cfg: &Config) -> AppResult<String> {
    let names = Names::load(conn)?;
    let sep = cfg.separator();
    let expected = cfg.expected_daily_minutes();

    header(
        format!("Week {} · employee #{}", s.window.label(), s.employee_id),
        sep,
    );

    let mut entries = entry_table();
    for day in &s.days {
        add_day_rows(&mut entries, day, &names);
    }

    let mut totals = Table::new(vec!["DAY", "DATE", "TOTAL"]);
    for day in &s.days {
        totals.add_row(vec![
            day.weekday.clone(),
            day.date.to_string(),
            colored_total(day, expected),
        ]);
    }

    let mut out = entries.render(sep);
    out.push('\n');
    out.push_str(&totals.render(sep));

    if !s.projects.is_empty() {
        let mut per_project = Table::new(vec!["PROJECT", "TOTAL"]);
        for p in &s.projects {
            per_project.add_row(vec![names.project(p.project_id), p.hhmm.clone()]);
        }
        out.push('\n');
        out.push_str(&per_project.render(sep));
    }

    out.push_str(&format!("\n{} {}\n", bold("Week total:"), s.total_hhmm));
    out.push_str(&if s.submitted {
        lock_marker(true)
    } else {
        dim("not submitted")
    });
    out.push('\n');
    Ok(out)
}

pub fn render_day(
    conn: &Connection,
    employee_id: i64,
    day: &DayTotal,
    cfg: &Config,
) -> AppResult<String> {
    let names = Names::load(conn)?;
    let sep = cfg.separator();

    header(
        format!("{} {} · employee #{}", day.weekday, day.date, employee_id),
        sep,
    );

    if day.entries.is_empty() {
        info("No time entries for this day.");
    }

    let mut table = entry_table();
    add_day_rows(&mut table, day, &names);

    let mut out = table.render(sep);
    out.push_str(&format!(
        "\n{} {}\n",
        bold("Day total:"),
        colored_total(day, cfg.expected_daily_minutes())
    ));
    Ok(out)
}
