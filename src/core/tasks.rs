//! Time entry lifecycle: create, edit, delete, always behind the submission lock.

use crate::config::Config;
use crate::core::access::Viewer;
use crate::core::store::TimeEntryStore;
use crate::db::paging::{ListQuery, Page};
use crate::db::{employees, log, projects, tasks, workstreams};
use crate::errors::{AppError, AppResult};
use crate::models::task::{NewTask, TaskPatch, TaskRecord};
use crate::utils::date::{DateWindow, week_window};
use crate::utils::time::{
    MAX_HOURS_PER_ENTRY, format_hours, format_minutes, hours_to_minutes, validate_hours,
};
use rusqlite::Connection;

pub const MAX_NOTES_LEN: usize = 500;

/// Limits applied when booking hours.
#[derive(Debug, Clone, Copy)]
pub struct TaskRules {
    pub max_hours_per_day: f64,
}

impl Default for TaskRules {
    fn default() -> Self {
        Self {
            max_hours_per_day: 24.0,
        }
    }
}

impl From<&Config> for TaskRules {
    fn from(cfg: &Config) -> Self {
        Self {
            max_hours_per_day: cfg.max_hours_per_day,
        }
    }
}

pub struct TaskLogic;

impl TaskLogic {
    pub fn create(
        conn: &Connection,
        viewer: &Viewer,
        new: &NewTask,
        rules: TaskRules,
    ) -> AppResult<TaskRecord> {
        viewer.ensure_can_access(new.employee_id)?;

        let tx = conn.unchecked_transaction()?;
        let mut rec = TaskRecord::from_new(new);
        validate(&tx, &rec, None, rules)?;
        week_store(&tx, &rec)?.ensure_open()?;

        rec.id = tasks::insert(&tx, &rec)?;
        log::ttlog(
            &tx,
            "task_add",
            &format!("task #{}", rec.id),
            &format!(
                "employee #{} booked {} on {}",
                rec.employee_id,
                format_hours(rec.hours),
                rec.date
            ),
        )?;
        tx.commit()?;
        Ok(rec)
    }

    pub fn update(
        conn: &Connection,
        viewer: &Viewer,
        id: i64,
        patch: &TaskPatch,
        rules: TaskRules,
    ) -> AppResult<TaskRecord> {
        let tx = conn.unchecked_transaction()?;
        let mut rec = tasks::get(&tx, id)?;
        viewer.ensure_can_access(rec.employee_id)?;
        week_store(&tx, &rec)?.ensure_editable(id)?;

        if patch.is_empty() {
            return Ok(rec);
        }

        rec.apply(patch);
        validate(&tx, &rec, Some(id), rules)?;
        week_store(&tx, &rec)?.ensure_open()?;

        tasks::update(&tx, &rec)?;
        log::ttlog(
            &tx,
            "task_edit",
            &format!("task #{id}"),
            &format!("{} on {}", format_hours(rec.hours), rec.date),
        )?;
        tx.commit()?;
        Ok(rec)
    }

    pub fn delete(conn: &Connection, viewer: &Viewer, id: i64) -> AppResult<()> {
        let tx = conn.unchecked_transaction()?;
        let rec = tasks::get(&tx, id)?;
        viewer.ensure_can_access(rec.employee_id)?;
        week_store(&tx, &rec)?.ensure_editable(id)?;

        tasks::delete(&tx, id)?;
        log::ttlog(
            &tx,
            "task_del",
            &format!("task #{id}"),
            &format!(
                "removed {} on {} for employee #{}",
                format_hours(rec.hours),
                rec.date,
                rec.employee_id
            ),
        )?;
        tx.commit()?;
        Ok(())
    }

    pub fn list(
        conn: &Connection,
        viewer: &Viewer,
        employee_id: Option<i64>,
        window: Option<&DateWindow>,
        query: &ListQuery,
        default_per_page: u32,
    ) -> AppResult<Page<TaskRecord>> {
        let scope = viewer.scope(employee_id)?;
        tasks::list(conn, scope, window, query, default_per_page)
    }
}

/// The employee's entries for the week that contains `rec`.
fn week_store(conn: &Connection, rec: &TaskRecord) -> AppResult<TimeEntryStore> {
    TimeEntryStore::load(conn, rec.employee_id, week_window(rec.date))
}

fn validate(
    conn: &Connection,
    rec: &TaskRecord,
    except_id: Option<i64>,
    rules: TaskRules,
) -> AppResult<()> {
    let employee = employees::get(conn, rec.employee_id)?;
    if !employee.active {
        return Err(AppError::Validation(format!(
            "employee #{} is inactive",
            employee.id
        )));
    }

    let project = projects::get(conn, rec.project_id)?;
    if !project.active {
        return Err(AppError::Validation(format!(
            "project '{}' is not active",
            project.name
        )));
    }

    let ws = workstreams::get(conn, rec.workstream_id)?;
    if ws.project_id != project.id {
        return Err(AppError::Validation(format!(
            "workstream '{}' does not belong to project '{}'",
            ws.name, project.name
        )));
    }

    validate_hours(rec.hours, MAX_HOURS_PER_ENTRY)?;

    if rec.notes.chars().count() > MAX_NOTES_LEN {
        return Err(AppError::Validation(format!(
            "notes exceed {MAX_NOTES_LEN} characters"
        )));
    }

    let booked = tasks::day_minutes(conn, rec.employee_id, rec.date, except_id)?;
    if booked + hours_to_minutes(rec.hours) > hours_to_minutes(rules.max_hours_per_day) {
        return Err(AppError::Validation(format!(
            "{} would exceed {} on {} ({} already booked)",
            format_hours(rec.hours),
            format_hours(rules.max_hours_per_day),
            rec.date,
            format_minutes(booked)
        )));
    }

    Ok(())
}
