//! Week/day timesheet views: window → store → totals.

use crate::core::access::Viewer;
use crate::core::aggregate::{DayTotal, WeekSummary, summarize_day, summarize_week};
use crate::core::store::TimeEntryStore;
use crate::db::employees;
use crate::errors::AppResult;
use crate::utils::date::{day_window, week_window};
use chrono::NaiveDate;
use rusqlite::Connection;

pub struct Timesheet;

impl Timesheet {
    /// Load the Monday..Sunday store around `reference`.
    pub fn load_week(
        conn: &Connection,
        viewer: &Viewer,
        employee_id: i64,
        reference: NaiveDate,
    ) -> AppResult<TimeEntryStore> {
        viewer.ensure_can_access(employee_id)?;
        employees::get(conn, employee_id)?;
        TimeEntryStore::load(conn, employee_id, week_window(reference))
    }

    pub fn week(
        conn: &Connection,
        viewer: &Viewer,
        employee_id: i64,
        reference: NaiveDate,
    ) -> AppResult<WeekSummary> {
        let store = Self::load_week(conn, viewer, employee_id, reference)?;
        Ok(summarize_week(&store))
    }

    pub fn day(
        conn: &Connection,
        viewer: &Viewer,
        employee_id: i64,
        date: NaiveDate,
    ) -> AppResult<DayTotal> {
        viewer.ensure_can_access(employee_id)?;
        employees::get(conn, employee_id)?;
        let store = TimeEntryStore::load(conn, employee_id, day_window(date))?;
        Ok(summarize_day(&store, date))
    }
}
