//! Submission gate: bulk lock (and admin unlock) of a date window.

use crate::core::access::Viewer;
use crate::db::{employees, log, tasks};
use crate::errors::AppResult;
use crate::utils::date::DateWindow;
use rusqlite::Connection;

pub struct SubmissionGate;

impl SubmissionGate {
    /// Lock every open entry of the employee inside `window`.
    /// Returns how many entries were flipped; 0 when nothing was open.
    pub fn submit(
        conn: &Connection,
        viewer: &Viewer,
        employee_id: i64,
        window: &DateWindow,
    ) -> AppResult<usize> {
        viewer.ensure_can_access(employee_id)?;
        employees::get(conn, employee_id)?;

        let tx = conn.unchecked_transaction()?;
        let flipped = tasks::set_final_submit(&tx, employee_id, window, true)?;

        log::ttlog(
            &tx,
            "submit",
            &format!("employee #{employee_id}"),
            &format!("Submitted {} ({} entries)", window.label(), flipped),
        )?;
        tx.commit()?;

        Ok(flipped)
    }

    /// Unlock the employee's entries inside `window`. Admin only.
    pub fn reopen(
        conn: &Connection,
        viewer: &Viewer,
        employee_id: i64,
        window: &DateWindow,
    ) -> AppResult<usize> {
        viewer.require_admin()?;
        employees::get(conn, employee_id)?;

        let tx = conn.unchecked_transaction()?;
        let flipped = tasks::set_final_submit(&tx, employee_id, window, false)?;

        log::ttlog(
            &tx,
            "reopen",
            &format!("employee #{employee_id}"),
            &format!(
                "Reopened {} ({} entries) by employee #{}",
                window.label(),
                flipped,
                viewer.employee_id
            ),
        )?;
        tx.commit()?;

        Ok(flipped)
    }
}
