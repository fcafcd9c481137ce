use crate::core::access::{Viewer, authorize_management};
use crate::db::paging::{ListQuery, Page};
use crate::db::tasks::{TaskRef, count_referencing};
use crate::db::{employees, log};
use crate::errors::{AppError, AppResult};
use crate::models::employee::{Employee, EmployeePatch, NewEmployee};
use rusqlite::Connection;

/// Employee resource service.
pub struct EmployeeLogic;

impl EmployeeLogic {
    pub fn create(conn: &Connection, viewer: Option<&Viewer>, new: &NewEmployee) -> AppResult<Employee> {
        authorize_management(conn, viewer)?;
        let tx = conn.unchecked_transaction()?;
        new.validate()?;

        if employees::email_taken(&tx, &new.email, None)? {
            return Err(AppError::Conflict(format!(
                "email '{}' is already registered",
                new.email.trim()
            )));
        }

        let e = employees::insert(&tx, new)?;
        log::ttlog(
            &tx,
            "employee_add",
            &format!("employee #{}", e.id),
            &format!("Added {} <{}> as {}", e.name, e.email, e.role.to_db_str()),
        )?;
        tx.commit()?;
        Ok(e)
    }

    pub fn get(conn: &Connection, viewer: &Viewer, id: i64) -> AppResult<Employee> {
        viewer.ensure_can_access(id)?;
        employees::get(conn, id)
    }

    /// Admins page through everyone; an employee only ever sees their own row.
    pub fn list(
        conn: &Connection,
        viewer: &Viewer,
        query: &ListQuery,
        default_per_page: u32,
    ) -> AppResult<Page<Employee>> {
        if viewer.is_admin() {
            return employees::list(conn, query, default_per_page);
        }

        let me = employees::get(conn, viewer.employee_id)?;
        let per_page = query.resolve_per_page(default_per_page)?;
        Ok(Page {
            items: vec![me],
            total: 1,
            page: 1,
            per_page,
            total_pages: 1,
        })
    }

    pub fn update(
        conn: &Connection,
        viewer: Option<&Viewer>,
        id: i64,
        patch: &EmployeePatch,
    ) -> AppResult<Employee> {
        authorize_management(conn, viewer)?;
        let tx = conn.unchecked_transaction()?;

        let mut e = employees::get(&tx, id)?;
        let was_active_admin = e.role.is_admin() && e.active;
        e.apply(patch)?;

        if employees::email_taken(&tx, &e.email, Some(id))? {
            return Err(AppError::Conflict(format!(
                "email '{}' is already registered",
                e.email
            )));
        }

        let still_active_admin = e.role.is_admin() && e.active;
        if was_active_admin && !still_active_admin && employees::count_admins(&tx)? <= 1 {
            return Err(AppError::Conflict(
                "cannot demote or deactivate the last active admin".into(),
            ));
        }

        employees::update(&tx, &e)?;
        log::ttlog(
            &tx,
            "employee_edit",
            &format!("employee #{id}"),
            &format!("Updated {} <{}>", e.name, e.email),
        )?;
        tx.commit()?;
        Ok(e)
    }

    pub fn delete(conn: &Connection, viewer: Option<&Viewer>, id: i64) -> AppResult<()> {
        authorize_management(conn, viewer)?;
        let tx = conn.unchecked_transaction()?;

        let e = employees::get(&tx, id)?;
        if count_referencing(&tx, TaskRef::Employee, id)? > 0 {
            return Err(AppError::InUse {
                kind: "Employee",
                id,
            });
        }
        if e.role.is_admin() && e.active && employees::count_admins(&tx)? <= 1 {
            return Err(AppError::Conflict("cannot delete the last active admin".into()));
        }

        employees::delete(&tx, id)?;
        log::ttlog(
            &tx,
            "employee_del",
            &format!("employee #{id}"),
            &format!("Deleted {} <{}>", e.name, e.email),
        )?;
        tx.commit()?;
        Ok(())
    }
}
