//! Role-based views: who may see and change whose data.

use crate::db::employees;
use crate::errors::{AppError, AppResult};
use crate::models::role::Role;
use rusqlite::Connection;

/// The acting user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    pub employee_id: i64,
    pub role: Role,
}

impl Viewer {
    /// Resolve an employee id into a viewer. Unknown or inactive → Unauthorized.
    pub fn resolve(conn: &Connection, employee_id: i64) -> AppResult<Self> {
        match employees::find(conn, employee_id)? {
            Some(e) if e.active => Ok(Self {
                employee_id: e.id,
                role: e.role,
            }),
            Some(_) => Err(AppError::Unauthorized(format!(
                "employee #{employee_id} is inactive"
            ))),
            None => Err(AppError::Unauthorized(format!(
                "unknown employee #{employee_id}"
            ))),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden("admin role required".into()))
        }
    }

    /// Admins act on anyone's timesheet, employees only on their own.
    pub fn ensure_can_access(&self, employee_id: i64) -> AppResult<()> {
        if self.is_admin() || self.employee_id == employee_id {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "employee #{} cannot access the timesheet of employee #{}",
                self.employee_id, employee_id
            )))
        }
    }

    /// Narrow a requested employee filter to what this viewer may list.
    /// `None` for an admin means "everyone".
    pub fn scope(&self, requested: Option<i64>) -> AppResult<Option<i64>> {
        match requested {
            Some(id) => {
                self.ensure_can_access(id)?;
                Ok(Some(id))
            }
            None if self.is_admin() => Ok(None),
            None => Ok(Some(self.employee_id)),
        }
    }
}

/// Management operations (employees, projects, workstreams) need an admin,
/// except while no active admin exists yet, so the first one can be created.
pub fn authorize_management(conn: &Connection, viewer: Option<&Viewer>) -> AppResult<()> {
    if employees::count_admins(conn)? == 0 {
        return Ok(());
    }
    match viewer {
        Some(v) => v.require_admin(),
        None => Err(AppError::Unauthorized(
            "an admin identity is required for this operation".into(),
        )),
    }
}
