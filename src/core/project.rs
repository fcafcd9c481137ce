use crate::core::access::{Viewer, authorize_management};
use crate::db::paging::{ListQuery, Page};
use crate::db::tasks::{TaskRef, count_referencing};
use crate::db::{log, projects};
use crate::errors::{AppError, AppResult};
use crate::models::project::{NewProject, Project, ProjectPatch};
use rusqlite::Connection;

/// Project resource service.
pub struct ProjectLogic;

impl ProjectLogic {
    pub fn create(conn: &Connection, viewer: Option<&Viewer>, new: &NewProject) -> AppResult<Project> {
        authorize_management(conn, viewer)?;
        let tx = conn.unchecked_transaction()?;
        new.validate()?;

        if projects::name_taken(&tx, &new.name, None)? {
            return Err(AppError::Conflict(format!(
                "project '{}' already exists",
                new.name.trim()
            )));
        }

        let p = projects::insert(&tx, new)?;
        log::ttlog(
            &tx,
            "project_add",
            &format!("project #{}", p.id),
            &format!("Added project {}", p.name),
        )?;
        tx.commit()?;
        Ok(p)
    }

    pub fn get(conn: &Connection, id: i64) -> AppResult<Project> {
        projects::get(conn, id)
    }

    pub fn list(conn: &Connection, query: &ListQuery, default_per_page: u32) -> AppResult<Page<Project>> {
        projects::list(conn, query, default_per_page)
    }

    pub fn update(
        conn: &Connection,
        viewer: Option<&Viewer>,
        id: i64,
        patch: &ProjectPatch,
    ) -> AppResult<Project> {
        authorize_management(conn, viewer)?;
        let tx = conn.unchecked_transaction()?;

        let mut p = projects::get(&tx, id)?;
        p.apply(patch)?;

        if projects::name_taken(&tx, &p.name, Some(id))? {
            return Err(AppError::Conflict(format!("project '{}' already exists", p.name)));
        }

        projects::update(&tx, &p)?;
        log::ttlog(
            &tx,
            "project_edit",
            &format!("project #{id}"),
            &format!("Updated project {}", p.name),
        )?;
        tx.commit()?;
        Ok(p)
    }

    /// Refused while time entries reference the project; otherwise its
    /// workstreams are removed with it.
    pub fn delete(conn: &Connection, viewer: Option<&Viewer>, id: i64) -> AppResult<()> {
        authorize_management(conn, viewer)?;
        let tx = conn.unchecked_transaction()?;

        let p = projects::get(&tx, id)?;
        if count_referencing(&tx, TaskRef::Project, id)? > 0
            || crate::db::tasks::count_for_project_workstreams(&tx, id)? > 0
        {
            return Err(AppError::InUse { kind: "Project", id });
        }

        projects::delete(&tx, id)?;
        log::ttlog(
            &tx,
            "project_del",
            &format!("project #{id}"),
            &format!("Deleted project {} and its workstreams", p.name),
        )?;
        tx.commit()?;
        Ok(())
    }
}
