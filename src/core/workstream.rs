use crate::core::access::{Viewer, authorize_management};
use crate::db::paging::{ListQuery, Page};
use crate::db::tasks::{TaskRef, count_referencing};
use crate::db::{log, projects, workstreams};
use crate::errors::{AppError, AppResult};
use crate::models::workstream::{NewWorkstream, Workstream, WorkstreamPatch};
use rusqlite::Connection;

/// Workstream resource service.
pub struct WorkstreamLogic;

impl WorkstreamLogic {
    pub fn create(
        conn: &Connection,
        viewer: Option<&Viewer>,
        new: &NewWorkstream,
    ) -> AppResult<Workstream> {
        authorize_management(conn, viewer)?;
        let tx = conn.unchecked_transaction()?;
        new.validate()?;

        let project = projects::get(&tx, new.project_id)?;
        if workstreams::name_taken(&tx, new.project_id, &new.name, None)? {
            return Err(AppError::Conflict(format!(
                "workstream '{}' already exists in project {}",
                new.name.trim(),
                project.name
            )));
        }

        let w = workstreams::insert(&tx, new)?;
        log::ttlog(
            &tx,
            "workstream_add",
            &format!("workstream #{}", w.id),
            &format!("Added workstream {} to project {}", w.name, project.name),
        )?;
        tx.commit()?;
        Ok(w)
    }

    pub fn get(conn: &Connection, id: i64) -> AppResult<Workstream> {
        workstreams::get(conn, id)
    }

    pub fn list(
        conn: &Connection,
        project_id: Option<i64>,
        query: &ListQuery,
        default_per_page: u32,
    ) -> AppResult<Page<Workstream>> {
        if let Some(p) = project_id {
            projects::get(conn, p)?;
        }
        workstreams::list(conn, project_id, query, default_per_page)
    }

    pub fn update(
        conn: &Connection,
        viewer: Option<&Viewer>,
        id: i64,
        patch: &WorkstreamPatch,
    ) -> AppResult<Workstream> {
        authorize_management(conn, viewer)?;
        let tx = conn.unchecked_transaction()?;

        let mut w = workstreams::get(&tx, id)?;
        w.apply(patch)?;

        if workstreams::name_taken(&tx, w.project_id, &w.name, Some(id))? {
            return Err(AppError::Conflict(format!(
                "workstream '{}' already exists in this project",
                w.name
            )));
        }

        workstreams::update(&tx, &w)?;
        log::ttlog(
            &tx,
            "workstream_edit",
            &format!("workstream #{id}"),
            &format!("Updated workstream {}", w.name),
        )?;
        tx.commit()?;
        Ok(w)
    }

    pub fn delete(conn: &Connection, viewer: Option<&Viewer>, id: i64) -> AppResult<()> {
        authorize_management(conn, viewer)?;
        let tx = conn.unchecked_transaction()?;

        let w = workstreams::get(&tx, id)?;
        if count_referencing(&tx, TaskRef::Workstream, id)? > 0 {
            return Err(AppError::InUse {
                kind: "Workstream",
                id,
            });
        }

        workstreams::delete(&tx, id)?;
        log::ttlog(
            &tx,
            "workstream_del",
            &format!("workstream #{id}"),
            &format!("Deleted workstream {}", w.name),
        )?;
        tx.commit()?;
        Ok(())
    }
}
