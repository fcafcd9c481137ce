pub mod backup;
pub mod config;
pub mod db;
pub mod employee;
pub mod export;
pub mod init;
pub mod log;
pub mod project;
pub mod serve;
pub mod task;
pub mod timesheet;
pub mod workstream;

use crate::config::Config;
use crate::core::access::Viewer;
use crate::db::paging::Page;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::utils::formatting::dim;

/// Open the configured database, bringing the schema up to date.
pub(crate) fn open_pool(cfg: &Config) -> AppResult<DbPool> {
    DbPool::open(&cfg.database)
}

/// Resolve `--as`, falling back to the employee the command addresses.
pub(crate) fn resolve_viewer(
    pool: &DbPool,
    acting: Option<i64>,
    fallback: Option<i64>,
) -> AppResult<Viewer> {
    let id = acting.or(fallback).ok_or_else(|| {
        AppError::Unauthorized("no acting employee: pass --as <EMPLOYEE_ID>".into())
    })?;
    Viewer::resolve(&pool.conn, id)
}

/// Management commands may run without `--as` while no admin exists.
pub(crate) fn optional_viewer(pool: &DbPool, acting: Option<i64>) -> AppResult<Option<Viewer>> {
    acting
        .map(|id| Viewer::resolve(&pool.conn, id))
        .transpose()
}

/// Footer line printed under every paged table.
pub(crate) fn page_footer<T>(page: &Page<T>) -> String {
    dim(&format!(
        "page {}/{} · {} of {} rows",
        page.page,
        page.total_pages.max(1),
        page.items.len(),
        page.total
    ))
}
