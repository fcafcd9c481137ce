use crate::core::access::Viewer;
use crate::core::tasks::{TaskLogic, TaskRules};
use crate::db::paging::{ListQuery, Page, SortOrder};
use crate::db::tasks as task_rows;
use crate::errors::{AppError, AppResult};
use crate::models::task::{NewTask, TaskPatch, TaskRecord};
use crate::server::auth::Caller;
use crate::server::extract::{ApiJson, ApiPath, ApiQuery};
use crate::server::state::AppState;
use crate::utils::date::DateWindow;
use crate::utils::time::parse_hours;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::Deserialize;

/// Hours as a JSON number (`1.5`) or an `H:MM` string (`"1:30"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum HoursValue {
    Decimal(f64),
    Text(String),
}

impl HoursValue {
    fn resolve(&self) -> AppResult<f64> {
        match self {
            HoursValue::Decimal(h) => Ok(*h),
            HoursValue::Text(s) => parse_hours(s),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TaskBody {
    pub employee_id: i64,
    pub date: NaiveDate,
    pub project_id: i64,
    pub workstream_id: i64,
    #[serde(default)]
    pub notes: String,
    pub hours: HoursValue,
}

#[derive(Debug, Default, Deserialize)]
pub struct TaskPatchBody {
    pub date: Option<NaiveDate>,
    pub project_id: Option<i64>,
    pub workstream_id: Option<i64>,
    pub notes: Option<String>,
    pub hours: Option<HoursValue>,
}

/// Kept flat: numeric fields do not survive `serde(flatten)` in query strings.
#[derive(Debug, Deserialize)]
pub struct TaskListParams {
    pub employee_id: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub sort: Option<String>,
    #[serde(default)]
    pub order: SortOrder,
}

impl TaskListParams {
    fn window(&self) -> AppResult<Option<DateWindow>> {
        match (self.from, self.to) {
            (None, None) => Ok(None),
            (Some(from), Some(to)) => DateWindow::new(from, to).map(Some),
            _ => Err(AppError::InvalidRange(
                "`from` and `to` must be given together".into(),
            )),
        }
    }

    fn paging(&self) -> ListQuery {
        ListQuery {
            page: self.page,
            per_page: self.per_page,
            search: self.search.clone(),
            sort: self.sort.clone(),
            order: self.order,
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    caller: Caller,
    ApiQuery(params): ApiQuery<TaskListParams>,
) -> AppResult<Json<Page<TaskRecord>>> {
    let viewer = caller.require()?;
    let window = params.window()?;
    let query = params.paging();

    let page = state.with_conn(|conn| {
        TaskLogic::list(
            conn,
            viewer,
            params.employee_id,
            window.as_ref(),
            &query,
            state.page_size(),
        )
    })?;
    Ok(Json(page))
}

pub async fn show(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<TaskRecord>> {
    let viewer = caller.require()?;
    let rec = state.with_conn(|conn| load_visible(conn, viewer, id))?;
    Ok(Json(rec))
}

fn load_visible(conn: &rusqlite::Connection, viewer: &Viewer, id: i64) -> AppResult<TaskRecord> {
    let rec = task_rows::get(conn, id)?;
    viewer.ensure_can_access(rec.employee_id)?;
    Ok(rec)
}

pub async fn create(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(body): ApiJson<TaskBody>,
) -> AppResult<(StatusCode, Json<TaskRecord>)> {
    let viewer = caller.require()?;
    let new = NewTask {
        employee_id: body.employee_id,
        date: body.date,
        project_id: body.project_id,
        workstream_id: body.workstream_id,
        notes: body.notes,
        hours: body.hours.resolve()?,
    };
    let rules = TaskRules::from(state.config.as_ref());

    let rec = state.with_conn(|conn| TaskLogic::create(conn, viewer, &new, rules))?;
    Ok((StatusCode::CREATED, Json(rec)))
}

pub async fn update(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<TaskPatchBody>,
) -> AppResult<Json<TaskRecord>> {
    let viewer = caller.require()?;
    let patch = TaskPatch {
        date: body.date,
        project_id: body.project_id,
        workstream_id: body.workstream_id,
        notes: body.notes,
        hours: body.hours.as_ref().map(HoursValue::resolve).transpose()?,
    };
    let rules = TaskRules::from(state.config.as_ref());

    let rec = state.with_conn(|conn| TaskLogic::update(conn, viewer, id, &patch, rules))?;
    Ok(Json(rec))
}

pub async fn remove(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    let viewer = caller.require()?;
    state.with_conn(|conn| TaskLogic::delete(conn, viewer, id))?;
    Ok(StatusCode::NO_CONTENT)
}
