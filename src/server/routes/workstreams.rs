use crate::core::workstream::WorkstreamLogic;
use crate::db::paging::{ListQuery, Page, SortOrder};
use crate::errors::AppResult;
use crate::models::workstream::{NewWorkstream, Workstream, WorkstreamPatch};
use crate::server::auth::Caller;
use crate::server::extract::{ApiJson, ApiPath, ApiQuery};
use crate::server::state::AppState;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;

/// Kept flat: numeric fields do not survive `serde(flatten)` in query strings.
#[derive(Debug, Deserialize)]
pub struct WorkstreamListParams {
    pub project_id: Option<i64>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub sort: Option<String>,
    #[serde(default)]
    pub order: SortOrder,
}

impl WorkstreamListParams {
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
    ApiQuery(params): ApiQuery<WorkstreamListParams>,
) -> AppResult<Json<Page<Workstream>>> {
    caller.require()?;
    let query = params.paging();
    let page = state.with_conn(|conn| {
        WorkstreamLogic::list(conn, params.project_id, &query, state.page_size())
    })?;
    Ok(Json(page))
}

pub async fn show(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Workstream>> {
    caller.require()?;
    Ok(Json(state.with_conn(|conn| WorkstreamLogic::get(conn, id))?))
}

pub async fn create(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(body): ApiJson<NewWorkstream>,
) -> AppResult<(StatusCode, Json<Workstream>)> {
    let w = state.with_conn(|conn| WorkstreamLogic::create(conn, caller.optional(), &body))?;
    Ok((StatusCode::CREATED, Json(w)))
}

pub async fn update(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<WorkstreamPatch>,
) -> AppResult<Json<Workstream>> {
    let w =
        state.with_conn(|conn| WorkstreamLogic::update(conn, caller.optional(), id, &patch))?;
    Ok(Json(w))
}

pub async fn remove(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    state.with_conn(|conn| WorkstreamLogic::delete(conn, caller.optional(), id))?;
    Ok(StatusCode::NO_CONTENT)
}
