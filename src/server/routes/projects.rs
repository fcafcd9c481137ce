use crate::core::project::ProjectLogic;
use crate::db::paging::{ListQuery, Page};
use crate::errors::AppResult;
use crate::models::project::{NewProject, Project, ProjectPatch};
use crate::server::auth::Caller;
use crate::server::extract::{ApiJson, ApiPath, ApiQuery};
use crate::server::state::AppState;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};

pub async fn list(
    State(state): State<AppState>,
    caller: Caller,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> AppResult<Json<Page<Project>>> {
    caller.require()?;
    let page = state.with_conn(|conn| ProjectLogic::list(conn, &query, state.page_size()))?;
    Ok(Json(page))
}

pub async fn show(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Project>> {
    caller.require()?;
    Ok(Json(state.with_conn(|conn| ProjectLogic::get(conn, id))?))
}

pub async fn create(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(body): ApiJson<NewProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    let p = state.with_conn(|conn| ProjectLogic::create(conn, caller.optional(), &body))?;
    Ok((StatusCode::CREATED, Json(p)))
}

pub async fn update(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<ProjectPatch>,
) -> AppResult<Json<Project>> {
    let p = state.with_conn(|conn| ProjectLogic::update(conn, caller.optional(), id, &patch))?;
    Ok(Json(p))
}

pub async fn remove(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    state.with_conn(|conn| ProjectLogic::delete(conn, caller.optional(), id))?;
    Ok(StatusCode::NO_CONTENT)
}
