use crate::core::employee::EmployeeLogic;
use crate::db::paging::{ListQuery, Page};
use crate::errors::AppResult;
use crate::models::employee::{Employee, EmployeePatch, NewEmployee};
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
) -> AppResult<Json<Page<Employee>>> {
    let viewer = caller.require()?;
    let page = state.with_conn(|conn| EmployeeLogic::list(conn, viewer, &query, state.page_size()))?;
    Ok(Json(page))
}

pub async fn show(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Employee>> {
    let viewer = caller.require()?;
    Ok(Json(state.with_conn(|conn| EmployeeLogic::get(conn, viewer, id))?))
}

pub async fn create(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(body): ApiJson<NewEmployee>,
) -> AppResult<(StatusCode, Json<Employee>)> {
    let e = state.with_conn(|conn| EmployeeLogic::create(conn, caller.optional(), &body))?;
    Ok((StatusCode::CREATED, Json(e)))
}

pub async fn update(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<EmployeePatch>,
) -> AppResult<Json<Employee>> {
    let e = state.with_conn(|conn| EmployeeLogic::update(conn, caller.optional(), id, &patch))?;
    Ok(Json(e))
}

pub async fn remove(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    state.with_conn(|conn| EmployeeLogic::delete(conn, caller.optional(), id))?;
    Ok(StatusCode::NO_CONTENT)
}
