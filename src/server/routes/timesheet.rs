use crate::core::aggregate::{DayTotal, WeekSummary};
use crate::core::submit::SubmissionGate;
use crate::core::timesheet::Timesheet;
use crate::errors::AppResult;
use crate::server::auth::Caller;
use crate::server::extract::{ApiJson, ApiQuery};
use crate::server::state::AppState;
use crate::utils::date::{DateWindow, today, week_window};
use axum::{Json, extract::State};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which timesheet: defaults to the caller and today.
#[derive(Debug, Default, Deserialize)]
pub struct TimesheetParams {
    pub employee_id: Option<i64>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct SubmitOutcome {
    pub employee_id: i64,
    pub window: DateWindow,
    /// Entries whose lock flag changed.
    pub changed: usize,
}

pub async fn week(
    State(state): State<AppState>,
    caller: Caller,
    ApiQuery(params): ApiQuery<TimesheetParams>,
) -> AppResult<Json<WeekSummary>> {
    let viewer = caller.require()?;
    let employee_id = params.employee_id.unwrap_or(viewer.employee_id);
    let date = params.date.unwrap_or_else(today);

    let summary = state.with_conn(|conn| Timesheet::week(conn, viewer, employee_id, date))?;
    Ok(Json(summary))
}

pub async fn day(
    State(state): State<AppState>,
    caller: Caller,
    ApiQuery(params): ApiQuery<TimesheetParams>,
) -> AppResult<Json<DayTotal>> {
    let viewer = caller.require()?;
    let employee_id = params.employee_id.unwrap_or(viewer.employee_id);
    let date = params.date.unwrap_or_else(today);

    let day = state.with_conn(|conn| Timesheet::day(conn, viewer, employee_id, date))?;
    Ok(Json(day))
}

pub async fn submit(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(body): ApiJson<TimesheetParams>,
) -> AppResult<Json<SubmitOutcome>> {
    let viewer = caller.require()?;
    let employee_id = body.employee_id.unwrap_or(viewer.employee_id);
    let window = week_window(body.date.unwrap_or_else(today));

    let changed =
        state.with_conn(|conn| SubmissionGate::submit(conn, viewer, employee_id, &window))?;
    Ok(Json(SubmitOutcome {
        employee_id,
        window,
        changed,
    }))
}

pub async fn reopen(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(body): ApiJson<TimesheetParams>,
) -> AppResult<Json<SubmitOutcome>> {
    let viewer = caller.require()?;
    let employee_id = body.employee_id.unwrap_or(viewer.employee_id);
    let window = week_window(body.date.unwrap_or_else(today));

    let changed =
        state.with_conn(|conn| SubmissionGate::reopen(conn, viewer, employee_id, &window))?;
    Ok(Json(SubmitOutcome {
        employee_id,
        window,
        changed,
    }))
}
