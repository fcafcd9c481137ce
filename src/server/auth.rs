//! Caller identity from the `X-Employee-Id` header.

use crate::core::access::Viewer;
use crate::errors::{AppError, AppResult};
use crate::server::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

pub const EMPLOYEE_HEADER: &str = "x-employee-id";

/// The resolved caller, or `None` when the header is absent.
pub struct Caller(pub Option<Viewer>);

impl Caller {
    pub fn require(&self) -> AppResult<&Viewer> {
        self.0
            .as_ref()
            .ok_or_else(|| AppError::Unauthorized("missing X-Employee-Id header".into()))
    }

    pub fn optional(&self) -> Option<&Viewer> {
        self.0.as_ref()
    }
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(raw) = parts.headers.get(EMPLOYEE_HEADER) else {
            return Ok(Caller(None));
        };

        let id: i64 = raw
            .to_str()
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .ok_or_else(|| AppError::Unauthorized("malformed X-Employee-Id header".into()))?;

        let viewer = state.with_conn(|conn| Viewer::resolve(conn, id))?;
        Ok(Caller(Some(viewer)))
    }
}
