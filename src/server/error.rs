use crate::errors::AppError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Locked(_) => StatusCode::LOCKED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) | AppError::InUse { .. } => StatusCode::CONFLICT,
            AppError::InvalidDate(_)
            | AppError::InvalidHours(_)
            | AppError::InvalidRange(_)
            | AppError::InvalidSort(_)
            | AppError::InvalidRole(_)
            | AppError::Validation(_)
            | AppError::Json(_) => StatusCode::BAD_REQUEST,
            AppError::Io(_)
            | AppError::Db(_)
            | AppError::Migration(_)
            | AppError::Config(_)
            | AppError::Export(_)
            | AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{self}");
        } else {
            warn!(status = status.as_u16(), "{self}");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
