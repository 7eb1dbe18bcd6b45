//! Error handling

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::info;

use crate::constants::DESCRIPTION_REQUIRED;

/// HTTP-facing errors for the memetalk application.
#[derive(Debug)]
pub enum MemetalkError {
    /// The request was missing a usable description, or wasn't valid JSON.
    BadRequest(String),
    /// When DB operations fail
    DatabaseError(sea_orm::DbErr),
    /// When a requested resource is not found
    NotFound(String),
    /// When an internal server error occurs
    InternalServerError(String),
}

impl MemetalkError {
    /// The standard rejection for a missing or blank description.
    pub fn description_required() -> Self {
        MemetalkError::BadRequest(DESCRIPTION_REQUIRED.to_string())
    }
}

impl std::fmt::Display for MemetalkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(message) => write!(f, "Bad request: {message}"),
            Self::DatabaseError(err) => write!(f, "Database error: {err}"),
            Self::NotFound(what) => write!(f, "Not found: {what}"),
            Self::InternalServerError(message) => write!(f, "Internal server error: {message}"),
        }
    }
}

impl std::error::Error for MemetalkError {}

impl From<sea_orm::DbErr> for MemetalkError {
    fn from(err: sea_orm::DbErr) -> Self {
        MemetalkError::DatabaseError(err)
    }
}

impl From<std::io::Error> for MemetalkError {
    fn from(err: std::io::Error) -> Self {
        MemetalkError::InternalServerError(err.to_string())
    }
}

impl From<axum::http::Error> for MemetalkError {
    fn from(err: axum::http::Error) -> Self {
        MemetalkError::InternalServerError(err.to_string())
    }
}

impl From<serde_json::Error> for MemetalkError {
    fn from(err: serde_json::Error) -> Self {
        MemetalkError::InternalServerError(err.to_string())
    }
}

fn error_body(status: StatusCode, message: &str) -> axum::response::Response {
    (status, Json(json!({ "error": message }))).into_response()
}

impl IntoResponse for MemetalkError {
    fn into_response(self) -> axum::response::Response {
        match self {
            MemetalkError::BadRequest(message) => {
                info!("Bad request received: {}", message);
                error_body(StatusCode::BAD_REQUEST, &message)
            }
            MemetalkError::DatabaseError(err) => {
                tracing::error!("Database error: {}", err);
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
            }
            MemetalkError::NotFound(what) => {
                tracing::error!("404 {what}");
                error_body(StatusCode::NOT_FOUND, "Not Found")
            }
            MemetalkError::InternalServerError(message) => {
                tracing::error!("Internal server error: {}", message);
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_required_is_a_bad_request() {
        let response = MemetalkError::description_required().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = MemetalkError::InternalServerError("disk on fire".to_string());
        assert!(err.to_string().contains("disk on fire"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
