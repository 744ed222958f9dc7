use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json
};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;
use tracing::{debug, error};

use crate::repo::RepoError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
    #[error("Not found")]
    NotFound,
    #[error("Missing or invalid identity")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl ApiError {
    /// Classifies an error coming out of the repository layer
    ///
    /// Constraint violations reported by SQLite are client errors rather than
    /// server faults: a unique violation means the row already exists, a
    /// foreign key violation means something it points at does not.
    pub fn from_repo(err: anyhow::Error) -> Self {
        if let Some(repo_err) = err.downcast_ref::<RepoError>() {
            return match repo_err {
                RepoError::NotFound(_) => ApiError::NotFound,
                RepoError::LastOwner
                | RepoError::ParentMismatch
                | RepoError::NotAMember
                | RepoError::PositionOverflow
                | RepoError::DefaultRequired => {
                    ApiError::BadRequest(repo_err.to_string())
                }
            };
        }

        match err.downcast_ref::<DieselError>() {
            Some(DieselError::NotFound) => ApiError::NotFound,
            Some(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)) => {
                ApiError::Conflict(info.message().to_string())
            }
            Some(DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)) => {
                ApiError::NotFound
            }
            Some(DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, info)) => {
                ApiError::BadRequest(info.message().to_string())
            }
            _ => ApiError::Database(err),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(status = %status, "{:#}", self);
        } else {
            debug!(status = %status, "{}", self);
        }

        let message = match self {
            ApiError::Database(_) => "Internal server error".to_string(),
            ApiError::NotFound => "Not found".to_string(),
            ApiError::Unauthorized => "Missing or invalid identity".to_string(),
            ApiError::Forbidden(msg) | ApiError::BadRequest(msg) | ApiError::Conflict(msg) => msg,
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
