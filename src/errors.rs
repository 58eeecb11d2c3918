use axum::{http::StatusCode, Json};
use serde::Serialize;
use std::io;
use thiserror::Error;

/// Why a canonical name is not a usable relative reference.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("name escapes the resource root")]
    Escaping,
    #[error("control character at offset {offset}")]
    ControlCharacter { offset: usize },
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("invalid resource name: {reason}")]
    InvalidArgument {
        reason: &'static str,
        #[source]
        source: Option<ReferenceError>,
    },
    #[error("resource not found: {name}")]
    NotFound { name: String },
    #[error("error opening resource {name}")]
    OpenFailed {
        name: String,
        #[source]
        source: io::Error,
    },
}

impl ResourceError {
    pub fn code(&self) -> &'static str {
        match self {
            ResourceError::InvalidArgument { .. } => "InvalidArgument",
            ResourceError::NotFound { .. } => "NotFound",
            ResourceError::OpenFailed { .. } => "OpenFailed",
        }
    }
}

/// Errors surfaced by the HTTP front end.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error("resource too large")]
    TooLarge,
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Resource(e) => e.code(),
            AppError::TooLarge => "TooLarge",
            AppError::Internal(_) => "Internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Resource(ResourceError::InvalidArgument { .. }) => StatusCode::BAD_REQUEST,
            AppError::Resource(ResourceError::NotFound { .. }) => StatusCode::NOT_FOUND,
            AppError::Resource(ResourceError::OpenFailed { .. }) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

pub fn into_response(err: AppError) -> (StatusCode, Json<ErrorBody>) {
    let body = ErrorBody { code: err.code(), message: err.to_string() };
    (err.status(), Json(body))
}
