use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use jury_storage::{dto::evaluation::SubmissionError, error::StorageError};
use serde_json::json;
use std::any::Any;
use std::fmt;
use validator::ValidationErrors;

use crate::middleware::auth::AuthError;
use crate::mirror::MirrorError;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    MissingFields,
    ScoreOutOfRange,
    TeamNotFound,
    RelayFailed(String),
    Unhandled(String),
    Validation(ValidationErrors),
    BadRequest(String),
    Unauthorized,
    InvalidCredentials,
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFields => write!(f, "{}", SubmissionError::MissingFields),
            Self::ScoreOutOfRange => write!(f, "{}", SubmissionError::ScoreOutOfRange),
            Self::TeamNotFound => write!(f, "Team not found"),
            Self::RelayFailed(msg) => write!(f, "Relay failed: {}", msg),
            Self::Unhandled(msg) => write!(f, "Unhandled error: {}", msg),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Unauthorized => write!(f, "Unauthorized"),
            Self::InvalidCredentials => write!(f, "Invalid email or password"),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            Self::MissingFields | Self::ScoreOutOfRange => StatusCode::BAD_REQUEST,
            Self::TeamNotFound => StatusCode::NOT_FOUND,
            Self::RelayFailed(_) | Self::Unhandled(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
        };

        let body = match &self {
            Self::MissingFields | Self::ScoreOutOfRange => {
                json!({
                    "error": self.to_string()
                })
            }
            Self::TeamNotFound => {
                json!({
                    "error": "Team not found"
                })
            }
            Self::RelayFailed(msg) | Self::Unhandled(msg) => {
                tracing::error!("Error submitting evaluation: {}", msg);
                json!({
                    "error": "Failed to submit evaluation",
                    "details": msg
                })
            }
            Self::Validation(errors) => {
                let field_errors: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |e| {
                            format!(
                                "{}: {}",
                                field,
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            )
                        })
                    })
                    .collect();

                json!({
                    "error": "Validation failed",
                    "details": field_errors
                })
            }
            Self::BadRequest(msg) => {
                json!({
                    "error": msg
                })
            }
            Self::Unauthorized => {
                json!({
                    "error": "Unauthorized"
                })
            }
            Self::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
                json!({
                    "error": "Invalid email or password"
                })
            }
        };

        (status_code, Json(body)).into_response()
    }
}

impl From<StorageError> for WebError {
    fn from(error: StorageError) -> Self {
        Self::Unhandled(error.to_string())
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

impl From<SubmissionError> for WebError {
    fn from(error: SubmissionError) -> Self {
        match error {
            SubmissionError::MissingFields => Self::MissingFields,
            SubmissionError::ScoreOutOfRange => Self::ScoreOutOfRange,
        }
    }
}

impl From<MirrorError> for WebError {
    fn from(error: MirrorError) -> Self {
        Self::RelayFailed(error.to_string())
    }
}

impl From<AuthError> for WebError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::InvalidCredentials => Self::InvalidCredentials,
        }
    }
}

pub type WebResult<T> = Result<T, WebError>;

/// Panic handler for `CatchPanicLayer`: answers with the usual
/// `{error, details}` body instead of a plain-text 500.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else {
        "request handler panicked".to_string()
    };

    WebError::Unhandled(details).into_response()
}
