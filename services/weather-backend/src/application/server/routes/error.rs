use axum::extract::Json;
use axum::http::status::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use std::fmt;

use crate::domain::service::Error as ServiceError;
use common::err_context::ErrorContext;

#[derive(Debug)]
pub enum Error {
    /// The request does not pass validation
    InvalidRequest {
        context: String,
        source: String,
    },
    /// The token path segment is empty
    InvalidToken {
        context: String,
    },
    NotFound {
        context: String,
    },
    Service {
        context: String,
        source: ServiceError,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidRequest { context, source } => {
                write!(fmt, "Invalid Request: {context} | {source}")
            }
            Error::InvalidToken { context } => {
                write!(fmt, "Invalid Token: {context}")
            }
            Error::NotFound { context } => {
                write!(fmt, "Not Found: {context}")
            }
            Error::Service { context, source } => {
                write!(fmt, "Service: {context} | {source}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Service { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        self.standardize().into_response()
    }
}

impl From<ErrorContext<String>> for Error {
    fn from(err: ErrorContext<String>) -> Self {
        Error::InvalidRequest {
            context: err.0,
            source: err.1,
        }
    }
}

impl From<ErrorContext<ServiceError>> for Error {
    fn from(err: ErrorContext<ServiceError>) -> Self {
        Error::Service {
            context: err.0,
            source: err.1,
        }
    }
}

fn fail(status: StatusCode, message: &str, code: &str) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(serde_json::json!({
            "status": "fail",
            "message": message,
            "code": code
        })),
    )
}

impl Error {
    /// Status code and body sent back to the client.
    ///
    /// Internal errors are logged here, and their details never reach the client.
    pub fn standardize(&self) -> (StatusCode, Json<Value>) {
        match self {
            Error::InvalidRequest { context, source } => {
                tracing::info!("Invalid request: {context} | {source}");
                fail(StatusCode::BAD_REQUEST, "Invalid input", "request/invalid")
            }
            Error::InvalidToken { context } => {
                tracing::info!("Invalid token: {context}");
                fail(StatusCode::BAD_REQUEST, "Invalid token", "token/invalid")
            }
            Error::NotFound { context } => {
                fail(StatusCode::NOT_FOUND, context, "route/not_found")
            }
            Error::Service { context, source } => match source {
                ServiceError::AlreadySubscribed { .. } => fail(
                    StatusCode::CONFLICT,
                    "Email already subscribed",
                    "subscription/already_subscribed",
                ),
                ServiceError::TokenNotFound { .. } => {
                    fail(StatusCode::NOT_FOUND, "Token not found", "token/not_found")
                }
                ServiceError::CityNotFound { .. } => {
                    fail(StatusCode::NOT_FOUND, "City not found", "weather/city_not_found")
                }
                ServiceError::Upstream { .. } => {
                    tracing::error!("{context} | {source}");
                    fail(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Failed to fetch weather",
                        "weather/internal_error",
                    )
                }
                ServiceError::Storage { .. } => {
                    tracing::error!("{context} | {source}");
                    fail(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error",
                        "internal_error",
                    )
                }
            },
        }
    }
}
