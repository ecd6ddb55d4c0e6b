/*
 * Responsibility
 * - アプリ共通の AppError 定義 (client / server の 2 系統)
 * - status の範囲チェックは smart constructor で行う (client: 4xx, server: 5xx)
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - 認識できないエラー (anyhow など) は固定メッセージの 500 に落とす
 */
use std::borrow::Cow;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Message used whenever a server-side fault is rendered to the client.
pub const GENERIC_SERVER_MESSAGE: &str = "An unexpected error occurred";

const ACCESS_DENIED_MESSAGE: &str = "You do not have permission to access/modify this resource";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub name: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
    #[serde(rename = "expiredAt", skip_serializing_if = "Option::is_none")]
    pub expired_at: Option<DateTime<Utc>>,
}

/// One failing input field of a multi-field validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Common payload carried by both error families.
#[derive(Debug, Clone)]
pub struct ErrorPayload {
    status: StatusCode,
    name: Cow<'static, str>,
    message: String,
    errors: Option<Vec<FieldError>>,
    expired_at: Option<DateTime<Utc>>,
}

impl ErrorPayload {
    fn new(status: StatusCode, name: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self {
            status,
            name: name.into(),
            message: message.into(),
            errors: None,
            expired_at: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn errors(&self) -> Option<&[FieldError]> {
        self.errors.as_deref()
    }

    pub fn expired_at(&self) -> Option<DateTime<Utc>> {
        self.expired_at
    }
}

/// Rejected attempt to build an error with a status outside its family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("status {status} is outside the {family} error range")]
pub struct StatusRangeError {
    pub status: u16,
    pub family: &'static str,
}

#[derive(Debug, Clone, Error)]
pub enum AppError {
    /// Caller's fault (4xx).
    #[error("{}: {}", .0.name, .0.message)]
    Client(ErrorPayload),
    /// System's fault (5xx).
    #[error("{}: {}", .0.name, .0.message)]
    Server(ErrorPayload),
}

impl AppError {
    /// Build a client error. Fails unless `status` is in 400..=499.
    pub fn client(
        status: u16,
        name: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
    ) -> Result<Self, StatusRangeError> {
        match StatusCode::from_u16(status) {
            Ok(code) if code.is_client_error() => {
                Ok(Self::Client(ErrorPayload::new(code, name, message)))
            }
            _ => Err(StatusRangeError {
                status,
                family: "client",
            }),
        }
    }

    /// Build a server error. Fails unless `status` is in 500..=599.
    pub fn server(
        status: u16,
        name: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
    ) -> Result<Self, StatusRangeError> {
        match StatusCode::from_u16(status) {
            Ok(code) if code.is_server_error() => {
                Ok(Self::Server(ErrorPayload::new(code, name, message)))
            }
            _ => Err(StatusRangeError {
                status,
                family: "server",
            }),
        }
    }

    pub fn bad_client(message: impl Into<String>) -> Self {
        Self::Client(ErrorPayload::new(
            StatusCode::BAD_REQUEST,
            "Bad Client",
            message,
        ))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Client(ErrorPayload::new(
            StatusCode::UNAUTHORIZED,
            "Unauthorized",
            message,
        ))
    }

    pub fn access_denied() -> Self {
        Self::Client(ErrorPayload::new(
            StatusCode::FORBIDDEN,
            "Access Denied",
            ACCESS_DENIED_MESSAGE,
        ))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::Client(ErrorPayload::new(
            StatusCode::NOT_FOUND,
            "Resource Not Found",
            message,
        ))
    }

    pub fn request_timeout() -> Self {
        Self::Client(ErrorPayload::new(
            StatusCode::REQUEST_TIMEOUT,
            "Request Timeout",
            "The request took too long to complete",
        ))
    }

    /// Bearer credential present but unusable (bad signature, malformed, ...).
    pub fn invalid_credential(name: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self::Client(ErrorPayload::new(StatusCode::BAD_REQUEST, name, message))
    }

    pub fn token_expired(expired_at: Option<DateTime<Utc>>) -> Self {
        let mut payload =
            ErrorPayload::new(StatusCode::UNAUTHORIZED, "Token Expired", "access token expired");
        payload.expired_at = expired_at;
        Self::Client(payload)
    }

    /// Multi-field validation failure. The top-level message is the first field's message.
    pub fn validation(errors: Vec<FieldError>) -> Self {
        let message = errors
            .first()
            .map(|e| e.message.clone())
            .unwrap_or_else(|| "invalid request".to_string());

        let mut payload = ErrorPayload::new(StatusCode::BAD_REQUEST, "Validation Error", message);
        payload.errors = Some(errors);
        Self::Client(payload)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::Server(ErrorPayload::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
            message,
        ))
    }

    /// 500 with the fixed generic message.
    pub fn internal() -> Self {
        Self::internal_server_error(GENERIC_SERVER_MESSAGE)
    }

    /// Fallback for failures that were not built through this taxonomy.
    /// The detail is logged, never rendered.
    pub fn unrecognized(err: &(dyn std::error::Error + 'static)) -> Self {
        tracing::error!(error = %err, "unrecognized failure");
        Self::internal()
    }

    pub fn payload(&self) -> &ErrorPayload {
        match self {
            AppError::Client(p) | AppError::Server(p) => p,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.payload().status
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::Client(_))
    }

    /// Status + JSON body handed to the HTTP boundary.
    pub fn render(&self) -> (StatusCode, ErrorResponse) {
        let payload = self.payload();
        let body = ErrorResponse {
            error: ErrorBody {
                name: payload.name.to_string(),
                message: payload.message.clone(),
                errors: payload.errors.clone(),
                expired_at: payload.expired_at,
            },
        };
        (payload.status, body)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.render();

        match &self {
            AppError::Server(_) => tracing::error!(
                status = status.as_u16(),
                name = %body.error.name,
                "request failed: {}",
                body.error.message
            ),
            AppError::Client(_) => tracing::debug!(
                status = status.as_u16(),
                name = %body.error.name,
                "request rejected: {}",
                body.error.message
            ),
        }

        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        tracing::error!(error = ?e, "unrecognized failure");
        AppError::internal()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        // axum picks 400 / 413 / 415 / 422 depending on what went wrong with the body
        let status = rejection.status();
        let name = if status == StatusCode::PAYLOAD_TOO_LARGE {
            "Payload Too Large"
        } else {
            "Bad Client"
        };

        AppError::client(status.as_u16(), name, rejection.body_text())
            .unwrap_or_else(|_| AppError::bad_client(rejection.body_text()))
    }
}
