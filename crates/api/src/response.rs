//! Standardized API responses.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use site_core::{AuthErrorCode, Error, STORE_ERROR_CODE};
use telemetry::{ComponentHealthReport, MetricsSnapshot};

/// Login outcome.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub authenticated: bool,
}

/// Plain acknowledgement.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `GET /api/auth/status` body.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub authenticated: bool,
}

/// Details of the caller's admin session.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfoResponse {
    pub authenticated: bool,
    pub admin_id: String,
    pub last_activity: DateTime<Utc>,
    /// When the session expires if no further request arrives.
    pub expires_at: DateTime<Utc>,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub environment: String,
    pub session_store_healthy: bool,
    pub components: Vec<ComponentHealthReport>,
    pub auth: MetricsSnapshot,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
        }
    }
}

/// API error type with error codes.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ErrorResponse,
    pub retry_after: Option<u64>,
}

impl ApiError {
    pub fn with_code(status: StatusCode, code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            status,
            response: ErrorResponse::new(msg, code),
            retry_after: None,
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::with_code(
            StatusCode::BAD_REQUEST,
            AuthErrorCode::MissingCredentials.code(),
            msg,
        )
    }

    pub fn unauthorized(code: AuthErrorCode, msg: impl Into<String>) -> Self {
        Self::with_code(StatusCode::UNAUTHORIZED, code.code(), msg)
    }

    /// Generic 500; infrastructure details stay in the logs.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_code(
            StatusCode::INTERNAL_SERVER_ERROR,
            STORE_ERROR_CODE,
            msg,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.response)).into_response();

        // Add Retry-After header for throttled logins
        if let Some(retry_after) = self.retry_after {
            if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }

        response
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status =
            StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let code = err.error_code();

        let message = match &err {
            Error::InvalidRequest(msg) => msg.clone(),
            Error::InvalidCredentials => "Invalid username or password".to_string(),
            Error::RateLimited { .. } => {
                "Too many login attempts. Please try again later.".to_string()
            }
            Error::Unauthorized => "Unauthorized: Please login first".to_string(),
            Error::SessionExpired => "Session expired: Please login again".to_string(),
            Error::Storage(_) | Error::Config(_) => "Internal server error".to_string(),
        };

        Self {
            status,
            response: ErrorResponse::new(message, code),
            retry_after: err.retry_after(),
        }
    }
}

/// Append a `Set-Cookie` header to a response.
pub fn with_cookie(mut response: Response, cookie: Option<String>) -> Response {
    if let Some(value) = cookie.and_then(|c| HeaderValue::from_str(&c).ok()) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}
