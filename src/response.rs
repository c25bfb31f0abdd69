//! The uniform `{code, msg, data}` response envelope used by every endpoint.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// The response envelope returned by every API endpoint.
///
/// `code` is the business status code, mirrored by the HTTP status. `data`
/// carries the endpoint-specific payload and is `null` for operations that
/// return nothing (e.g. deletes).
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// The business status code, e.g. 200 or 404.
    pub code: u16,
    /// A short human-readable message.
    pub msg: String,
    /// The payload, if any.
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// A 200 response with a payload.
    pub fn ok(msg: &str, data: T) -> Self {
        Self {
            code: 200,
            msg: msg.to_string(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// A 200 response with no payload.
    pub fn message(msg: &str) -> Self {
        Self {
            code: 200,
            msg: msg.to_string(),
            data: None,
        }
    }

    /// An error response. The HTTP status is taken from `status` and the
    /// envelope code from `code` so the two always agree.
    pub fn error(status: StatusCode, code: u16, msg: String) -> Response {
        let envelope = Self {
            code,
            msg,
            data: None,
        };

        (status, Json(envelope)).into_response()
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(self)).into_response()
    }
}
