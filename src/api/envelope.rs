//! JSON envelopes shared by every endpoint

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::Error;

/// Numeric error classes reported in `errortype`. Code 1 is reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unimplemented = 2,
    InvalidData = 3,
    Upstream = 4,
    Unauthorized = 5,
}

impl ErrorKind {
    pub fn code(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub errortype: u8,
    pub errormessage: String,
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstreamstatus: Option<u16>,
}

/// A classified failure, ready to be sent to the client.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub kind: ErrorKind,
    pub message: String,
    pub uri: String,
    pub upstream_status: Option<u16>,
}

impl ApiError {
    fn new(status: StatusCode, kind: ErrorKind, message: &str, uri: String) -> Self {
        Self {
            status,
            kind,
            message: message.to_string(),
            uri,
            upstream_status: None,
        }
    }

    pub fn unauthorized(uri: String) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            ErrorKind::Unauthorized,
            "Missing or invalid bearer token",
            uri,
        )
    }

    pub fn unimplemented(uri: String) -> Self {
        Self::new(
            StatusCode::NOT_IMPLEMENTED,
            ErrorKind::Unimplemented,
            "Not implemented",
            uri,
        )
    }

    /// Classify a pipeline failure. The full diagnostic is logged here; the
    /// client only sees the generic message and, for upstream errors, the
    /// upstream status.
    pub fn from_pipeline(err: &Error, uri: String) -> Self {
        tracing::error!(uri = %uri, error = %err, "metrics request failed");

        if err.is_invalid_data() {
            return Self::new(
                StatusCode::BAD_GATEWAY,
                ErrorKind::InvalidData,
                "Upstream API returned invalid data",
                uri,
            );
        }

        if err.is_timeout() {
            return Self::new(
                StatusCode::GATEWAY_TIMEOUT,
                ErrorKind::Upstream,
                "Upstream API timed out",
                uri,
            );
        }

        let mut api_error = Self::new(
            StatusCode::BAD_GATEWAY,
            ErrorKind::Upstream,
            "Upstream API request failed",
            uri,
        );
        api_error.upstream_status = err.upstream_status();
        api_error
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorEnvelope {
            errortype: self.kind.code(),
            errormessage: self.message,
            uri: self.uri,
            upstreamstatus: self.upstream_status,
        };
        (self.status, Json(body)).into_response()
    }
}
