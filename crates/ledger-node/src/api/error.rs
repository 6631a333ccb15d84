//! Mapping of ledger errors onto HTTP responses.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use block_ledger::{ErrorKind, LedgerError};
use serde::{Deserialize, Serialize};

/// Wire shape of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Code for requests rejected before reaching the ledger.
pub const INVALID_REQUEST: &str = "INVALID_REQUEST";

#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    fn invalid_request(status: StatusCode, message: String) -> Self {
        Self {
            status,
            body: ErrorBody {
                code: INVALID_REQUEST.to_string(),
                message,
            },
        }
    }

    pub fn status_for(kind: ErrorKind) -> StatusCode {
        match kind {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::EmptyChain | ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Internal | ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ErrorKind::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        let kind = err.kind();
        let status = Self::status_for(kind);
        if status.is_server_error() {
            tracing::error!(error = %err, code = kind.code(), "Request failed");
        }
        Self {
            status,
            body: ErrorBody {
                code: kind.code().to_string(),
                message: err.to_string(),
            },
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::invalid_request(rejection.status(), rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid_request(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
