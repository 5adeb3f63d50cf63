//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while giving Actix handlers one
//! JSON error envelope: `{status, error, code, traceId?, details?}`. Internal
//! failures are redacted before they reach the client.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

pub use crate::domain::ApiResult;

/// Client-facing text for redacted internal errors.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Client-facing text for unparsable request bodies.
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON payload";

/// Wire shape of every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status: u16,
    pub error: String,
    pub code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Unredacted message of an internal error; only set outside production.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<String>,
}

impl ErrorBody {
    /// Build the client-facing body for `error`, redacting internal failures.
    pub fn from_error(error: &Error) -> Self {
        let redacted = redact_if_internal(error);
        Self {
            status: status_for(redacted.code()).as_u16(),
            error: redacted.message().to_owned(),
            code: redacted.code(),
            trace_id: redacted.trace_id().map(str::to_owned),
            details: redacted.details().cloned(),
            debug: None,
        }
    }

    /// Attach the unredacted message of an internal error.
    pub fn with_debug(mut self, error: &Error) -> Self {
        if error.code() == ErrorCode::InternalError {
            self.debug = Some(error.message().to_owned());
        }
        self
    }
}

pub(crate) fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if error.code() == ErrorCode::InternalError {
        let mut redacted = Error::internal(INTERNAL_ERROR_MESSAGE);
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let trace_id = self.trace_id().unwrap_or_default();
        if status.is_server_error() {
            error!(%trace_id, code = ?self.code(), message = self.message(), "request failed");
        } else {
            warn!(%trace_id, code = ?self.code(), message = self.message(), "request rejected");
        }

        let mut builder = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(ErrorBody::from_error(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Self::internal(INTERNAL_ERROR_MESSAGE)
    }
}

/// `JsonConfig` error handler turning extractor failures into domain errors.
///
/// Unparsable bodies, wrong content types and oversized payloads all answer
/// 400 with `details.code = "invalid_json"`.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    warn!(
        path = req.path(),
        error = %err,
        "request body rejected"
    );
    Error::invalid_request(INVALID_JSON_MESSAGE)
        .with_details(json!({ "code": "invalid_json" }))
        .into()
}
