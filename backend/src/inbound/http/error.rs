//! HTTP mapping for domain errors.
//!
//! Every error response carries the request's `trace-id` header. Bodies use
//! the JSON error envelope except for `404`, which is always empty. Internal
//! failures are redacted before they reach the client.

use actix_web::http::StatusCode;
use actix_web::http::header::{HeaderValue, WWW_AUTHENTICATE};
use actix_web::{HttpResponse, ResponseError};
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode};

/// Response header echoing the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

const REDACTED_MESSAGE: &str = "Internal server error";

pub(crate) fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn redact_if_internal(error: &Error) -> Error {
    if error.code() != ErrorCode::InternalError {
        return error.clone();
    }
    let redacted = Error::internal(REDACTED_MESSAGE);
    match error.trace_id() {
        Some(id) => redacted.with_trace_id(id),
        None => redacted,
    }
}

fn log_error(error: &Error) {
    match error.code() {
        ErrorCode::InternalError | ErrorCode::ServiceUnavailable => error!(
            code = ?error.code(),
            message = error.message(),
            trace_id = error.trace_id(),
            "request failed"
        ),
        _ => warn!(
            code = ?error.code(),
            message = error.message(),
            trace_id = error.trace_id(),
            "request rejected"
        ),
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        log_error(self);

        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        match self.code() {
            ErrorCode::NotFound => builder.finish(),
            ErrorCode::Unauthorized => builder
                .insert_header((WWW_AUTHENTICATE, HeaderValue::from_static("Bearer")))
                .json(self),
            _ => builder.json(redact_if_internal(self)),
        }
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(REDACTED_MESSAGE)
    }
}

#[cfg(test)]
mod tests;
