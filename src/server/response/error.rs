//! Uniform in-band error bodies.
//!
//! Failures are reported with HTTP status 200 and the error in the body, so
//! that existing clients keep working.

use actix_web::{http::header, HttpResponse};

use super::params::{FormatOptions, OutputFormat};
use super::TEXT_PLAIN;

/// Prefix of plain error messages.
pub const ERROR_PREFIX: &str = "ERROR:";

/// Header allowing cross-origin access, attached to every response.
pub fn cors_header() -> (header::HeaderName, &'static str) {
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
}

/// Body for `message`, as JSON object if JSON output was requested.
pub fn error_body(output_format: &OutputFormat, message: &str) -> String {
    if *output_format == OutputFormat::Json {
        serde_json::json!({ "error": message }).to_string()
    } else {
        format!("An error occurred: {}", message)
    }
}

/// Error response for a failure while handling a request.
pub fn error_response(options: &FormatOptions, message: &str) -> HttpResponse {
    tracing::debug!("error response: {}", message);
    HttpResponse::Ok()
        .content_type(TEXT_PLAIN)
        .insert_header(cors_header())
        .body(error_body(&options.output_format, message))
}

/// Message prefixed with `ERROR: ` unless already prefixed.
pub fn error_text(message: &str) -> String {
    if message.starts_with(ERROR_PREFIX) {
        message.to_string()
    } else {
        format!("{} {}", ERROR_PREFIX, message)
    }
}

/// Error response for a bare message, independent of format options.
pub fn error_message(message: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(TEXT_PLAIN)
        .insert_header(cors_header())
        .body(error_text(&message.to_string()))
}
