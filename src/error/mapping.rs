//! Error mapping for platform API responses
//!
//! The platform's serverless endpoints answer failures with a JSON body of
//! the form `{error, message, timestamp}` and a non-2xx status. This module
//! converts that shape (and arbitrary non-JSON bodies) to the normalized
//! `GatewayError` type.

use reqwest::StatusCode;
use serde_json::Value;

use super::{ErrorContext, GatewayError};
use crate::util::truncate_string;

/// Map a platform error response to a GatewayError
pub fn map_platform_error(
    status: StatusCode,
    json: &Value,
    context: &mut ErrorContext,
) -> GatewayError {
    // The platform sends both an error label and a human message; prefer the
    // message, fall back to the label.
    if let Some(label) = json.get("error").and_then(|e| e.as_str()) {
        context.add("error_label", label);
    }

    let message = json
        .get("message")
        .or_else(|| json.get("error"))
        .or_else(|| json.get("detail"))
        .and_then(|m| m.as_str())
        .unwrap_or("Unknown platform error");

    map_status(status, message)
}

/// Map a generic HTTP error to a GatewayError
pub fn map_http_error(status: StatusCode, body: &str, context: &mut ErrorContext) -> GatewayError {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        return map_platform_error(status, &json, context);
    }

    // Fallback to status-based mapping with a bounded body excerpt
    let message = if body.is_empty() {
        status.to_string()
    } else {
        format!("{}: {}", status, truncate_string(body, 100))
    };

    map_status(status, &message)
}

fn map_status(status: StatusCode, message: &str) -> GatewayError {
    match status {
        StatusCode::BAD_REQUEST => GatewayError::validation(message),
        StatusCode::NOT_FOUND => GatewayError::not_found(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            GatewayError::timeout(message)
        }
        StatusCode::INTERNAL_SERVER_ERROR
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE => GatewayError::service(message),
        _ => GatewayError::service(message),
    }
}

/// Helper function to classify HTTP errors by category
pub fn classify_http_error(status: StatusCode) -> &'static str {
    match status.as_u16() {
        400 => "validation",
        404 => "not_found",
        408 | 504 => "timeout",
        500..=599 => "server",
        _ => "unknown",
    }
}
