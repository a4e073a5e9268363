use serde_json::{json, Value};
use vercel_runtime::{Body, Response, StatusCode};

use crate::error::AppError;
use crate::http::cors::add_cors;

/// Maps an error to what the caller may see. `internal` is the generic
/// message used for every server-side failure.
pub fn error_response(err: &AppError, internal: &str) -> (StatusCode, Value) {
    match err {
        AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
        AppError::MethodNotAllowed => (
            StatusCode::METHOD_NOT_ALLOWED,
            json!({ "error": "Method not allowed" }),
        ),
        AppError::Upstream(_) | AppError::Config(_) | AppError::Other(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": internal }),
        ),
    }
}

pub fn json_response<T: serde::Serialize>(
    status: StatusCode,
    value: &T,
) -> anyhow::Result<Response<Body>> {
    let mut builder = Response::builder()
        .status(status)
        .header("Content-Type", "application/json");
    if status == StatusCode::METHOD_NOT_ALLOWED {
        builder = builder.header("Allow", "POST, OPTIONS");
    }
    Ok(add_cors(builder.body(serde_json::to_string(value)?.into())?))
}

pub fn render_error(err: &AppError, internal: &str) -> anyhow::Result<Response<Body>> {
    let (status, body) = error_response(err, internal);
    json_response(status, &body)
}
