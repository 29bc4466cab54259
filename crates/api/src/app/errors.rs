use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use brickstore_infra::GatewayError;

pub fn gateway_error_to_response(err: GatewayError) -> axum::response::Response {
    match err {
        GatewayError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        GatewayError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        GatewayError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        GatewayError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        GatewayError::Upload(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "upload_error", msg)
        }
        GatewayError::Store(e) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "store_error",
            format!("{e:?}"),
        ),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
