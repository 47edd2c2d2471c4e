use axum::{http::StatusCode, response::Response};

use crate::broker::response::ApiResponse;

/// Health check handler, never touches the auth service
pub async fn health_check_handler() -> Response {
    ApiResponse::message("Broker service is healthy").with_status(StatusCode::OK)
}
