// Envelope dispatcher for POST /handle
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::Response,
};
use tracing::{debug, info, warn};

use crate::broker::envelope::{Action, DispatchError};
use crate::broker::response::{ApiResponse, TokenData, UserData};
use crate::broker::server::AppState;
use crate::broker::upstream::{ForwardError, Operation};

/// Decode the envelope, run the selected action, write exactly one response.
///
/// The raw body is taken instead of `Json<_>` so decode failures are reported
/// in the broker's own envelope. Body read failures, such as exceeding the
/// size limit, keep axum's status but use the same envelope.
pub async fn handle_submission(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            debug!("Unreadable request body: {}", rejection.body_text());
            return ApiResponse::failure(rejection.body_text()).with_status(rejection.status());
        }
    };

    let action = match Action::from_body(&body) {
        Ok(action) => action,
        Err(e) => return reject(e),
    };

    let operation = action.operation();
    debug!("Dispatching {}", operation.name());

    let upstream = &state.upstream;
    match action {
        Action::Authenticate(payload) => match upstream.authenticate(&payload).await {
            Ok(tokens) => {
                ApiResponse::success("Authenticated successfully", TokenData::from(tokens))
                    .with_status(StatusCode::OK)
            }
            Err(e) => forward_failure(operation, e),
        },
        Action::Refresh(refresh_token) => match upstream.refresh(&refresh_token).await {
            Ok(tokens) => {
                ApiResponse::success("Tokens refreshed successfully", TokenData::from(tokens))
                    .with_status(StatusCode::OK)
            }
            Err(e) => forward_failure(operation, e),
        },
        Action::Register(payload) => match upstream.register(&payload).await {
            Ok(user) => {
                info!("Registered user id {:?}", user.id);
                ApiResponse::success("User registered successfully", UserData::from(user))
                    .with_status(StatusCode::CREATED)
            }
            Err(e) => forward_failure(operation, e),
        },
    }
}

fn reject(err: DispatchError) -> Response {
    debug!("Rejected envelope: {}", err);
    ApiResponse::failure(err.to_string()).with_status(StatusCode::BAD_REQUEST)
}

/// Status reported to the caller for any forwarder failure
fn failure_status(operation: Operation) -> StatusCode {
    match operation {
        Operation::Authenticate | Operation::Refresh => StatusCode::UNAUTHORIZED,
        Operation::Register => StatusCode::BAD_REQUEST,
    }
}

fn forward_failure(operation: Operation, err: ForwardError) -> Response {
    warn!("{} failed ({:?}): {}", operation.name(), err.kind(), err);
    ApiResponse::failure(err.to_string()).with_status(failure_status(operation))
}
