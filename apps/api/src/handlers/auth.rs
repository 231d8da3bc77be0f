use axum::Json;
use axum::extract::State;
use bruteguard_core::AppError;
use bruteguard_domain::Attempt;

use crate::dto::{CheckAuthRequest, CheckAuthResponse, ResetBucketRequest, StatusResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// Decides a login attempt.
///
/// Denials, including malformed attempt data, are reported in the response
/// body with `ok = false`; only store faults surface as HTTP errors, so the
/// front-end can tell "denied" from "undecidable".
pub async fn check_auth_handler(
    State(state): State<AppState>,
    Json(payload): Json<CheckAuthRequest>,
) -> ApiResult<Json<CheckAuthResponse>> {
    let attempt = match Attempt::new(&payload.login, &payload.password, &payload.ip) {
        Ok(attempt) => attempt,
        Err(AppError::Validation(message)) => {
            return Ok(Json(CheckAuthResponse {
                ok: false,
                error: Some(format!("invalid attempt data: {message}")),
            }));
        }
        Err(error) => return Err(error.into()),
    };

    let verdict = state.engine.decide(&attempt).await?;

    Ok(Json(CheckAuthResponse {
        ok: verdict.allowed,
        error: (!verdict.allowed).then(|| verdict.reason.to_string()),
    }))
}

/// Deletes the login- and address-dimension counters.
pub async fn reset_bucket_handler(
    State(state): State<AppState>,
    Json(payload): Json<ResetBucketRequest>,
) -> ApiResult<Json<StatusResponse>> {
    state.engine.reset(&payload.login, &payload.ip).await?;

    Ok(Json(StatusResponse { status: true }))
}
