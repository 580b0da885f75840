use axum::extract::State;
use axum::Json;
use forum_shared::VerifiedIdentity;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::{ApiError, ApiResult, AuthError};
use crate::server::extract::JsonBody;
use crate::server::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VerifyTokenRequest {
    pub id_token: Option<String>,
}

/// `POST /api/auth/verify`
///
/// Verifies an ID token and returns `{uid, email, name}`.
pub async fn verify_token(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<VerifyTokenRequest>,
) -> ApiResult<Json<VerifiedIdentity>> {
    let id_token = request
        .id_token
        .as_deref()
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing idToken"))?;

    match state.verifier.verify(id_token).await {
        Ok(identity) => Ok(Json(identity)),
        Err(e @ (AuthError::KeyFetch(_) | AuthError::NotConfigured)) => {
            warn!(error = %e, "ID token could not be verified");
            Err(ApiError::unauthorized("Invalid token"))
        }
        Err(e) => {
            debug!(error = %e, "ID token rejected");
            Err(ApiError::unauthorized("Invalid token"))
        }
    }
}
