//! Request middleware that resolves the caller's identity.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use forum_shared::VerifiedIdentity;
use tracing::{debug, warn};

use super::bearer_token;
use crate::errors::AuthError;
use crate::server::state::AppState;

/// Identity of the caller, inserted into request extensions by
/// [`identity_middleware`]. `None` for anonymous callers.
#[derive(Debug, Clone, Default)]
pub struct Caller(pub Option<VerifiedIdentity>);

impl Caller {
    pub fn identity(&self) -> Option<&VerifiedIdentity> {
        self.0.as_ref()
    }
}

/// Verify the bearer token, if any, and record the result as a [`Caller`].
///
/// Verification failures never reject the request; the caller is treated as
/// anonymous and each route decides whether that is acceptable.
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    // The request body is not Sync, so the token is copied out before awaiting.
    let token = bearer_token(req.headers()).map(str::to_owned);

    let identity = match token {
        Some(token) => match state.verifier.verify(&token).await {
            Ok(identity) => Some(identity),
            Err(e @ AuthError::KeyFetch(_)) => {
                warn!(error = %e, "Could not verify ID token, treating caller as anonymous");
                None
            }
            Err(e) => {
                debug!(error = %e, "Ignoring unverifiable ID token");
                None
            }
        },
        None => None,
    };

    if let Some(identity) = &identity {
        debug!(uid = %identity.uid, "Caller identified");
    }

    req.extensions_mut().insert(Caller(identity));
    next.run(req).await
}
