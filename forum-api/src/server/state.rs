// App state for the Axum server
use std::sync::Arc;

use forum_repository::ForumService;

use crate::auth::IdentityVerifier;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ForumService>,
    pub verifier: Arc<dyn IdentityVerifier>,
}
