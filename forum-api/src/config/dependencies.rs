//! Dependency initialization and wiring for the forum API.

use std::sync::Arc;

use forum_repository::{
    ForumService, ForumServiceConfig, ForumStore, InMemoryStore, NotionStore,
};
use tracing::{info, warn};

use super::settings::{Settings, StoreBackend};
use crate::auth::{DisabledVerifier, FirebaseVerifier, IdentityVerifier};
use crate::server::state::AppState;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Shared state handed to the router.
    pub state: AppState,
}

impl Dependencies {
    /// Build the store, identity verifier and service described by `settings`.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(anyhow::Error)` - If the store or verifier cannot be created
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        info!(
            addr = %settings.addr,
            backend = ?settings.backend,
            counter_mode = ?settings.counter_mode,
            max_retries = settings.retry.max_retries,
            base_delay_ms = settings.retry.base_delay.as_millis() as u64,
            identity_verification = settings.firebase_project_id.is_some(),
            "Initializing dependencies"
        );

        let store: Arc<dyn ForumStore> = match (settings.backend, &settings.notion) {
            (StoreBackend::Notion, Some(notion)) => Arc::new(NotionStore::new(notion.clone())?),
            (StoreBackend::Notion, None) => {
                anyhow::bail!("Notion backend selected without Notion settings")
            }
            (StoreBackend::Memory, _) => {
                warn!("Using the in-memory store; data is lost on restart");
                Arc::new(InMemoryStore::new())
            }
        };

        let verifier: Arc<dyn IdentityVerifier> = match &settings.firebase_project_id {
            Some(project_id) => Arc::new(FirebaseVerifier::new(project_id.clone())?),
            None => {
                warn!("FIREBASE_PROJECT_ID is not set; every caller is anonymous and upvotes are disabled");
                Arc::new(DisabledVerifier)
            }
        };

        let config = ForumServiceConfig::default()
            .with_retry(settings.retry)
            .with_counter_mode(settings.counter_mode);
        let service = Arc::new(ForumService::with_config(store, config));

        Ok(Self {
            state: AppState { service, verifier },
        })
    }
}
