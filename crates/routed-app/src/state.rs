//! Application state.

use std::sync::Arc;

use routed_client::{InflightRegistry, PlannerClient, RouteApiClient};
use routed_core::UserId;
use routed_store::PreferenceStore;

use crate::config::AppConfig;
use crate::error::AppError;

/// State shared across application commands.
pub struct AppState {
    /// The storage backend.
    pub store: Arc<dyn PreferenceStore>,

    /// Route backend client.
    pub api: RouteApiClient,

    /// Itinerary planner client (optional).
    pub planner: Option<PlannerClient>,

    /// Duplicate-request suppression.
    pub inflight: InflightRegistry,

    /// The current user.
    pub user_id: UserId,

    /// Configuration the state was built from.
    pub config: AppConfig,
}

impl AppState {
    /// Create application state from configuration and an opened store.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured user id is invalid.
    pub fn new(store: Arc<dyn PreferenceStore>, config: AppConfig) -> Result<Self, AppError> {
        let user_id = UserId::new(config.user_id.clone())?;

        let api = RouteApiClient::new(&config.backend_url);

        // Create the planner client if configured
        let planner = config.planner_api_key.as_ref().map(|key| {
            tracing::info!(model = %config.planner_model, "itinerary planner enabled");
            PlannerClient::new(key).with_model(&config.planner_model)
        });

        if planner.is_none() {
            tracing::warn!("planner not configured - itinerary generation will not be available");
        }

        Ok(Self {
            store,
            api,
            planner,
            inflight: InflightRegistry::new(),
            user_id,
            config,
        })
    }

    /// The planner, or an error when it is not configured.
    ///
    /// # Errors
    ///
    /// Returns `AppError::PlannerUnavailable` when no API key was set.
    pub fn planner(&self) -> Result<&PlannerClient, AppError> {
        self.planner.as_ref().ok_or(AppError::PlannerUnavailable)
    }
}
