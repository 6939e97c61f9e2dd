use crate::config::FacilitiesConfig;
use facility_store::{FacilityStore, MongoFacilityStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<FacilitiesConfig>,
    pub store: Arc<dyn FacilityStore>,
}

impl AppState {
    /// Creates the state with a MongoDB store.
    ///
    /// No connection is made here; the store connects on first use.
    pub fn new(config: FacilitiesConfig) -> Self {
        let store = MongoFacilityStore::new(config.mongodb.to_options());
        Self::with_store(config, Arc::new(store))
    }

    pub fn with_store(config: FacilitiesConfig, store: Arc<dyn FacilityStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Check that the store answers within the configured health check timeout
    pub async fn health_check(&self) -> Result<(), String> {
        let timeout_duration = Duration::from_secs(self.config.healthcheck_timeout);
        match timeout(timeout_duration, self.store.ping()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(err.to_string()),
            Err(_) => Err(format!(
                "Store health check timed out after {} seconds",
                self.config.healthcheck_timeout
            )),
        }
    }
}
