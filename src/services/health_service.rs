use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report whether a storage backend is usable, pinging it when one is installed.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.require_game_store().await {
        Ok(store) => {
            if let Err(err) = store.health_check().await {
                warn!(error = %err, "storage health check failed");
                return HealthResponse::new(true);
            }
            HealthResponse::new(false)
        }
        Err(_) => {
            warn!("storage unavailable (degraded mode)");
            HealthResponse::new(true)
        }
    }
}
