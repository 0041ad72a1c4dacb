//! Health check handler.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use docshare_core::result::AppResult;

use crate::dto::response::{ApiResponse, ComponentHealth, HealthResponse};
use crate::state::AppState;

fn reachable(component: &str, result: AppResult<bool>) -> bool {
    result.unwrap_or_else(|e| {
        warn!(component, error = %e, "Health check failed");
        false
    })
}

/// GET /api/v1/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let (database, blob_store) =
        tokio::join!(state.store.health_check(), state.blobs.health_check());
    let database = ComponentHealth {
        provider: state.store.backend().to_string(),
        healthy: reachable("database", database),
    };
    let blob_store = ComponentHealth {
        provider: state.blobs.provider_type().to_string(),
        healthy: reachable("blob_store", blob_store),
    };

    let status = if database.healthy && blob_store.healthy {
        "ok"
    } else {
        "degraded"
    };
    Json(ApiResponse::ok(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
        blob_store,
    }))
}
