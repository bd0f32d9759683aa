//! Health check endpoint handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::app::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: DatabaseHealth,
    pub external_services: ExternalServicesHealth,
}

#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
    /// `postgres`, or `memory` when running on the in-process stores.
    pub backend: &'static str,
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct ExternalServicesHealth {
    pub suggestions_enabled: bool,
    pub export_enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

async fn check_database(state: &AppState) -> DatabaseHealth {
    let Some(pool) = &state.pool else {
        return DatabaseHealth {
            backend: "memory",
            connected: true,
            latency_ms: None,
        };
    };

    match persistence::db::ping(pool).await {
        Ok(latency) => DatabaseHealth {
            backend: "postgres",
            connected: true,
            latency_ms: Some(latency.as_millis() as u64),
        },
        Err(e) => {
            tracing::warn!(error = %e, "Database ping failed");
            DatabaseHealth {
                backend: "postgres",
                connected: false,
                latency_ms: None,
            }
        }
    }
}

/// GET /api/health
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, StatusCode> {
    let database = check_database(&state).await;
    if !database.connected {
        tracing::warn!("Health check failed: database unreachable");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        database,
        external_services: ExternalServicesHealth {
            suggestions_enabled: state.config.suggestions.enabled,
            export_enabled: state.config.export.enabled,
        },
    }))
}

/// GET /api/health/live
pub async fn live() -> Json<StatusResponse> {
    Json(StatusResponse { status: "alive" })
}

/// GET /api/health/ready
pub async fn ready(State(state): State<AppState>) -> Result<Json<StatusResponse>, StatusCode> {
    if check_database(&state).await.connected {
        Ok(Json(StatusResponse { status: "ready" }))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}
