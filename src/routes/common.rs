//! Service routes: liveness, readiness (database and catalog), version.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

#[derive(Serialize)]
struct ReadyBody {
    status: &'static str,
    database: &'static str,
    catalog: &'static str,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyBody>) {
    let database_ok = sqlx::query("SELECT 1").fetch_optional(&state.pool).await.is_ok();
    let catalog_ok = match state.catalog.list_visible_tables().await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "catalog not readable");
            false
        }
    };
    let label = |ok: bool| if ok { "ok" } else { "unavailable" };
    let status = if database_ok && catalog_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(ReadyBody {
            status: if status == StatusCode::OK { "ok" } else { "degraded" },
            database: label(database_ok),
            catalog: label(catalog_ok),
        }),
    )
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /health, GET /version (no state).
pub fn common_routes() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
}

/// GET /health, GET /ready, GET /version.
pub fn common_routes_with_ready(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .with_state(state)
}
