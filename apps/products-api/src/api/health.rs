//! Readiness endpoint; liveness comes from `axum_helpers::health_router`

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use axum_helpers::{run_health_checks, HealthCheckFuture};
use database::postgres::{check_health, DatabaseConnection};
use serde_json::Value;

async fn ready(
    State(db): State<DatabaseConnection>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let database: HealthCheckFuture =
        Box::pin(async move { check_health(&db).await.map_err(|e| e.to_string()) });

    run_health_checks(vec![("database", database)]).await
}

pub fn router(db: DatabaseConnection) -> Router {
    Router::new()
        .route("/ready", get(ready))
        .with_state(db)
}
