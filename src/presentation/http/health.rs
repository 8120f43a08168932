use std::path::PathBuf;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct HealthState {
    pool: PgPool,
    uploads_dir: PathBuf,
}

#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
pub struct HealthResp {
    /// `ok` when every dependency answers, `degraded` otherwise
    pub status: &'static str,
    pub database: &'static str,
    pub uploads: &'static str,
}

fn report(database_up: bool, uploads_up: bool) -> HealthResp {
    let label = |up: bool| if up { "up" } else { "down" };
    HealthResp {
        status: if database_up && uploads_up { "ok" } else { "degraded" },
        database: label(database_up),
        uploads: label(uploads_up),
    }
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    security(()),
    responses((status = 200, body = HealthResp))
)]
pub async fn health(State(state): State<HealthState>) -> Json<HealthResp> {
    let database_up = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.pool)
        .await
        .is_ok();
    let uploads_up = tokio::fs::metadata(&state.uploads_dir)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    let resp = report(database_up, uploads_up);
    if resp.status != "ok" {
        tracing::warn!(database = resp.database, uploads = resp.uploads, "health_degraded");
    }
    Json(resp)
}

pub fn routes(pool: PgPool, uploads_dir: impl Into<PathBuf>) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState {
        pool,
        uploads_dir: uploads_dir.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::report;

    #[test]
    fn any_missing_dependency_degrades() {
        assert_eq!(report(true, true).status, "ok");
        let no_db = report(false, true);
        assert_eq!(no_db.status, "degraded");
        assert_eq!(no_db.database, "down");
        assert_eq!(no_db.uploads, "up");
        assert_eq!(report(true, false).status, "degraded");
    }
}
