use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::error::Result;
use crate::models::ApiEnvelope;

/// Liveness: the process is up.
pub async fn liveness_check() -> HttpResponse {
    ApiEnvelope::ok(serde_json::json!({ "status": "ok" }), "Service is live")
}

/// Readiness: the store answers.
pub async fn readiness_check(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool.get_ref())
        .await?;

    Ok(ApiEnvelope::ok(
        serde_json::json!({ "status": "ok" }),
        "Service is ready",
    ))
}
