/// Channel dashboard endpoints for the authenticated channel owner.
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::db::video_repo;
use crate::error::Result;
use crate::middleware::UserId;
use crate::models::ApiEnvelope;

/// GET /api/v1/dashboard/stats
pub async fn get_channel_stats(pool: web::Data<PgPool>, user: UserId) -> Result<HttpResponse> {
    let stats = video_repo::channel_stats(pool.get_ref(), user.0).await?;

    Ok(ApiEnvelope::ok(stats, "Channel stats fetched successfully"))
}

/// GET /api/v1/dashboard/videos
pub async fn get_channel_videos(pool: web::Data<PgPool>, user: UserId) -> Result<HttpResponse> {
    let videos = video_repo::channel_videos(pool.get_ref(), user.0).await?;

    Ok(ApiEnvelope::ok(videos, "Channel videos fetched successfully"))
}
