/// Like-toggle endpoints and the liked-videos read model.
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{comment_repo, like_repo, tweet_repo, video_repo};
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::{ApiEnvelope, LikeTarget};

/// POST /api/v1/likes/toggle/v/{videoId}
pub async fn toggle_video_like(
    pool: web::Data<PgPool>,
    user: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let video_id = path.into_inner();

    video_repo::find_by_id(pool.get_ref(), video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    let is_liked = like_repo::toggle(pool.get_ref(), user.0, LikeTarget::Video, video_id).await?;

    Ok(ApiEnvelope::ok(
        serde_json::json!({ "is_liked": is_liked }),
        "Video like toggled",
    ))
}

/// POST /api/v1/likes/toggle/c/{commentId}
pub async fn toggle_comment_like(
    pool: web::Data<PgPool>,
    user: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comment_id = path.into_inner();

    comment_repo::find_by_id(pool.get_ref(), comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    let is_liked =
        like_repo::toggle(pool.get_ref(), user.0, LikeTarget::Comment, comment_id).await?;

    Ok(ApiEnvelope::ok(
        serde_json::json!({ "is_liked": is_liked }),
        "Comment like toggled",
    ))
}

/// POST /api/v1/likes/toggle/t/{tweetId}
pub async fn toggle_tweet_like(
    pool: web::Data<PgPool>,
    user: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let tweet_id = path.into_inner();

    tweet_repo::find_by_id(pool.get_ref(), tweet_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tweet not found".to_string()))?;

    let is_liked = like_repo::toggle(pool.get_ref(), user.0, LikeTarget::Tweet, tweet_id).await?;

    Ok(ApiEnvelope::ok(
        serde_json::json!({ "tweet_id": tweet_id, "is_liked": is_liked }),
        "Tweet like toggled",
    ))
}

/// GET /api/v1/likes/videos
pub async fn get_liked_videos(pool: web::Data<PgPool>, user: UserId) -> Result<HttpResponse> {
    let videos = like_repo::liked_videos(pool.get_ref(), user.0).await?;

    Ok(ApiEnvelope::ok(videos, "Liked videos fetched successfully"))
}
