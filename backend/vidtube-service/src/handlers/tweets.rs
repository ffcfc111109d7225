/// Tweet endpoints: create, per-user feed, ownership-checked mutations.
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{tweet_repo, user_repo};
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::ApiEnvelope;

#[derive(Debug, Deserialize)]
pub struct TweetBody {
    pub content: String,
}

/// POST /api/v1/tweets
pub async fn create_tweet(
    pool: web::Data<PgPool>,
    user: UserId,
    req: web::Json<TweetBody>,
) -> Result<HttpResponse> {
    if req.content.trim().is_empty() {
        return Err(AppError::Validation("Content is required".to_string()));
    }

    let tweet = tweet_repo::create_tweet(pool.get_ref(), user.0, req.content.trim()).await?;

    Ok(ApiEnvelope::created(
        tweet,
        "Tweet has been created successfully",
    ))
}

/// GET /api/v1/tweets/user/{userId}
pub async fn get_user_tweets(
    pool: web::Data<PgPool>,
    user: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let owner_id = path.into_inner();

    if !user_repo::exists(pool.get_ref(), owner_id).await? {
        return Err(AppError::NotFound("User does not exist".to_string()));
    }

    let tweets = tweet_repo::user_tweets(pool.get_ref(), owner_id, user.0).await?;

    Ok(ApiEnvelope::ok(tweets, "User tweets fetched successfully"))
}

/// PATCH /api/v1/tweets/{tweetId}
pub async fn update_tweet(
    pool: web::Data<PgPool>,
    user: UserId,
    path: web::Path<Uuid>,
    req: web::Json<TweetBody>,
) -> Result<HttpResponse> {
    if req.content.trim().is_empty() {
        return Err(AppError::Validation("Content is required".to_string()));
    }

    let tweet_id = path.into_inner();
    let tweet = tweet_repo::find_by_id(pool.get_ref(), tweet_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tweet not found".to_string()))?;

    if tweet.owner_id != user.0 {
        return Err(AppError::Authorization(
            "Only the owner can edit their tweet".to_string(),
        ));
    }

    let updated = tweet_repo::update_tweet(pool.get_ref(), tweet_id, req.content.trim())
        .await?
        .ok_or_else(|| AppError::Internal("Failed to edit tweet".to_string()))?;

    Ok(ApiEnvelope::ok(updated, "Tweet updated successfully"))
}

/// DELETE /api/v1/tweets/{tweetId}
pub async fn delete_tweet(
    pool: web::Data<PgPool>,
    user: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let tweet_id = path.into_inner();
    let tweet = tweet_repo::find_by_id(pool.get_ref(), tweet_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tweet not found".to_string()))?;

    if tweet.owner_id != user.0 {
        return Err(AppError::Authorization(
            "Only the owner can delete their tweet".to_string(),
        ));
    }

    tweet_repo::delete_tweet(pool.get_ref(), tweet_id).await?;

    Ok(ApiEnvelope::ok(
        serde_json::json!({ "tweet_id": tweet_id }),
        "Tweet deleted successfully",
    ))
}
