/// Subscription endpoints: the toggle plus both directions of the edge list.
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{subscription_repo, user_repo};
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::ApiEnvelope;

/// POST /api/v1/subscriptions/c/{channelId}
pub async fn toggle_subscription(
    pool: web::Data<PgPool>,
    user: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let channel_id = path.into_inner();

    if channel_id == user.0 {
        return Err(AppError::Validation(
            "Cannot subscribe to yourself".to_string(),
        ));
    }

    if !user_repo::exists(pool.get_ref(), channel_id).await? {
        return Err(AppError::NotFound("Channel does not exist".to_string()));
    }

    let subscribed = subscription_repo::toggle(pool.get_ref(), user.0, channel_id).await?;

    let message = if subscribed {
        "Channel subscribed successfully"
    } else {
        "Channel unsubscribed successfully"
    };

    Ok(ApiEnvelope::ok(
        serde_json::json!({ "subscribed": subscribed }),
        message,
    ))
}

/// GET /api/v1/subscriptions/c/{channelId}
pub async fn get_channel_subscribers(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let channel_id = path.into_inner();

    if !user_repo::exists(pool.get_ref(), channel_id).await? {
        return Err(AppError::NotFound("Channel does not exist".to_string()));
    }

    let subscribers = subscription_repo::channel_subscribers(pool.get_ref(), channel_id).await?;

    Ok(ApiEnvelope::ok(subscribers, "Subscribers fetched successfully"))
}

/// GET /api/v1/subscriptions/u/{subscriberId}
pub async fn get_subscribed_channels(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let subscriber_id = path.into_inner();

    if !user_repo::exists(pool.get_ref(), subscriber_id).await? {
        return Err(AppError::NotFound("User does not exist".to_string()));
    }

    let channels = subscription_repo::subscribed_channels(pool.get_ref(), subscriber_id).await?;

    Ok(ApiEnvelope::ok(
        channels,
        "Subscribed channels fetched successfully",
    ))
}
