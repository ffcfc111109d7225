/// Subscription repository - the directed subscriber→channel edge plus the
/// subscriber-list and subscribed-channels read models.
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::views::{SubscribedChannelView, SubscriberView, VideoSummary};

/// Flip the subscription state for (subscriber, channel). Conditional
/// delete-else-insert in one transaction, with the unique pair index
/// guaranteeing at most one edge. Returns the new state.
pub async fn toggle(
    pool: &PgPool,
    subscriber_id: Uuid,
    channel_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let deleted =
        sqlx::query("DELETE FROM subscriptions WHERE subscriber_id = $1 AND channel_id = $2")
            .bind(subscriber_id)
            .bind(channel_id)
            .execute(&mut *tx)
            .await?;

    let subscribed = if deleted.rows_affected() == 0 {
        sqlx::query(
            r#"
            INSERT INTO subscriptions (subscriber_id, channel_id)
            VALUES ($1, $2)
            ON CONFLICT (subscriber_id, channel_id) DO NOTHING
            "#,
        )
        .bind(subscriber_id)
        .bind(channel_id)
        .execute(&mut *tx)
        .await?;

        true
    } else {
        false
    };

    tx.commit().await?;

    Ok(subscribed)
}

/// Check if a subscriber follows a channel
pub async fn is_subscribed(
    pool: &PgPool,
    subscriber_id: Uuid,
    channel_id: Uuid,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM subscriptions WHERE subscriber_id = $1 AND channel_id = $2)",
    )
    .bind(subscriber_id)
    .bind(channel_id)
    .fetch_one(pool)
    .await
}

/// Subscriber-list read model: the channel's subscribers with their profile
/// fields, whether the channel follows each one back, and each subscriber's
/// own follower count.
pub async fn channel_subscribers(
    pool: &PgPool,
    channel_id: Uuid,
) -> Result<Vec<SubscriberView>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT u.id, u.username, u.full_name, u.avatar_url,
               EXISTS(
                   SELECT 1 FROM subscriptions back
                   WHERE back.subscriber_id = $1 AND back.channel_id = u.id
               ) AS subscribed_to_subscriber,
               (SELECT COUNT(*) FROM subscriptions own
                WHERE own.channel_id = u.id) AS subscribers_count
        FROM subscriptions s
        JOIN users u ON u.id = s.subscriber_id
        WHERE s.channel_id = $1
        ORDER BY s.created_at DESC
        "#,
    )
    .bind(channel_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| SubscriberView {
            id: row.get("id"),
            username: row.get("username"),
            full_name: row.get("full_name"),
            avatar_url: row.get("avatar_url"),
            subscribed_to_subscriber: row.get("subscribed_to_subscriber"),
            subscribers_count: row.get("subscribers_count"),
        })
        .collect())
}

/// Subscribed-channels read model: the channels a user follows, each with
/// its most recent published video (if any).
pub async fn subscribed_channels(
    pool: &PgPool,
    subscriber_id: Uuid,
) -> Result<Vec<SubscribedChannelView>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT u.id, u.username, u.full_name, u.avatar_url,
               v.id AS video_id, v.title, v.description, v.video_url,
               v.thumbnail_url, v.duration, v.views, v.created_at AS video_created_at
        FROM subscriptions s
        JOIN users u ON u.id = s.channel_id
        LEFT JOIN LATERAL (
            SELECT id, title, description, video_url, thumbnail_url, duration, views, created_at
            FROM videos
            WHERE owner_id = u.id AND is_published
            ORDER BY created_at DESC
            LIMIT 1
        ) v ON TRUE
        WHERE s.subscriber_id = $1
        ORDER BY s.created_at DESC
        "#,
    )
    .bind(subscriber_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let latest_video = row
                .get::<Option<Uuid>, _>("video_id")
                .map(|video_id| VideoSummary {
                    id: video_id,
                    title: row.get("title"),
                    description: row.get("description"),
                    video_url: row.get("video_url"),
                    thumbnail_url: row.get("thumbnail_url"),
                    duration: row.get("duration"),
                    views: row.get("views"),
                    created_at: row.get("video_created_at"),
                });

            SubscribedChannelView {
                id: row.get("id"),
                username: row.get("username"),
                full_name: row.get("full_name"),
                avatar_url: row.get("avatar_url"),
                latest_video,
            }
        })
        .collect())
}
