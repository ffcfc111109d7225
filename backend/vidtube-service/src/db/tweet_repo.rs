/// Tweet repository - rows plus the user-tweets feed read model.
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::views::{OwnerBrief, TweetView};
use crate::models::Tweet;

const TWEET_COLUMNS: &str = "id, owner_id, content, created_at, updated_at";

/// Create a new tweet
pub async fn create_tweet(pool: &PgPool, owner_id: Uuid, content: &str) -> Result<Tweet, sqlx::Error> {
    sqlx::query_as::<_, Tweet>(&format!(
        r#"
        INSERT INTO tweets (owner_id, content)
        VALUES ($1, $2)
        RETURNING {TWEET_COLUMNS}
        "#
    ))
    .bind(owner_id)
    .bind(content)
    .fetch_one(pool)
    .await
}

/// Get a single tweet by ID
pub async fn find_by_id(pool: &PgPool, tweet_id: Uuid) -> Result<Option<Tweet>, sqlx::Error> {
    sqlx::query_as::<_, Tweet>(&format!(
        r#"
        SELECT {TWEET_COLUMNS}
        FROM tweets
        WHERE id = $1
        "#
    ))
    .bind(tweet_id)
    .fetch_optional(pool)
    .await
}

/// Update tweet content
pub async fn update_tweet(
    pool: &PgPool,
    tweet_id: Uuid,
    content: &str,
) -> Result<Option<Tweet>, sqlx::Error> {
    sqlx::query_as::<_, Tweet>(&format!(
        r#"
        UPDATE tweets
        SET content = $1, updated_at = NOW()
        WHERE id = $2
        RETURNING {TWEET_COLUMNS}
        "#
    ))
    .bind(content)
    .bind(tweet_id)
    .fetch_optional(pool)
    .await
}

/// Delete a tweet together with every like row that targets it
pub async fn delete_tweet(pool: &PgPool, tweet_id: Uuid) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM likes WHERE target_kind = 'tweet' AND target_id = $1")
        .bind(tweet_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM tweets WHERE id = $1")
        .bind(tweet_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await
}

/// User-tweets read model: owner username/avatar, like count from joined-set
/// cardinality, the viewer's like flag, newest-first.
pub async fn user_tweets(
    pool: &PgPool,
    owner_id: Uuid,
    viewer_id: Uuid,
) -> Result<Vec<TweetView>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT t.id, t.content, t.created_at,
               u.username, u.avatar_url,
               COUNT(l.id) AS likes_count,
               COALESCE(BOOL_OR(l.liked_by = $2), FALSE) AS is_liked
        FROM tweets t
        JOIN users u ON u.id = t.owner_id
        LEFT JOIN likes l ON l.target_kind = 'tweet' AND l.target_id = t.id
        WHERE t.owner_id = $1
        GROUP BY t.id, u.username, u.avatar_url
        ORDER BY t.created_at DESC
        "#,
    )
    .bind(owner_id)
    .bind(viewer_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| TweetView {
            id: row.get("id"),
            content: row.get("content"),
            created_at: row.get("created_at"),
            owner: OwnerBrief {
                username: row.get("username"),
                avatar_url: row.get("avatar_url"),
            },
            likes_count: row.get("likes_count"),
            is_liked: row.get("is_liked"),
        })
        .collect())
}
