/// User repository - account rows, refresh-token rotation, channel profile
/// and watch-history read models.
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::views::{ChannelProfile, OwnerInfo, VideoWithOwner};
use crate::models::User;

const USER_COLUMNS: &str = "id, username, email, full_name, password_hash, avatar_url, cover_url, refresh_token_hash, created_at, updated_at";

/// Create a new user. Username and email are stored lowercase; uniqueness is
/// enforced by the store.
pub async fn create_user(
    pool: &PgPool,
    username: &str,
    email: &str,
    full_name: &str,
    password_hash: &str,
    avatar_url: &str,
    cover_url: Option<&str>,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (username, email, full_name, password_hash, avatar_url, cover_url)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(username.to_lowercase())
    .bind(email.to_lowercase())
    .bind(full_name)
    .bind(password_hash)
    .bind(avatar_url)
    .bind(cover_url)
    .fetch_one(pool)
    .await
}

/// Find a user by ID
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Find a user by username or email (login identifier)
pub async fn find_by_identifier(
    pool: &PgPool,
    identifier: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users
        WHERE username = $1 OR email = $1
        "#
    ))
    .bind(identifier.to_lowercase())
    .fetch_optional(pool)
    .await
}

/// Check whether a user row exists
pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
}

/// Check if username or email is already taken
pub async fn username_or_email_exists(
    pool: &PgPool,
    username: &str,
    email: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 OR email = $2)",
    )
    .bind(username.to_lowercase())
    .bind(email.to_lowercase())
    .fetch_one(pool)
    .await
}

/// Store (or clear) the refresh-token hash for a user
pub async fn set_refresh_token(
    pool: &PgPool,
    user_id: Uuid,
    token_hash: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET refresh_token_hash = $1, updated_at = NOW() WHERE id = $2")
        .bind(token_hash)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Rotate the stored refresh-token hash. The compare-and-swap only succeeds
/// when `old_hash` is still the current one, so a concurrent refresh (or a
/// replayed token) observes zero rows affected.
pub async fn rotate_refresh_token(
    pool: &PgPool,
    user_id: Uuid,
    old_hash: &str,
    new_hash: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET refresh_token_hash = $1, updated_at = NOW()
        WHERE id = $2 AND refresh_token_hash = $3
        "#,
    )
    .bind(new_hash)
    .bind(user_id)
    .bind(old_hash)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Update a user's password hash
pub async fn update_password(
    pool: &PgPool,
    user_id: Uuid,
    new_password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
        .bind(new_password_hash)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Update profile fields
pub async fn update_account(
    pool: &PgPool,
    user_id: Uuid,
    full_name: &str,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET full_name = $1, email = $2, updated_at = NOW()
        WHERE id = $3
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(full_name)
    .bind(email.to_lowercase())
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Replace the avatar URL
pub async fn update_avatar(
    pool: &PgPool,
    user_id: Uuid,
    avatar_url: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET avatar_url = $1, updated_at = NOW()
        WHERE id = $2
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(avatar_url)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Replace the cover-image URL
pub async fn update_cover(
    pool: &PgPool,
    user_id: Uuid,
    cover_url: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET cover_url = $1, updated_at = NOW()
        WHERE id = $2
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(cover_url)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Channel profile read model: the profile row plus subscriber counts and
/// the viewer's subscription flag, all derived from the subscriptions table.
pub async fn channel_profile(
    pool: &PgPool,
    username: &str,
    viewer_id: Uuid,
) -> Result<Option<ChannelProfile>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT u.id, u.username, u.full_name, u.email, u.avatar_url, u.cover_url,
               (SELECT COUNT(*) FROM subscriptions s WHERE s.channel_id = u.id) AS subscribers_count,
               (SELECT COUNT(*) FROM subscriptions s WHERE s.subscriber_id = u.id) AS channels_subscribed_to_count,
               EXISTS(
                   SELECT 1 FROM subscriptions s
                   WHERE s.channel_id = u.id AND s.subscriber_id = $2
               ) AS is_subscribed
        FROM users u
        WHERE u.username = $1
        "#,
    )
    .bind(username.to_lowercase())
    .bind(viewer_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| ChannelProfile {
        id: row.get("id"),
        username: row.get("username"),
        full_name: row.get("full_name"),
        email: row.get("email"),
        avatar_url: row.get("avatar_url"),
        cover_url: row.get("cover_url"),
        subscribers_count: row.get("subscribers_count"),
        channels_subscribed_to_count: row.get("channels_subscribed_to_count"),
        is_subscribed: row.get("is_subscribed"),
    }))
}

/// Watch-history read model: the viewer's watched videos, most recent first,
/// each joined with its owner's profile fields.
pub async fn watch_history(pool: &PgPool, user_id: Uuid) -> Result<Vec<VideoWithOwner>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT v.id, v.title, v.description, v.video_url, v.thumbnail_url,
               v.duration, v.views, v.created_at,
               u.username, u.full_name, u.avatar_url
        FROM watch_history h
        JOIN videos v ON v.id = h.video_id
        JOIN users u ON u.id = v.owner_id
        WHERE h.user_id = $1
        ORDER BY h.watched_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| VideoWithOwner {
            id: row.get("id"),
            title: row.get("title"),
            description: row.get("description"),
            video_url: row.get("video_url"),
            thumbnail_url: row.get("thumbnail_url"),
            duration: row.get("duration"),
            views: row.get("views"),
            created_at: row.get("created_at"),
            owner: OwnerInfo {
                username: row.get("username"),
                full_name: row.get("full_name"),
                avatar_url: row.get("avatar_url"),
            },
        })
        .collect())
}

/// Record (or refresh) a watch-history entry for the viewer
pub async fn record_watch(pool: &PgPool, user_id: Uuid, video_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO watch_history (user_id, video_id, watched_at)
        VALUES ($1, $2, NOW())
        ON CONFLICT (user_id, video_id) DO UPDATE SET watched_at = NOW()
        "#,
    )
    .bind(user_id)
    .bind(video_id)
    .execute(pool)
    .await?;

    Ok(())
}
