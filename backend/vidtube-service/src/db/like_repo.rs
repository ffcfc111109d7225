/// Like repository - polymorphic like rows keyed by (liked_by, target_kind,
/// target_id) with a unique index, plus the liked-videos read model.
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::views::{OwnerInfo, VideoWithOwner};
use crate::models::LikeTarget;

/// Flip the like state for (viewer, target). Runs as a conditional
/// delete-else-insert inside one transaction; the unique index keeps
/// concurrent toggles from ever producing a second row. Returns the new
/// state.
pub async fn toggle(
    pool: &PgPool,
    liked_by: Uuid,
    target: LikeTarget,
    target_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let deleted = sqlx::query(
        "DELETE FROM likes WHERE liked_by = $1 AND target_kind = $2 AND target_id = $3",
    )
    .bind(liked_by)
    .bind(target.as_str())
    .bind(target_id)
    .execute(&mut *tx)
    .await?;

    let is_liked = if deleted.rows_affected() == 0 {
        sqlx::query(
            r#"
            INSERT INTO likes (liked_by, target_kind, target_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (liked_by, target_kind, target_id) DO NOTHING
            "#,
        )
        .bind(liked_by)
        .bind(target.as_str())
        .bind(target_id)
        .execute(&mut *tx)
        .await?;

        true
    } else {
        false
    };

    tx.commit().await?;

    Ok(is_liked)
}

/// Check whether the viewer has liked a target
pub async fn has_liked(
    pool: &PgPool,
    liked_by: Uuid,
    target: LikeTarget,
    target_id: Uuid,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM likes WHERE liked_by = $1 AND target_kind = $2 AND target_id = $3)",
    )
    .bind(liked_by)
    .bind(target.as_str())
    .bind(target_id)
    .fetch_one(pool)
    .await
}

/// Count like rows for a target
pub async fn count_for_target(
    pool: &PgPool,
    target: LikeTarget,
    target_id: Uuid,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM likes WHERE target_kind = $1 AND target_id = $2",
    )
    .bind(target.as_str())
    .bind(target_id)
    .fetch_one(pool)
    .await
}

/// Liked-videos read model: the viewer's video likes resolved to full video
/// documents with owner profiles, ordered by like creation time.
pub async fn liked_videos(pool: &PgPool, viewer_id: Uuid) -> Result<Vec<VideoWithOwner>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT v.id, v.title, v.description, v.video_url, v.thumbnail_url,
               v.duration, v.views, v.created_at,
               u.username, u.full_name, u.avatar_url
        FROM likes l
        JOIN videos v ON v.id = l.target_id
        JOIN users u ON u.id = v.owner_id
        WHERE l.liked_by = $1 AND l.target_kind = 'video'
        ORDER BY l.created_at DESC
        "#,
    )
    .bind(viewer_id)
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
