/// Video repository - catalog rows plus the single-video, listing and
/// dashboard read models.
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::views::{
    ChannelStats, ChannelVideo, OwnerInfo, VideoDetail, VideoOwner, VideoWithOwner,
};
use crate::models::Video;

const VIDEO_COLUMNS: &str = "id, owner_id, title, description, video_url, thumbnail_url, duration, views, is_published, created_at, updated_at";

/// Create a new video row
pub async fn create_video(
    pool: &PgPool,
    owner_id: Uuid,
    title: &str,
    description: &str,
    video_url: &str,
    thumbnail_url: &str,
    duration: f64,
) -> Result<Video, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!(
        r#"
        INSERT INTO videos (owner_id, title, description, video_url, thumbnail_url, duration)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {VIDEO_COLUMNS}
        "#
    ))
    .bind(owner_id)
    .bind(title)
    .bind(description)
    .bind(video_url)
    .bind(thumbnail_url)
    .bind(duration)
    .fetch_one(pool)
    .await
}

/// Find a video by ID
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!(
        r#"
        SELECT {VIDEO_COLUMNS}
        FROM videos
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Single-video read model: the video joined with its owner profile, the
/// owner's subscriber count, and the viewer's like/subscription flags.
pub async fn video_detail(
    pool: &PgPool,
    video_id: Uuid,
    viewer_id: Uuid,
) -> Result<Option<VideoDetail>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT v.id, v.title, v.description, v.video_url, v.thumbnail_url,
               v.duration, v.views, v.is_published, v.created_at,
               u.id AS owner_id, u.username, u.full_name, u.avatar_url,
               (SELECT COUNT(*) FROM subscriptions s WHERE s.channel_id = u.id) AS subscribers_count,
               EXISTS(
                   SELECT 1 FROM subscriptions s
                   WHERE s.channel_id = u.id AND s.subscriber_id = $2
               ) AS is_subscribed,
               (SELECT COUNT(*) FROM likes l
                WHERE l.target_kind = 'video' AND l.target_id = v.id) AS likes_count,
               EXISTS(
                   SELECT 1 FROM likes l
                   WHERE l.target_kind = 'video' AND l.target_id = v.id AND l.liked_by = $2
               ) AS is_liked
        FROM videos v
        JOIN users u ON u.id = v.owner_id
        WHERE v.id = $1
        "#,
    )
    .bind(video_id)
    .bind(viewer_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| VideoDetail {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        video_url: row.get("video_url"),
        thumbnail_url: row.get("thumbnail_url"),
        duration: row.get("duration"),
        views: row.get("views"),
        is_published: row.get("is_published"),
        created_at: row.get("created_at"),
        owner: VideoOwner {
            id: row.get("owner_id"),
            username: row.get("username"),
            full_name: row.get("full_name"),
            avatar_url: row.get("avatar_url"),
            subscribers_count: row.get("subscribers_count"),
            is_subscribed: row.get("is_subscribed"),
        },
        likes_count: row.get("likes_count"),
        is_liked: row.get("is_liked"),
    }))
}

/// Bump the view counter
pub async fn increment_views(pool: &PgPool, video_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE videos SET views = views + 1 WHERE id = $1")
        .bind(video_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Update title/description and optionally the thumbnail
pub async fn update_video(
    pool: &PgPool,
    video_id: Uuid,
    title: &str,
    description: &str,
    thumbnail_url: Option<&str>,
) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!(
        r#"
        UPDATE videos
        SET title = $1, description = $2,
            thumbnail_url = COALESCE($3, thumbnail_url),
            updated_at = NOW()
        WHERE id = $4
        RETURNING {VIDEO_COLUMNS}
        "#
    ))
    .bind(title)
    .bind(description)
    .bind(thumbnail_url)
    .bind(video_id)
    .fetch_optional(pool)
    .await
}

/// Flip the publish flag
pub async fn toggle_publish(pool: &PgPool, video_id: Uuid) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!(
        r#"
        UPDATE videos
        SET is_published = NOT is_published, updated_at = NOW()
        WHERE id = $1
        RETURNING {VIDEO_COLUMNS}
        "#
    ))
    .bind(video_id)
    .fetch_optional(pool)
    .await
}

/// Delete a video together with every like row that targets it or one of
/// its comments. Comments and playlist membership go via FK cascade.
pub async fn delete_video(pool: &PgPool, video_id: Uuid) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        DELETE FROM likes
        WHERE target_kind = 'comment'
          AND target_id IN (SELECT id FROM comments WHERE video_id = $1)
        "#,
    )
    .bind(video_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM likes WHERE target_kind = 'video' AND target_id = $1")
        .bind(video_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM videos WHERE id = $1")
        .bind(video_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await
}

/// Published-catalog read model: optional owner and title filters,
/// newest-first, paginated.
pub async fn list_published(
    pool: &PgPool,
    owner_id: Option<Uuid>,
    title_query: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<VideoWithOwner>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT v.id, v.title, v.description, v.video_url, v.thumbnail_url,
               v.duration, v.views, v.created_at,
               u.username, u.full_name, u.avatar_url
        FROM videos v
        JOIN users u ON u.id = v.owner_id
        WHERE v.is_published
          AND ($1::uuid IS NULL OR v.owner_id = $1)
          AND ($2::text IS NULL OR v.title ILIKE '%' || $2 || '%')
        ORDER BY v.created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(owner_id)
    .bind(title_query)
    .bind(limit)
    .bind(offset)
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

/// Count the rows behind [`list_published`] for the pagination envelope
pub async fn count_published(
    pool: &PgPool,
    owner_id: Option<Uuid>,
    title_query: Option<&str>,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM videos v
        WHERE v.is_published
          AND ($1::uuid IS NULL OR v.owner_id = $1)
          AND ($2::text IS NULL OR v.title ILIKE '%' || $2 || '%')
        "#,
    )
    .bind(owner_id)
    .bind(title_query)
    .fetch_one(pool)
    .await
}

/// Dashboard listing: every video of the channel with its like count,
/// newest-first.
pub async fn channel_videos(pool: &PgPool, owner_id: Uuid) -> Result<Vec<ChannelVideo>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT v.id, v.title, v.description, v.video_url, v.thumbnail_url,
               v.duration, v.views, v.is_published, v.created_at,
               COUNT(l.id) AS likes_count
        FROM videos v
        LEFT JOIN likes l ON l.target_kind = 'video' AND l.target_id = v.id
        WHERE v.owner_id = $1
        GROUP BY v.id
        ORDER BY v.created_at DESC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| ChannelVideo {
            id: row.get("id"),
            title: row.get("title"),
            description: row.get("description"),
            video_url: row.get("video_url"),
            thumbnail_url: row.get("thumbnail_url"),
            duration: row.get("duration"),
            views: row.get("views"),
            is_published: row.get("is_published"),
            created_at: row.get("created_at"),
            likes_count: row.get("likes_count"),
        })
        .collect())
}

/// Dashboard stats: subscriber count, video count, summed views and summed
/// like rows over the channel's videos. Everything is derived from the
/// joined sets, never from stored counters.
pub async fn channel_stats(pool: &PgPool, owner_id: Uuid) -> Result<ChannelStats, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT
            (SELECT COUNT(*) FROM subscriptions WHERE channel_id = $1) AS total_subscribers,
            (SELECT COUNT(*) FROM videos WHERE owner_id = $1) AS total_videos,
            (SELECT COALESCE(SUM(views), 0)::BIGINT FROM videos WHERE owner_id = $1) AS total_views,
            (SELECT COUNT(*)
             FROM likes l
             JOIN videos v ON v.id = l.target_id
             WHERE l.target_kind = 'video' AND v.owner_id = $1) AS total_likes
        "#,
    )
    .bind(owner_id)
    .fetch_one(pool)
    .await?;

    Ok(ChannelStats {
        total_subscribers: row.get("total_subscribers"),
        total_videos: row.get("total_videos"),
        total_views: row.get("total_views"),
        total_likes: row.get("total_likes"),
    })
}
