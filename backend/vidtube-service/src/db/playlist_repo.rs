/// Playlist repository - rows, membership set-semantics, and the detail and
/// per-user read models.
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::views::{OwnerInfo, PlaylistDetail, PlaylistSummary, VideoSummary};
use crate::models::Playlist;

const PLAYLIST_COLUMNS: &str = "id, owner_id, name, description, created_at, updated_at";

/// Create a new playlist
pub async fn create_playlist(
    pool: &PgPool,
    owner_id: Uuid,
    name: &str,
    description: &str,
) -> Result<Playlist, sqlx::Error> {
    sqlx::query_as::<_, Playlist>(&format!(
        r#"
        INSERT INTO playlists (owner_id, name, description)
        VALUES ($1, $2, $3)
        RETURNING {PLAYLIST_COLUMNS}
        "#
    ))
    .bind(owner_id)
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await
}

/// Find a playlist by ID
pub async fn find_by_id(pool: &PgPool, playlist_id: Uuid) -> Result<Option<Playlist>, sqlx::Error> {
    sqlx::query_as::<_, Playlist>(&format!(
        r#"
        SELECT {PLAYLIST_COLUMNS}
        FROM playlists
        WHERE id = $1
        "#
    ))
    .bind(playlist_id)
    .fetch_optional(pool)
    .await
}

/// Update name and description
pub async fn update_playlist(
    pool: &PgPool,
    playlist_id: Uuid,
    name: &str,
    description: &str,
) -> Result<Option<Playlist>, sqlx::Error> {
    sqlx::query_as::<_, Playlist>(&format!(
        r#"
        UPDATE playlists
        SET name = $1, description = $2, updated_at = NOW()
        WHERE id = $3
        RETURNING {PLAYLIST_COLUMNS}
        "#
    ))
    .bind(name)
    .bind(description)
    .bind(playlist_id)
    .fetch_optional(pool)
    .await
}

/// Delete a playlist (membership rows go via FK cascade)
pub async fn delete_playlist(pool: &PgPool, playlist_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM playlists WHERE id = $1")
        .bind(playlist_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Set-insert a video into a playlist; re-adding an existing member is a
/// no-op.
pub async fn add_video(pool: &PgPool, playlist_id: Uuid, video_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO playlist_videos (playlist_id, video_id, position)
        SELECT $1, $2, COALESCE(MAX(position) + 1, 0)
        FROM playlist_videos
        WHERE playlist_id = $1
        ON CONFLICT (playlist_id, video_id) DO NOTHING
        "#,
    )
    .bind(playlist_id)
    .bind(video_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Remove a video from a playlist
pub async fn remove_video(
    pool: &PgPool,
    playlist_id: Uuid,
    video_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM playlist_videos WHERE playlist_id = $1 AND video_id = $2")
        .bind(playlist_id)
        .bind(video_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Playlist-detail read model. The inner join against published member
/// videos means a playlist whose every referenced video is unpublished
/// resolves to no row at all.
pub async fn playlist_detail(
    pool: &PgPool,
    playlist_id: Uuid,
) -> Result<Option<PlaylistDetail>, sqlx::Error> {
    let header = sqlx::query(
        r#"
        SELECT p.id, p.name, p.description, p.created_at, p.updated_at,
               u.username, u.full_name, u.avatar_url,
               COUNT(v.id) AS total_videos,
               COALESCE(SUM(v.views), 0)::BIGINT AS total_views
        FROM playlists p
        JOIN users u ON u.id = p.owner_id
        JOIN playlist_videos pv ON pv.playlist_id = p.id
        JOIN videos v ON v.id = pv.video_id AND v.is_published
        WHERE p.id = $1
        GROUP BY p.id, u.username, u.full_name, u.avatar_url
        "#,
    )
    .bind(playlist_id)
    .fetch_optional(pool)
    .await?;

    let Some(header) = header else {
        return Ok(None);
    };

    let videos = sqlx::query(
        r#"
        SELECT v.id, v.title, v.description, v.video_url, v.thumbnail_url,
               v.duration, v.views, v.created_at
        FROM playlist_videos pv
        JOIN videos v ON v.id = pv.video_id AND v.is_published
        WHERE pv.playlist_id = $1
        ORDER BY pv.position
        "#,
    )
    .bind(playlist_id)
    .fetch_all(pool)
    .await?;

    let videos = videos
        .into_iter()
        .map(|row| VideoSummary {
            id: row.get("id"),
            title: row.get("title"),
            description: row.get("description"),
            video_url: row.get("video_url"),
            thumbnail_url: row.get("thumbnail_url"),
            duration: row.get("duration"),
            views: row.get("views"),
            created_at: row.get("created_at"),
        })
        .collect();

    Ok(Some(PlaylistDetail {
        id: header.get("id"),
        name: header.get("name"),
        description: header.get("description"),
        owner: OwnerInfo {
            username: header.get("username"),
            full_name: header.get("full_name"),
            avatar_url: header.get("avatar_url"),
        },
        total_videos: header.get("total_videos"),
        total_views: header.get("total_views"),
        videos,
        created_at: header.get("created_at"),
        updated_at: header.get("updated_at"),
    }))
}

/// Per-user playlists with totals derived over published member videos
pub async fn user_playlists(
    pool: &PgPool,
    owner_id: Uuid,
) -> Result<Vec<PlaylistSummary>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT p.id, p.name, p.description, p.created_at, p.updated_at,
               COUNT(v.id) AS total_videos,
               COALESCE(SUM(v.views), 0)::BIGINT AS total_views
        FROM playlists p
        LEFT JOIN playlist_videos pv ON pv.playlist_id = p.id
        LEFT JOIN videos v ON v.id = pv.video_id AND v.is_published
        WHERE p.owner_id = $1
        GROUP BY p.id
        ORDER BY p.created_at DESC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| PlaylistSummary {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
            total_videos: row.get("total_videos"),
            total_views: row.get("total_views"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
        .collect())
}
