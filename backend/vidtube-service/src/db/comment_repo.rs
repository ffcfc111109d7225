/// Comment repository - rows plus the paginated comment feed read model.
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::views::{CommentView, OwnerInfo};
use crate::models::Comment;

const COMMENT_COLUMNS: &str = "id, video_id, owner_id, content, created_at, updated_at";

/// Create a new comment on a video
pub async fn create_comment(
    pool: &PgPool,
    video_id: Uuid,
    owner_id: Uuid,
    content: &str,
) -> Result<Comment, sqlx::Error> {
    sqlx::query_as::<_, Comment>(&format!(
        r#"
        INSERT INTO comments (video_id, owner_id, content)
        VALUES ($1, $2, $3)
        RETURNING {COMMENT_COLUMNS}
        "#
    ))
    .bind(video_id)
    .bind(owner_id)
    .bind(content)
    .fetch_one(pool)
    .await
}

/// Get a single comment by ID
pub async fn find_by_id(pool: &PgPool, comment_id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(&format!(
        r#"
        SELECT {COMMENT_COLUMNS}
        FROM comments
        WHERE id = $1
        "#
    ))
    .bind(comment_id)
    .fetch_optional(pool)
    .await
}

/// Update comment content
pub async fn update_comment(
    pool: &PgPool,
    comment_id: Uuid,
    content: &str,
) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(&format!(
        r#"
        UPDATE comments
        SET content = $1, updated_at = NOW()
        WHERE id = $2
        RETURNING {COMMENT_COLUMNS}
        "#
    ))
    .bind(content)
    .bind(comment_id)
    .fetch_optional(pool)
    .await
}

/// Delete a comment together with every like row that targets it
pub async fn delete_comment(pool: &PgPool, comment_id: Uuid) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM likes WHERE target_kind = 'comment' AND target_id = $1")
        .bind(comment_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await
}

/// Comment-feed read model for a video: owner profile fields, like count
/// from joined-set cardinality, the viewer's like flag, newest-first,
/// LIMIT/OFFSET window.
pub async fn video_comments(
    pool: &PgPool,
    video_id: Uuid,
    viewer_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<CommentView>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT c.id, c.content, c.created_at,
               u.username, u.full_name, u.avatar_url,
               COUNT(l.id) AS likes_count,
               COALESCE(BOOL_OR(l.liked_by = $2), FALSE) AS is_liked
        FROM comments c
        JOIN users u ON u.id = c.owner_id
        LEFT JOIN likes l ON l.target_kind = 'comment' AND l.target_id = c.id
        WHERE c.video_id = $1
        GROUP BY c.id, u.username, u.full_name, u.avatar_url
        ORDER BY c.created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(video_id)
    .bind(viewer_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| CommentView {
            id: row.get("id"),
            content: row.get("content"),
            created_at: row.get("created_at"),
            owner: OwnerInfo {
                username: row.get("username"),
                full_name: row.get("full_name"),
                avatar_url: row.get("avatar_url"),
            },
            likes_count: row.get("likes_count"),
            is_liked: row.get("is_liked"),
        })
        .collect())
}

/// Count comments for a video
pub async fn count_video_comments(pool: &PgPool, video_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE video_id = $1")
        .bind(video_id)
        .fetch_one(pool)
        .await
}
