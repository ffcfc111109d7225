/// Comment endpoints: the paginated feed plus ownership-checked mutations.
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::db::{comment_repo, video_repo};
use crate::error::{AppError, Result};
use crate::handlers::Page;
use crate::middleware::UserId;
use crate::models::views::CommentPage;
use crate::models::ApiEnvelope;

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    pub content: String,
}

/// GET /api/v1/comments/{videoId}
pub async fn get_video_comments(
    pool: web::Data<PgPool>,
    user: UserId,
    path: web::Path<Uuid>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse> {
    let video_id = path.into_inner();

    video_repo::find_by_id(pool.get_ref(), video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    let page = Page::from_query(&query);
    let comments =
        comment_repo::video_comments(pool.get_ref(), video_id, user.0, page.limit, page.offset())
            .await?;
    let total_count = comment_repo::count_video_comments(pool.get_ref(), video_id).await?;

    Ok(ApiEnvelope::ok(
        CommentPage {
            comments,
            total_count,
            page: page.page,
            limit: page.limit,
        },
        "Comments fetched successfully",
    ))
}

/// POST /api/v1/comments/{videoId}
pub async fn add_comment(
    pool: web::Data<PgPool>,
    user: UserId,
    path: web::Path<Uuid>,
    req: web::Json<CommentBody>,
) -> Result<HttpResponse> {
    if req.content.trim().is_empty() {
        return Err(AppError::Validation("Content is required".to_string()));
    }

    let video_id = path.into_inner();
    video_repo::find_by_id(pool.get_ref(), video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    let comment =
        comment_repo::create_comment(pool.get_ref(), video_id, user.0, req.content.trim()).await?;

    Ok(ApiEnvelope::created(comment, "Comment has been added successfully"))
}

/// PATCH /api/v1/comments/c/{commentId}
pub async fn update_comment(
    pool: web::Data<PgPool>,
    user: UserId,
    path: web::Path<Uuid>,
    req: web::Json<CommentBody>,
) -> Result<HttpResponse> {
    if req.content.trim().is_empty() {
        return Err(AppError::Validation("Content is required".to_string()));
    }

    let comment_id = path.into_inner();
    let comment = comment_repo::find_by_id(pool.get_ref(), comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    if comment.owner_id != user.0 {
        return Err(AppError::Authorization(
            "Only the owner can edit their comment".to_string(),
        ));
    }

    let updated = comment_repo::update_comment(pool.get_ref(), comment_id, req.content.trim())
        .await?
        .ok_or_else(|| AppError::Internal("Comment could not be updated".to_string()))?;

    Ok(ApiEnvelope::ok(updated, "Comment updated successfully"))
}

/// DELETE /api/v1/comments/c/{commentId}
///
/// Removes the comment and every like row that targets it.
pub async fn delete_comment(
    pool: web::Data<PgPool>,
    user: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comment_id = path.into_inner();
    let comment = comment_repo::find_by_id(pool.get_ref(), comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    if comment.owner_id != user.0 {
        return Err(AppError::Authorization(
            "Only the owner can delete their comment".to_string(),
        ));
    }

    comment_repo::delete_comment(pool.get_ref(), comment_id).await?;

    Ok(ApiEnvelope::ok(
        serde_json::json!({ "comment_id": comment_id }),
        "Comment deleted successfully",
    ))
}
