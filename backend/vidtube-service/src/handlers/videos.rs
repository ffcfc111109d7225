/// Video catalog endpoints: publish, fetch (with view/history side effects),
/// listing, and ownership-checked mutations.
use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::db::{user_repo, video_repo};
use crate::error::{AppError, Result};
use crate::handlers::Page;
use crate::middleware::UserId;
use crate::models::views::VideoPage;
use crate::models::ApiEnvelope;

#[derive(Debug, MultipartForm)]
pub struct PublishVideoForm {
    pub title: Option<Text<String>>,
    pub description: Option<Text<String>>,
    /// Seconds, probed client-side; the asset host stores bytes only.
    pub duration: Option<Text<String>>,
    #[multipart(limit = "512MiB")]
    pub video_file: Option<TempFile>,
    #[multipart(limit = "5MiB")]
    pub thumbnail: Option<TempFile>,
}

#[derive(Debug, MultipartForm)]
pub struct UpdateVideoForm {
    pub title: Option<Text<String>>,
    pub description: Option<Text<String>>,
    #[multipart(limit = "5MiB")]
    pub thumbnail: Option<TempFile>,
}

fn required_text(field: &Option<Text<String>>, name: &str) -> Result<String> {
    match field {
        Some(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        _ => Err(AppError::Validation(format!("{} is required", name))),
    }
}

fn required_file<'a>(file: &'a Option<TempFile>, name: &str) -> Result<&'a TempFile> {
    file.as_ref()
        .filter(|f| f.size > 0)
        .ok_or_else(|| AppError::Validation(format!("{} file is required", name)))
}

async fn upload(
    storage: &crate::services::Storage,
    file: &TempFile,
    prefix: &str,
) -> Result<String> {
    storage
        .upload_file(
            file.file.path(),
            prefix,
            file.file_name.as_deref(),
            file.content_type.as_ref().map(|m| m.essence_str()),
        )
        .await
}

/// POST /api/v1/videos
pub async fn publish_video(
    pool: web::Data<PgPool>,
    storage: web::Data<crate::services::Storage>,
    user: UserId,
    form: MultipartForm<PublishVideoForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();

    let title = required_text(&form.title, "Title")?;
    let description = required_text(&form.description, "Description")?;
    let duration: f64 = required_text(&form.duration, "Duration")?
        .parse()
        .map_err(|_| AppError::Validation("Duration must be a number".to_string()))?;
    if duration <= 0.0 {
        return Err(AppError::Validation("Duration must be positive".to_string()));
    }

    let video_file = required_file(&form.video_file, "Video")?;
    let thumbnail = required_file(&form.thumbnail, "Thumbnail")?;

    let video_url = upload(&storage, video_file, "videos").await?;
    let thumbnail_url = upload(&storage, thumbnail, "thumbnails").await?;

    let video = video_repo::create_video(
        pool.get_ref(),
        user.0,
        &title,
        &description,
        &video_url,
        &thumbnail_url,
        duration,
    )
    .await?;

    Ok(ApiEnvelope::created(video, "Video published successfully"))
}

/// GET /api/v1/videos/{videoId}
///
/// Fetching a video counts a view and lands it in the viewer's watch
/// history.
pub async fn get_video(
    pool: web::Data<PgPool>,
    user: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let video_id = path.into_inner();

    let detail = video_repo::video_detail(pool.get_ref(), video_id, user.0)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    if !detail.is_published && detail.owner.id != user.0 {
        return Err(AppError::NotFound("Video not found".to_string()));
    }

    video_repo::increment_views(pool.get_ref(), video_id).await?;
    user_repo::record_watch(pool.get_ref(), user.0, video_id).await?;

    Ok(ApiEnvelope::ok(detail, "Video fetched successfully"))
}

/// GET /api/v1/videos
///
/// Published catalog with optional `user_id` and `query` filters.
pub async fn get_all_videos(
    pool: web::Data<PgPool>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse> {
    let owner_id = query
        .get("user_id")
        .and_then(|id| Uuid::parse_str(id).ok());
    let title_query = query.get("query").map(String::as_str).filter(|q| !q.is_empty());

    let page = Page::from_query(&query);
    let videos = video_repo::list_published(
        pool.get_ref(),
        owner_id,
        title_query,
        page.limit,
        page.offset(),
    )
    .await?;
    let total_count = video_repo::count_published(pool.get_ref(), owner_id, title_query).await?;

    Ok(ApiEnvelope::ok(
        VideoPage {
            videos,
            total_count,
            page: page.page,
            limit: page.limit,
        },
        "Videos fetched successfully",
    ))
}

/// PATCH /api/v1/videos/{videoId}
pub async fn update_video(
    pool: web::Data<PgPool>,
    storage: web::Data<crate::services::Storage>,
    user: UserId,
    path: web::Path<Uuid>,
    form: MultipartForm<UpdateVideoForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();

    let title = required_text(&form.title, "Title")?;
    let description = required_text(&form.description, "Description")?;

    let video_id = path.into_inner();
    let video = video_repo::find_by_id(pool.get_ref(), video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    if video.owner_id != user.0 {
        return Err(AppError::Authorization(
            "Only the owner can edit their video".to_string(),
        ));
    }

    let thumbnail_url = match form.thumbnail.as_ref().filter(|f| f.size > 0) {
        Some(thumbnail) => Some(upload(&storage, thumbnail, "thumbnails").await?),
        None => None,
    };

    let updated = video_repo::update_video(
        pool.get_ref(),
        video_id,
        &title,
        &description,
        thumbnail_url.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::Internal("Video could not be updated".to_string()))?;

    Ok(ApiEnvelope::ok(updated, "Video updated successfully"))
}

/// DELETE /api/v1/videos/{videoId}
pub async fn delete_video(
    pool: web::Data<PgPool>,
    user: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let video_id = path.into_inner();
    let video = video_repo::find_by_id(pool.get_ref(), video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    if video.owner_id != user.0 {
        return Err(AppError::Authorization(
            "Only the owner can delete their video".to_string(),
        ));
    }

    video_repo::delete_video(pool.get_ref(), video_id).await?;

    Ok(ApiEnvelope::ok(
        serde_json::json!({ "video_id": video_id }),
        "Video deleted successfully",
    ))
}

/// PATCH /api/v1/videos/toggle/publish/{videoId}
pub async fn toggle_publish_status(
    pool: web::Data<PgPool>,
    user: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let video_id = path.into_inner();
    let video = video_repo::find_by_id(pool.get_ref(), video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    if video.owner_id != user.0 {
        return Err(AppError::Authorization(
            "Only the owner can change publish status".to_string(),
        ));
    }

    let updated = video_repo::toggle_publish(pool.get_ref(), video_id)
        .await?
        .ok_or_else(|| AppError::Internal("Video could not be updated".to_string()))?;

    Ok(ApiEnvelope::ok(updated, "Publish status toggled successfully"))
}
