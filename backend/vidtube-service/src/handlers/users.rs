/// Profile, channel-profile and watch-history endpoints.
use actix_multipart::form::{tempfile::TempFile, MultipartForm};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::{ApiEnvelope, UserPublic};
use crate::services::Storage;

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAccountRequest {
    pub full_name: String,
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, MultipartForm)]
pub struct ImageForm {
    #[multipart(limit = "5MiB")]
    pub image: Option<TempFile>,
}

/// GET /api/v1/users/current-user
pub async fn current_user(pool: web::Data<PgPool>, user: UserId) -> Result<HttpResponse> {
    let user = user_repo::find_by_id(pool.get_ref(), user.0)
        .await?
        .ok_or_else(|| AppError::NotFound("User does not exist".to_string()))?;

    Ok(ApiEnvelope::ok(
        UserPublic::from(user),
        "Current user fetched successfully",
    ))
}

/// PATCH /api/v1/users/update-account
pub async fn update_account(
    pool: web::Data<PgPool>,
    user: UserId,
    req: web::Json<UpdateAccountRequest>,
) -> Result<HttpResponse> {
    if req.full_name.trim().is_empty() || req.email.trim().is_empty() {
        return Err(AppError::Validation("All fields are required".to_string()));
    }
    req.validate()?;

    let updated = user_repo::update_account(pool.get_ref(), user.0, req.full_name.trim(), req.email.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("User does not exist".to_string()))?;

    Ok(ApiEnvelope::ok(
        UserPublic::from(updated),
        "Account details updated successfully",
    ))
}

async fn upload_image(storage: &Storage, form: &ImageForm, prefix: &str) -> Result<String> {
    let file = form
        .image
        .as_ref()
        .filter(|file| file.size > 0)
        .ok_or_else(|| AppError::Validation("Image file is missing".to_string()))?;

    storage
        .upload_file(
            file.file.path(),
            prefix,
            file.file_name.as_deref(),
            file.content_type.as_ref().map(|m| m.essence_str()),
        )
        .await
}

/// PATCH /api/v1/users/avatar
pub async fn update_avatar(
    pool: web::Data<PgPool>,
    storage: web::Data<Storage>,
    user: UserId,
    form: MultipartForm<ImageForm>,
) -> Result<HttpResponse> {
    let avatar_url = upload_image(&storage, &form, "avatars").await?;

    let updated = user_repo::update_avatar(pool.get_ref(), user.0, &avatar_url)
        .await?
        .ok_or_else(|| AppError::NotFound("User does not exist".to_string()))?;

    Ok(ApiEnvelope::ok(
        UserPublic::from(updated),
        "Avatar image updated successfully",
    ))
}

/// PATCH /api/v1/users/cover-image
pub async fn update_cover_image(
    pool: web::Data<PgPool>,
    storage: web::Data<Storage>,
    user: UserId,
    form: MultipartForm<ImageForm>,
) -> Result<HttpResponse> {
    let cover_url = upload_image(&storage, &form, "covers").await?;

    let updated = user_repo::update_cover(pool.get_ref(), user.0, &cover_url)
        .await?
        .ok_or_else(|| AppError::NotFound("User does not exist".to_string()))?;

    Ok(ApiEnvelope::ok(
        UserPublic::from(updated),
        "Cover image updated successfully",
    ))
}

/// GET /api/v1/users/c/{username}
pub async fn channel_profile(
    pool: web::Data<PgPool>,
    user: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let username = path.into_inner();
    if username.trim().is_empty() {
        return Err(AppError::Validation("Username is required".to_string()));
    }

    let profile = user_repo::channel_profile(pool.get_ref(), username.trim(), user.0)
        .await?
        .ok_or_else(|| AppError::NotFound("Channel does not exist".to_string()))?;

    Ok(ApiEnvelope::ok(profile, "Channel profile fetched successfully"))
}

/// GET /api/v1/users/history
pub async fn watch_history(pool: web::Data<PgPool>, user: UserId) -> Result<HttpResponse> {
    let history = user_repo::watch_history(pool.get_ref(), user.0).await?;

    Ok(ApiEnvelope::ok(history, "Watch history fetched successfully"))
}
