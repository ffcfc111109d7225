/// Registration, login and session lifecycle endpoints.
use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::ValidateEmail;

use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::{ApiEnvelope, UserPublic};
use crate::services::{AuthService, Storage};

#[derive(Debug, MultipartForm)]
pub struct RegisterForm {
    pub full_name: Option<Text<String>>,
    pub email: Option<Text<String>>,
    pub username: Option<Text<String>>,
    pub password: Option<Text<String>>,
    #[multipart(limit = "5MiB")]
    pub avatar: Option<TempFile>,
    #[multipart(limit = "5MiB")]
    pub cover_image: Option<TempFile>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginData {
    pub user: UserPublic,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

fn required_text(field: &Option<Text<String>>, name: &str) -> Result<String> {
    match field {
        Some(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        _ => Err(AppError::Validation(format!("{} is required", name))),
    }
}

async fn upload_image(storage: &Storage, file: &TempFile, prefix: &str) -> Result<String> {
    storage
        .upload_file(
            file.file.path(),
            prefix,
            file.file_name.as_deref(),
            file.content_type.as_ref().map(|m| m.essence_str()),
        )
        .await
}

/// POST /api/v1/users/register
pub async fn register(
    pool: web::Data<PgPool>,
    storage: web::Data<Storage>,
    form: MultipartForm<RegisterForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();

    let full_name = required_text(&form.full_name, "fullName")?;
    let email = required_text(&form.email, "email")?;
    let username = required_text(&form.username, "username")?;
    let password = required_text(&form.password, "password")?;

    if !email.validate_email() {
        return Err(AppError::Validation("A valid email is required".to_string()));
    }

    let avatar = form
        .avatar
        .as_ref()
        .filter(|file| file.size > 0)
        .ok_or_else(|| AppError::Validation("Avatar file is required".to_string()))?;

    // Upload assets before creating the row, so a failed upload never leaves
    // a half-registered user behind.
    let avatar_url = upload_image(&storage, avatar, "avatars").await?;

    let cover_url = match form.cover_image.as_ref().filter(|file| file.size > 0) {
        Some(cover) => Some(upload_image(&storage, cover, "covers").await?),
        None => None,
    };

    let service = AuthService::new(pool.get_ref().clone());
    let user = service
        .register(
            &username,
            &email,
            &full_name,
            &password,
            &avatar_url,
            cover_url.as_deref(),
        )
        .await?;

    Ok(ApiEnvelope::created(
        UserPublic::from(user),
        "User registered successfully",
    ))
}

/// POST /api/v1/users/login
pub async fn login(pool: web::Data<PgPool>, req: web::Json<LoginRequest>) -> Result<HttpResponse> {
    let identifier = req
        .username
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .or(req.email.as_deref().filter(|e| !e.trim().is_empty()))
        .ok_or_else(|| AppError::Validation("Username or email is required".to_string()))?;

    let service = AuthService::new(pool.get_ref().clone());
    let (user, tokens) = service.login(identifier.trim(), &req.password).await?;

    Ok(ApiEnvelope::ok(
        LoginData {
            user: UserPublic::from(user),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        },
        "User logged in successfully",
    ))
}

/// POST /api/v1/users/refresh-token
pub async fn refresh_token(
    pool: web::Data<PgPool>,
    req: web::Json<RefreshRequest>,
) -> Result<HttpResponse> {
    let incoming = req
        .refresh_token
        .as_deref()
        .ok_or_else(|| AppError::Authentication("Unauthorized request".to_string()))?;

    let service = AuthService::new(pool.get_ref().clone());
    let tokens = service.refresh(incoming).await?;

    Ok(ApiEnvelope::ok(
        serde_json::json!({
            "access_token": tokens.access_token,
            "refresh_token": tokens.refresh_token,
        }),
        "Access token refreshed",
    ))
}

/// POST /api/v1/users/logout
pub async fn logout(pool: web::Data<PgPool>, user: UserId) -> Result<HttpResponse> {
    let service = AuthService::new(pool.get_ref().clone());
    service.logout(user.0).await?;

    Ok(ApiEnvelope::ok(serde_json::json!({}), "User logged out"))
}

/// POST /api/v1/users/change-password
pub async fn change_password(
    pool: web::Data<PgPool>,
    user: UserId,
    req: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse> {
    if req.new_password.trim().is_empty() {
        return Err(AppError::Validation("New password is required".to_string()));
    }

    let service = AuthService::new(pool.get_ref().clone());
    service
        .change_password(user.0, &req.old_password, &req.new_password)
        .await?;

    Ok(ApiEnvelope::ok(
        serde_json::json!({}),
        "Password changed successfully",
    ))
}
