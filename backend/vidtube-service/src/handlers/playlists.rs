/// Playlist endpoints. Membership mutation requires playlist ownership;
/// video ownership is irrelevant to curating a playlist.
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{playlist_repo, user_repo, video_repo};
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::{ApiEnvelope, Playlist};

#[derive(Debug, Deserialize)]
pub struct PlaylistBody {
    pub name: String,
    pub description: String,
}

async fn owned_playlist(pool: &PgPool, playlist_id: Uuid, user_id: Uuid) -> Result<Playlist> {
    let playlist = playlist_repo::find_by_id(pool, playlist_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;

    if playlist.owner_id != user_id {
        return Err(AppError::Authorization(
            "Only the owner can modify their playlist".to_string(),
        ));
    }

    Ok(playlist)
}

/// POST /api/v1/playlist
pub async fn create_playlist(
    pool: web::Data<PgPool>,
    user: UserId,
    req: web::Json<PlaylistBody>,
) -> Result<HttpResponse> {
    if req.name.trim().is_empty() || req.description.trim().is_empty() {
        return Err(AppError::Validation(
            "Name and description are required".to_string(),
        ));
    }

    let playlist = playlist_repo::create_playlist(
        pool.get_ref(),
        user.0,
        req.name.trim(),
        req.description.trim(),
    )
    .await?;

    Ok(ApiEnvelope::created(playlist, "Playlist created successfully"))
}

/// GET /api/v1/playlist/user/{userId}
pub async fn get_user_playlists(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let owner_id = path.into_inner();

    if !user_repo::exists(pool.get_ref(), owner_id).await? {
        return Err(AppError::NotFound("User does not exist".to_string()));
    }

    let playlists = playlist_repo::user_playlists(pool.get_ref(), owner_id).await?;

    Ok(ApiEnvelope::ok(playlists, "User playlists fetched successfully"))
}

/// GET /api/v1/playlist/{playlistId}
///
/// Resolves only published member videos; a playlist whose videos are all
/// unpublished reads as missing.
pub async fn get_playlist_by_id(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let playlist_id = path.into_inner();

    let detail = playlist_repo::playlist_detail(pool.get_ref(), playlist_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;

    Ok(ApiEnvelope::ok(detail, "Playlist fetched successfully"))
}

/// PATCH /api/v1/playlist/add/{videoId}/{playlistId}
pub async fn add_video_to_playlist(
    pool: web::Data<PgPool>,
    user: UserId,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (video_id, playlist_id) = path.into_inner();

    owned_playlist(pool.get_ref(), playlist_id, user.0).await?;

    video_repo::find_by_id(pool.get_ref(), video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    playlist_repo::add_video(pool.get_ref(), playlist_id, video_id).await?;

    Ok(ApiEnvelope::ok(
        serde_json::json!({ "playlist_id": playlist_id, "video_id": video_id }),
        "Video added to playlist",
    ))
}

/// PATCH /api/v1/playlist/remove/{videoId}/{playlistId}
pub async fn remove_video_from_playlist(
    pool: web::Data<PgPool>,
    user: UserId,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (video_id, playlist_id) = path.into_inner();

    owned_playlist(pool.get_ref(), playlist_id, user.0).await?;

    playlist_repo::remove_video(pool.get_ref(), playlist_id, video_id).await?;

    Ok(ApiEnvelope::ok(
        serde_json::json!({ "playlist_id": playlist_id, "video_id": video_id }),
        "Video removed from playlist",
    ))
}

/// PATCH /api/v1/playlist/{playlistId}
pub async fn update_playlist(
    pool: web::Data<PgPool>,
    user: UserId,
    path: web::Path<Uuid>,
    req: web::Json<PlaylistBody>,
) -> Result<HttpResponse> {
    if req.name.trim().is_empty() || req.description.trim().is_empty() {
        return Err(AppError::Validation(
            "Name and description are required".to_string(),
        ));
    }

    let playlist_id = path.into_inner();
    owned_playlist(pool.get_ref(), playlist_id, user.0).await?;

    let updated = playlist_repo::update_playlist(
        pool.get_ref(),
        playlist_id,
        req.name.trim(),
        req.description.trim(),
    )
    .await?
    .ok_or_else(|| AppError::Internal("Playlist could not be updated".to_string()))?;

    Ok(ApiEnvelope::ok(updated, "Playlist updated successfully"))
}

/// DELETE /api/v1/playlist/{playlistId}
pub async fn delete_playlist(
    pool: web::Data<PgPool>,
    user: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let playlist_id = path.into_inner();
    owned_playlist(pool.get_ref(), playlist_id, user.0).await?;

    playlist_repo::delete_playlist(pool.get_ref(), playlist_id).await?;

    Ok(ApiEnvelope::ok(
        serde_json::json!({ "playlist_id": playlist_id }),
        "Playlist deleted successfully",
    ))
}
