//! Denormalized read models.
//!
//! Each struct here is the projected output of one aggregation query in the
//! db layer: filter, join, derived fields, sort, project, and (where noted)
//! pagination. Counts are always computed from joined-set cardinality.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Owner profile fields exposed on joined read models.
#[derive(Debug, Clone, Serialize)]
pub struct OwnerInfo {
    pub username: String,
    pub full_name: String,
    pub avatar_url: String,
}

/// Trimmed owner shape used on tweet feeds.
#[derive(Debug, Clone, Serialize)]
pub struct OwnerBrief {
    pub username: String,
    pub avatar_url: String,
}

#[derive(Debug, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub owner: OwnerInfo,
    pub likes_count: i64,
    pub is_liked: bool,
}

/// Paginated comment feed for a video.
#[derive(Debug, Serialize)]
pub struct CommentPage {
    pub comments: Vec<CommentView>,
    pub total_count: i64,
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Serialize)]
pub struct TweetView {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub owner: OwnerBrief,
    pub likes_count: i64,
    pub is_liked: bool,
}

/// Channel profile resolved by username, with viewer-relative flags.
#[derive(Debug, Serialize)]
pub struct ChannelProfile {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub avatar_url: String,
    pub cover_url: Option<String>,
    pub subscribers_count: i64,
    pub channels_subscribed_to_count: i64,
    pub is_subscribed: bool,
}

/// A video joined with its owner's profile fields (watch history, liked
/// videos, public catalog listing).
#[derive(Debug, Serialize)]
pub struct VideoWithOwner {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration: f64,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub owner: OwnerInfo,
}

#[derive(Debug, Serialize)]
pub struct VideoPage {
    pub videos: Vec<VideoWithOwner>,
    pub total_count: i64,
    pub page: i64,
    pub limit: i64,
}

/// Channel owner block on a single-video view.
#[derive(Debug, Serialize)]
pub struct VideoOwner {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub avatar_url: String,
    pub subscribers_count: i64,
    pub is_subscribed: bool,
}

/// Full single-video read model.
#[derive(Debug, Serialize)]
pub struct VideoDetail {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub owner: VideoOwner,
    pub likes_count: i64,
    pub is_liked: bool,
}

/// Dashboard listing entry for the channel owner.
#[derive(Debug, Serialize)]
pub struct ChannelVideo {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub likes_count: i64,
}

#[derive(Debug, Serialize)]
pub struct ChannelStats {
    pub total_subscribers: i64,
    pub total_videos: i64,
    pub total_views: i64,
    pub total_likes: i64,
}

/// One entry of a channel's subscriber list.
#[derive(Debug, Serialize)]
pub struct SubscriberView {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub avatar_url: String,
    /// Whether the channel follows this subscriber back.
    pub subscribed_to_subscriber: bool,
    pub subscribers_count: i64,
}

/// Video fields without owner, for nested spots (latest video, playlist
/// members).
#[derive(Debug, Serialize)]
pub struct VideoSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration: f64,
    pub views: i64,
    pub created_at: DateTime<Utc>,
}

/// One entry of a user's subscribed-channels list.
#[derive(Debug, Serialize)]
pub struct SubscribedChannelView {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub avatar_url: String,
    pub latest_video: Option<VideoSummary>,
}

#[derive(Debug, Serialize)]
pub struct PlaylistSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub total_videos: i64,
    pub total_views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Playlist with its published member videos resolved.
#[derive(Debug, Serialize)]
pub struct PlaylistDetail {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub owner: OwnerInfo,
    pub total_videos: i64,
    pub total_views: i64,
    pub videos: Vec<VideoSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
