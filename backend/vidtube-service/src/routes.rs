//! Route configuration
//!
//! Centralized route setup; each domain manages its own routes.

use crate::handlers;
use crate::middleware::JwtAuthMiddleware;
use actix_web::web;

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/healthcheck", web::get().to(handlers::health::liveness_check))
            .route(
                "/healthcheck/ready",
                web::get().to(handlers::health::readiness_check),
            )
            // Modular route configuration
            .configure(routes::users::configure)
            .configure(routes::videos::configure)
            .configure(routes::comments::configure)
            .configure(routes::likes::configure)
            .configure(routes::tweets::configure)
            .configure(routes::subscriptions::configure)
            .configure(routes::playlist::configure)
            .configure(routes::dashboard::configure),
    );
}

// Sub-modules for each domain
mod routes {
    use super::*;

    pub mod users {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/users")
                    .route("/register", web::post().to(handlers::auth::register))
                    .route("/login", web::post().to(handlers::auth::login))
                    .route("/refresh-token", web::post().to(handlers::auth::refresh_token))
                    .service(
                        web::scope("")
                            .wrap(JwtAuthMiddleware)
                            .route("/logout", web::post().to(handlers::auth::logout))
                            .route(
                                "/change-password",
                                web::post().to(handlers::auth::change_password),
                            )
                            .route("/current-user", web::get().to(handlers::users::current_user))
                            .route(
                                "/update-account",
                                web::patch().to(handlers::users::update_account),
                            )
                            .route("/avatar", web::patch().to(handlers::users::update_avatar))
                            .route(
                                "/cover-image",
                                web::patch().to(handlers::users::update_cover_image),
                            )
                            .route("/c/{username}", web::get().to(handlers::users::channel_profile))
                            .route("/history", web::get().to(handlers::users::watch_history)),
                    ),
            );
        }
    }

    pub mod videos {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/videos")
                    .wrap(JwtAuthMiddleware)
                    .route("", web::get().to(handlers::videos::get_all_videos))
                    .route("", web::post().to(handlers::videos::publish_video))
                    .route(
                        "/toggle/publish/{videoId}",
                        web::patch().to(handlers::videos::toggle_publish_status),
                    )
                    .route("/{videoId}", web::get().to(handlers::videos::get_video))
                    .route("/{videoId}", web::patch().to(handlers::videos::update_video))
                    .route("/{videoId}", web::delete().to(handlers::videos::delete_video)),
            );
        }
    }

    pub mod comments {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/comments")
                    .wrap(JwtAuthMiddleware)
                    .route(
                        "/c/{commentId}",
                        web::patch().to(handlers::comments::update_comment),
                    )
                    .route(
                        "/c/{commentId}",
                        web::delete().to(handlers::comments::delete_comment),
                    )
                    .route(
                        "/{videoId}",
                        web::get().to(handlers::comments::get_video_comments),
                    )
                    .route("/{videoId}", web::post().to(handlers::comments::add_comment)),
            );
        }
    }

    pub mod likes {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/likes")
                    .wrap(JwtAuthMiddleware)
                    .route(
                        "/toggle/v/{videoId}",
                        web::post().to(handlers::likes::toggle_video_like),
                    )
                    .route(
                        "/toggle/c/{commentId}",
                        web::post().to(handlers::likes::toggle_comment_like),
                    )
                    .route(
                        "/toggle/t/{tweetId}",
                        web::post().to(handlers::likes::toggle_tweet_like),
                    )
                    .route("/videos", web::get().to(handlers::likes::get_liked_videos)),
            );
        }
    }

    pub mod tweets {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/tweets")
                    .wrap(JwtAuthMiddleware)
                    .route("", web::post().to(handlers::tweets::create_tweet))
                    .route("/user/{userId}", web::get().to(handlers::tweets::get_user_tweets))
                    .route("/{tweetId}", web::patch().to(handlers::tweets::update_tweet))
                    .route("/{tweetId}", web::delete().to(handlers::tweets::delete_tweet)),
            );
        }
    }

    pub mod subscriptions {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/subscriptions")
                    .wrap(JwtAuthMiddleware)
                    .route(
                        "/c/{channelId}",
                        web::post().to(handlers::subscriptions::toggle_subscription),
                    )
                    .route(
                        "/c/{channelId}",
                        web::get().to(handlers::subscriptions::get_channel_subscribers),
                    )
                    .route(
                        "/u/{subscriberId}",
                        web::get().to(handlers::subscriptions::get_subscribed_channels),
                    ),
            );
        }
    }

    pub mod playlist {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/playlist")
                    .wrap(JwtAuthMiddleware)
                    .route("", web::post().to(handlers::playlists::create_playlist))
                    .route(
                        "/user/{userId}",
                        web::get().to(handlers::playlists::get_user_playlists),
                    )
                    .route(
                        "/add/{videoId}/{playlistId}",
                        web::patch().to(handlers::playlists::add_video_to_playlist),
                    )
                    .route(
                        "/remove/{videoId}/{playlistId}",
                        web::patch().to(handlers::playlists::remove_video_from_playlist),
                    )
                    .route(
                        "/{playlistId}",
                        web::get().to(handlers::playlists::get_playlist_by_id),
                    )
                    .route(
                        "/{playlistId}",
                        web::patch().to(handlers::playlists::update_playlist),
                    )
                    .route(
                        "/{playlistId}",
                        web::delete().to(handlers::playlists::delete_playlist),
                    ),
            );
        }
    }

    pub mod dashboard {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/dashboard")
                    .wrap(JwtAuthMiddleware)
                    .route("/stats", web::get().to(handlers::dashboard::get_channel_stats))
                    .route("/videos", web::get().to(handlers::dashboard::get_channel_videos)),
            );
        }
    }
}
