/// VidTube service - main entry point.
use actix_cors::Cors;
use actix_multipart::form::MultipartFormConfig;
use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use vidtube_service::{config::Config, error::AppError, routes, security, services::Storage};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = Config::from_env();

    tracing::info!(
        "Starting VidTube service on {}:{}",
        config.app.host,
        config.app.port
    );

    // Initialize database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Database connection pool initialized");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations applied");

    // Initialize JWT signing keys
    security::jwt::initialize(
        &config.jwt.secret,
        config.jwt.access_token_ttl,
        config.jwt.refresh_token_ttl,
    )
    .expect("Failed to initialize JWT keys");

    tracing::info!("JWT keys initialized");

    // Initialize the asset-host client
    let storage = Storage::new(&config.storage)
        .await
        .expect("Failed to initialize storage client");

    tracing::info!("Asset-host client initialized");

    let host = config.app.host.clone();
    let port = config.app.port;

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(storage.clone()))
            // Video uploads stream to temp files, so the total limit can sit
            // well above the in-memory limit.
            .app_data(
                MultipartFormConfig::default()
                    .total_limit(512 * 1024 * 1024)
                    .memory_limit(10 * 1024 * 1024),
            )
            // Malformed bodies, paths and queries get the standard envelope.
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                AppError::Validation(err.to_string()).into()
            }))
            .app_data(web::PathConfig::default().error_handler(|err, _req| {
                AppError::Validation(err.to_string()).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                AppError::Validation(err.to_string()).into()
            }))
            .configure(routes::configure_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
