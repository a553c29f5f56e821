//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; application-level errors flow
//! through the per-crate error types down to `kernel::error::AppError`.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use auth::{AuthConfig, AuthMiddlewareState, PgAuthRepository, auth_router, require_auth};
use axum::{
    Json, Router, http,
    http::{Method, header},
    middleware,
    routing::get,
};
use marketplace::{
    PgMarketRepository, RouterPair, blogs_router, books_router, mentors_router, pyqs_router,
};
use platform::upload::UploadStore;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,marketplace=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: drop expired bearer sessions.
    // Errors here should not prevent server startup.
    let auth_repo = PgAuthRepository::new(pool.clone());
    match auth_repo.cleanup_expired().await {
        Ok(sessions) => {
            tracing::info!(sessions_deleted = sessions, "Auth session cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Auth session cleanup failed, continuing anyway");
        }
    }

    let auth_config = AuthConfig::from_env();

    // Upload storage (served back under /uploads)
    let upload_root = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());
    let uploads = Arc::new(UploadStore::new(&upload_root));

    // Bearer-token middleware shared by every protected route
    let mw_state = AuthMiddlewareState::new(Arc::new(auth_repo.clone()));
    let auth_layer = middleware::from_fn_with_state(mw_state, require_auth::<PgAuthRepository>);

    let market_repo = PgMarketRepository::new(pool.clone());

    let mount = |pair: RouterPair| {
        pair.public
            .merge(pair.protected.route_layer(auth_layer.clone()))
    };

    let books = mount(books_router(market_repo.clone(), uploads.clone()));
    let mentors = mount(mentors_router(market_repo.clone()));
    let pyqs = mount(pyqs_router(market_repo.clone(), uploads.clone()));
    let blogs = mount(blogs_router(market_repo, uploads.clone()));

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .route("/api/health", get(health))
        .nest("/api/auth", auth_router(auth_repo, auth_config))
        .nest("/api/books", books)
        .nest("/api/mentors", mentors)
        .nest("/api/pyqs", pyqs)
        .nest("/api/blogs", blogs)
        .nest_service("/uploads", ServeDir::new(&upload_root))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
