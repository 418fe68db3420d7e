use anyhow::Result;
use tracing::info;

mod error;
mod jwt;
mod middleware;
mod models;
mod rate_limiter;
mod repositories;
mod routes;
mod session;

use common::{
    cache::{RedisConfig, RedisPool},
    database::{self, DatabaseConfig},
    settings::ServerSettings,
};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use crate::{
    jwt::{JwtConfig, JwtService},
    rate_limiter::{RateLimiter, RateLimiterConfig},
    repositories::UserRepository,
    session::SessionManager,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub redis_pool: RedisPool,
    pub jwt_service: JwtService,
    pub user_repository: UserRepository,
    pub sessions: SessionManager,
    pub rate_limiter: RateLimiter,
}

#[tokio::main]
async fn main() -> Result<()> {
    common::telemetry::init("authentication service");

    let settings = ServerSettings::load("AUTH", 3000)?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    if !database::health_check(&pool).await? {
        anyhow::bail!("Failed to connect to database");
    }

    database::run_migrations(&pool).await?;

    let user_repository = UserRepository::new(pool.clone());

    // Seed the admin account when credentials are configured
    if let (Ok(email), Ok(password)) = (
        std::env::var("ADMIN_EMAIL"),
        std::env::var("ADMIN_PASSWORD"),
    ) {
        let admin = user_repository
            .ensure_admin(&crate::models::user::normalize_email(&email), &password)
            .await?;
        info!("Admin account ready: {}", admin.email);
    }

    let jwt_service = JwtService::new(JwtConfig::from_env()?)?;

    let redis_pool = RedisPool::new(&RedisConfig::from_env()?)?;
    let sessions = SessionManager::new(redis_pool.clone(), jwt_service.refresh_token_expiry());

    let app_state = AppState {
        db_pool: pool,
        redis_pool,
        jwt_service,
        user_repository,
        sessions,
        rate_limiter: RateLimiter::new(RateLimiterConfig::default()),
    };

    let app = routes::create_router(app_state)
        .layer(middleware::cors_layer(&settings.cors_origin))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(settings.bind_address()).await?;
    info!("Authentication service listening on {}", settings.bind_address());

    axum::serve(listener, app).await?;

    Ok(())
}
