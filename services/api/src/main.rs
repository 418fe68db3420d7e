use anyhow::Result;
use tracing::info;

mod error;
mod middleware;
mod models;
mod repositories;
mod routes;
mod state;

use common::{
    cache::{RedisConfig, RedisPool},
    database::{self, DatabaseConfig},
    settings::{ClubSettings, ServerSettings},
    token::TokenVerifier,
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    common::telemetry::init("API service");

    let settings = ServerSettings::load("API", 3001)?;
    let club = ClubSettings::load()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    if !database::health_check(&pool).await? {
        anyhow::bail!("Failed to connect to database");
    }

    database::run_migrations(&pool).await?;

    let redis_pool = RedisPool::new(&RedisConfig::from_env()?)?;
    let token_verifier = TokenVerifier::from_env()?;

    let app = routes::create_router(AppState::new(pool, redis_pool, token_verifier, club))
        .layer(middleware::cors_layer(&settings.cors_origin))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(settings.bind_address()).await?;
    info!("API service listening on {}", settings.bind_address());

    axum::serve(listener, app).await?;

    Ok(())
}
