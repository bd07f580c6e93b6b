use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod error;
mod jwt;
mod middleware;
mod models;
mod oauth;
mod password;
mod repositories;
mod routes;
mod validation;

use sqlx::PgPool;

use crate::{
    jwt::JwtService,
    oauth::OAuthVerifier,
    repositories::{SpiceRepository, UserRepository},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_service: JwtService,
    pub oauth_verifier: OAuthVerifier,
    pub user_repository: UserRepository,
    pub spice_repository: SpiceRepository,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting storefront service");

    // Initialize database connection pool
    let db_config = common::database::DatabaseConfig::from_env()?;
    let pool = common::database::init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Initialize JWT service
    let jwt_config = jwt::JwtConfig::from_env()?;
    let jwt_service = JwtService::new(jwt_config);

    let user_repository = UserRepository::new(pool.clone());
    let spice_repository = SpiceRepository::new(pool.clone());

    let app_state = AppState {
        db_pool: pool,
        jwt_service,
        oauth_verifier: OAuthVerifier::new(),
        user_repository,
        spice_repository,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "5001".to_string())
        .parse()
        .unwrap_or(5001);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Storefront service listening on 0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
