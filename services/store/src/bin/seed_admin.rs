//! Bootstrap an admin account
//!
//! Run once against a fresh database. Exits cleanly if the admin email is
//! already taken. Credentials come from `ADMIN_EMAIL` / `ADMIN_PASSWORD`;
//! the defaults are for local development only and must be rotated after
//! first login.

use anyhow::Result;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

const BCRYPT_COST: u32 = 10;

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let email =
        std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@spicestore.com".to_string());
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
    let name = std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Admin User".to_string());

    let db_config = common::database::DatabaseConfig::from_env()?;
    let pool = common::database::init_pool(&db_config).await?;

    let existing = sqlx::query("SELECT role FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&pool)
        .await?;

    if existing.is_some() {
        info!("Admin user already exists: {}", email);
        return Ok(());
    }

    let password_hash = bcrypt::hash(&password, BCRYPT_COST)?;

    sqlx::query(
        r#"
        INSERT INTO users (name, email, password_hash, role)
        VALUES ($1, $2, $3, 'admin')
        "#,
    )
    .bind(&name)
    .bind(&email)
    .bind(&password_hash)
    .execute(&pool)
    .await?;

    info!("Admin user created: {}", email);
    warn!("Change the bootstrap password after first login");

    Ok(())
}
