use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use alumnitrack::{build_router, config::Config, db::Database, seed, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    if config.uses_default_secret() {
        warn!("JWT_SECRET is not set, tokens are signed with the default development secret");
    }

    let db = Database::new(&config.database_url).await?;

    info!("Running SQLx migrations...");
    if let Err(e) = db.migrate().await {
        error!("Failed to run SQLx migrations: {}", e);
        return Err(e.into());
    }
    info!("SQLx migrations completed successfully");

    seed::seed_admin_user(&db, &config).await?;

    let state = Arc::new(AppState::new(db, config.clone()));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server_address).await?;
    info!("Server starting on {}", config.server_address);

    axum::serve(listener, app).await?;

    Ok(())
}
