mod config;
mod db;
mod error;
mod routes;

use config::ApiConfig;
use db::Database;
use routes::AppState;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ApiConfig::load()?;

    let db = Database::new(&config.db_path);
    db.init()?;
    if config.seed {
        let written = db.seed_defaults()?;
        if written > 0 {
            tracing::info!("Seeded {} rows into {}", written, config.db_path.display());
        }
    }
    tracing::info!("Content database has {} texts", db.count_texts()?);

    let app = routes::router(Arc::new(AppState { db }));

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!("Listening on http://{}", config.bind);
    axum::serve(listener, app).await?;

    Ok(())
}
