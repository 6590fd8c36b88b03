use std::str::FromStr;

use gatherly::{admin::AdminToken, config::Config, db, AppState};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gatherly=info")),
        )
        .init();

    let config = Config::from_env();

    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let db_pool = SqlitePoolOptions::new()
        .max_connections(16)
        .connect_with(options)
        .await?;

    // schema or seeding failure is fatal, there is nothing sensible to serve
    db::create_schema(&db_pool).await?;
    db::seed_if_empty(&db_pool).await?;

    let app = gatherly::app(AppState {
        db_pool,
        admin: AdminToken::new(config.admin_token),
    });

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
