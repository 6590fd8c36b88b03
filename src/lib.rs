pub mod admin;
pub mod appresult;
pub mod calendar;
pub mod config;
pub mod db;
pub mod events;
pub mod res;
pub mod session;

pub use admin::AdminToken;
pub use appresult::{AppError, AppResult};

use axum::extract::FromRef;
use axum::routing::get;
use axum::Router;
use sqlx::SqlitePool;

/// Process-wide state, built once at startup and cloned into handlers.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub admin: AdminToken,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/style.css", get(res::stylesheet))
        .route("/app.js", get(res::admin_script))
        .merge(events::router())
        .with_state(state)
}
