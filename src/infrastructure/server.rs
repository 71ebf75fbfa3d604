// Server module - assembles the application router and serves it

use axum::Router;
use sea_orm::DatabaseConnection;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::infrastructure::{AppState, Config};

/// Build the full application router with database connection
pub fn build_router(db: DatabaseConnection, static_dir: &str) -> Router {
    let state = AppState::new(db);

    api::app_router(state)
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
}

/// Bind the configured address and serve until the process stops
pub async fn serve(db: DatabaseConnection, config: &Config) -> std::io::Result<()> {
    let app = build_router(db, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!("Books catalog listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await
}
