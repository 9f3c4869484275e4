//! Example consumer: serves the catalog read API over a PostgreSQL database.
//!
//! Run from repo root: `cargo run -p example-consumer`
//! Configure with DATABASE_URL, BIND_ADDR, API_PREFIX, CATALOG_* and QUERY_* (see `Settings`).

use catalog_query::{app, AppState, PgCatalog, Settings};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("catalog_query=info,tower_http=info")),
        )
        .init();

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.database_url)
        .await?;

    let catalog = PgCatalog::new(pool.clone(), settings.catalog.clone());
    let state = AppState::new(pool, Arc::new(catalog), settings.query.clone());

    let app = app(state, &settings.api_prefix);

    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
