//! Connections service - entrypoint del server

use connections::core::{AppState, Config};
use connections::{create_router, monitoring};
use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Inizializza il logging (RUST_LOG per regolare il livello)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Carica la configurazione dalle variabili d'ambiente
    let config = Config::from_env()?;
    config.print_info();

    // Crea il pool di connessioni al database
    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .max_lifetime(Duration::from_secs(config.connection_lifetime_secs))
        .connect(&config.database_url)
        .await?;

    info!("Database connection pool ready");

    let state = Arc::new(AppState::mysql(pool, config.jwt_secret.clone()));

    // Task di monitoraggio del processo in background
    tokio::spawn(monitoring::start_process_monitoring(
        config.monitor_interval_secs,
    ));

    let app = create_router(state).layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
