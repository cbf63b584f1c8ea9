mod app;
mod config;
mod db_migrations;
mod db_sqlx;
mod ledger;
mod routes;
mod services;
mod state;
mod store;

extern crate self as sqlx;
pub use crate::db_sqlx::{Error, PgPool, postgres, query, query_as, query_scalar};

use std::sync::atomic::Ordering;

use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let db = match config::database_url() {
        Some(database_url) => {
            let db_max_connections = config::db_max_connections();
            tracing::info!(db_max_connections, "Connecting to PostgreSQL...");
            let pool = match PgPoolOptions::new()
                .max_connections(db_max_connections)
                .connect(&database_url)
                .await
            {
                Ok(pool) => pool,
                Err(e) => {
                    tracing::error!(error = %e, "failed to connect to PostgreSQL");
                    return;
                }
            };
            if let Err(e) = db_migrations::run(&pool).await {
                tracing::error!(error = %e, "failed to run migrations");
                return;
            }
            tracing::info!("Database connected and migrations applied");
            Some(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL is not set; points will not survive a restart");
            None
        }
    };

    let state = AppState::new(db);

    if let Some(pool) = state.db.as_ref() {
        match store::load_ledger(pool, Utc::now()).await {
            Ok(restored) => {
                tracing::info!(
                    total_records = restored.ledger.total_records(),
                    retained_records = restored.ledger.retained_records(),
                    next_event_id = restored.next_event_id,
                    "Restored point ledger from database"
                );
                state
                    .next_event_id
                    .store(restored.next_event_id, Ordering::Relaxed);
                *state.ledger.write().await = restored.ledger;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load persisted points");
                return;
            }
        }
    }

    // Spawn background services
    tokio::spawn(services::point_generator::run(state.clone()));
    tokio::spawn(services::retention_cleaner::run(state.clone()));

    let static_dir = config::static_dir();
    if !static_dir.is_dir() {
        tracing::warn!(
            static_dir = %static_dir.display(),
            "static client bundle not found; only /api routes will respond"
        );
    }

    let app = app::build_app(state);

    let addr = format!("0.0.0.0:{}", config::server_port());
    tracing::info!("House Cup server listening on {addr}");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind TCP listener");
            return;
        }
    };
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server failed");
    }

    tracing::info!("Server shut down gracefully");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                return;
            }
        };
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
