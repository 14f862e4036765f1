// src/main.rs
use std::sync::Arc;

use polls::app_state::AppState;
use polls::clock::DefaultClock;
use polls::config::Config;
use polls::errors::BootError;
use polls::store::{InMemoryQuestionStore, PgQuestionStore, QuestionStore};
use polls::{db, logging, routes};

#[tokio::main]
async fn main() -> Result<(), BootError> {
    let config = Config::from_env()?;
    logging::init_tracing(&config)?;

    let store: Arc<dyn QuestionStore> = match &config.database {
        Some(database) => {
            let pool = db::create_pool(database).await?;
            tracing::info!("using postgres question store");
            Arc::new(PgQuestionStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, questions are kept in memory only");
            Arc::new(InMemoryQuestionStore::new())
        }
    };

    let state = AppState::new(store, Arc::new(DefaultClock))?.with_index_limit(config.index_limit);
    let app = routes::create_routes(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "polls server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("polls server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
