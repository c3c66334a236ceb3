use std::sync::Arc;

use bookmarks::auth::AuthGuard;
use bookmarks::config::{Cli, Config};
use bookmarks::handler::AppState;
use bookmarks::logging;
use bookmarks::store::BookmarkStore;
use clap::Parser;
use tokio::signal;
use tracing;

#[tokio::main]
async fn main() {
    // A missing .env is fine; real deployments set the environment directly.
    let _ = dotenvy::dotenv();

    let args = Cli::parse();

    let cfg = Config::load(&args).unwrap_or_else(|e| {
        eprintln!("failed to load config: {:#}", e);
        std::process::exit(1);
    });

    if let Err(e) = logging::init(cfg.app.mode, cfg.app.get_log_file()) {
        eprintln!("failed to setup logging: {:#}", e);
        std::process::exit(1);
    }
    tracing::info!(mode = ?cfg.app.mode, "bookmarks.svc starting");

    if cfg.app.get_api_token().is_empty() {
        tracing::warn!("no api token configured, every request will be rejected");
    }

    let store = Arc::new(BookmarkStore::with_seed(cfg.bookmarks).unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to seed bookmark store");
        std::process::exit(1);
    }));
    tracing::info!("bookmark store ready with {} bookmarks", store.len().unwrap_or(0));

    let state = AppState::new(store, cfg.app.mode);
    let app = bookmarks::app(state, AuthGuard::new(cfg.app.get_api_token()));

    let address = format!("0.0.0.0:{}", cfg.app.get_port());
    let listener = tokio::net::TcpListener::bind(&address).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup tcp listener");
        std::process::exit(1);
    });

    tracing::info!("bookmarks.svc running on {}", &address);
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl+c");
                std::future::pending::<()>().await;
            }
            tracing::info!("ctrl+c signal received, preparing to shutdown");
        })
        .await;

    if let Err(err) = result {
        tracing::error!(error = %err, "server error");
        std::process::exit(1);
    }
    tracing::info!("bookmarks.svc going off, graceful shutdown complete");
}
