//! ShareBin API server entrypoint.

use sharebin_core::DEFAULT_PORT;
use sharebin_server::{
    config::{env_flag_enabled, Config},
    db::Database,
    ratelimit, serve_router, session, AppState,
};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const EXPIRY_PURGE_INTERVAL: Duration = Duration::from_secs(60);
const RATE_LIMIT_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);
const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(600);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sharebin=info,sharebin_server=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if std::env::args().skip(1).any(|arg| arg == "--help") {
        print_help();
        return Ok(());
    }

    let config = Config::from_env();
    if config.maintenance {
        tracing::warn!("Maintenance mode enabled - every request receives the maintenance page");
    }

    let state = AppState::new(config.clone(), Database::new());

    let allow_public = env_flag_enabled("ALLOW_PUBLIC_ACCESS");
    if allow_public {
        tracing::warn!("Public access enabled - server will accept requests from any origin");
    }

    let bind_addr = sharebin_server::resolve_bind_address(&config, allow_public);
    if !bind_addr.ip().is_loopback() {
        tracing::warn!(
            "Binding to non-localhost address: {} - ensure proper security measures are in place",
            bind_addr
        );
    }

    let purge = sharebin_server::spawn_expiry_purge(state.db.clone(), EXPIRY_PURGE_INTERVAL);
    let cleanup = ratelimit::spawn_cleanup_task(state.rate_limit.clone(), RATE_LIMIT_CLEANUP_INTERVAL);
    let sessions = session::spawn_session_purge(state.sessions.clone(), SESSION_PURGE_INTERVAL);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr().unwrap_or(bind_addr);
    tracing::info!("ShareBin running at http://{}", actual_addr);

    let serve_result = serve_router(listener, state, allow_public, shutdown_signal()).await;

    purge.abort();
    cleanup.abort();
    sessions.abort();
    tracing::info!("ShareBin stopped");

    serve_result?;
    Ok(())
}

fn print_help() {
    println!("ShareBin Server\n");
    println!("Usage: sharebin [--help]\n");
    println!("Environment variables:");
    println!("  PORT                         Server port (default: {})", DEFAULT_PORT);
    println!("  BIND                         Override bind address (e.g. 0.0.0.0:{})", DEFAULT_PORT);
    println!("  ALLOW_PUBLIC_ACCESS          Allow non-loopback binds and CORS from any origin");
    println!("  CHAR_LIMIT                   Maximum characters per file (default: 300000)");
    println!("  FILE_LIMIT                   Maximum files per paste (default: 5)");
    println!("  RATE_LIMIT_REQUESTS          Requests per window per client, 0 disables (default: 120)");
    println!("  RATE_LIMIT_WINDOW_SECS       Rate limit window in seconds (default: 60)");
    println!("  RATE_LIMIT_IGNORE_LOCALHOST  Skip rate limiting for loopback clients (default: true)");
    println!("  SESSION_SECRET               Session cookie signing secret (default: random)");
    println!("  ADMIN_TOKEN                  Bearer token for an administrator account (default: none)");
    println!("  ADMIN_USERNAME               Username of that account (default: admin)");
    println!("  MAINTENANCE                  Serve the maintenance page for every request");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
