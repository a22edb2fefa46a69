use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use klubok_backend_lib::{config::Settings, router, AppState};
use tokio::net::TcpListener;
use tokio::time::interval;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Klubok calling backend
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Config file (defaults to ./klubok.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overrides server.host and server.port
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Do not create the demo accounts
    #[arg(long)]
    no_seed: bool,
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.clone()));
    let registry = tracing_subscriber::registry().with(filter);

    if settings.log_format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            },
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    if args.no_seed {
        settings.auth.seed_test_accounts = false;
    }

    init_tracing(&settings);

    let state = AppState::from_settings(&settings).context("failed to initialise server state")?;
    let seeded = state.seed_if_enabled().await?;
    tracing::info!(
        seeded,
        media_configured = state.credentials.is_configured(),
        "server state ready"
    );

    let state = Arc::new(state);

    // Evict expired rate-limit entries so spoofed client keys cannot pile up
    let rate_limiter = state.rate_limiter.clone();
    let auth_rate_limiter = state.auth_rate_limiter.clone();
    let cleanup_every = Duration::from_secs(settings.rate_limit.window_secs.max(60));
    tokio::spawn(async move {
        let mut ticker = interval(cleanup_every);
        loop {
            ticker.tick().await;
            rate_limiter.cleanup();
            auth_rate_limiter.cleanup();
            tracing::debug!(
                request_clients = rate_limiter.tracked_clients(),
                login_clients = auth_rate_limiter.tracked_clients(),
                "rate limiter cleanup"
            );
        }
    });

    let app = router::create_router(state);

    let addr = match args.bind {
        Some(addr) => addr,
        None => settings.bind_addr()?,
    };
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}
