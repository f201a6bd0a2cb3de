// orgmirror entry point.
// Serves the organization data proxy and drives the offline cache controller from the CLI.

mod cache;
mod config;
mod data;
mod error;
mod github;
mod proxy;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cache::{
    CacheController, CacheStorage, DiskStorage, Event, EventOutcome, HttpNetwork, MemoryStorage, Request,
};
use crate::config::Config;
use crate::error::{MirrorError, Result};
use crate::github::GitHubClient;
use crate::proxy::ProxyState;

#[derive(Parser, Debug)]
#[command(name = "orgmirror", about = "GitHub organization mirror with an offline cache")]
struct Cli {
    /// Emit JSON log lines.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the data proxy.
    Serve,
    /// Install and activate the cache, then fetch one URL through it.
    Fetch {
        /// Absolute URL, or a path resolved against the configured origin.
        url: String,
        /// Keep the cache in memory instead of on disk.
        #[arg(long)]
        ephemeral: bool,
    },
    /// Delete every cache generation except the current one.
    Purge,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("orgmirror=info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn serve(config: Config) -> Result<()> {
    let upstream = GitHubClient::from_config(&config)?;
    let state = Arc::new(ProxyState::new(Arc::new(upstream), &config));
    let app = proxy::create_router(state);

    let listen_addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(listen_addr.as_str()).await?;
    tracing::info!(
        %listen_addr,
        org = %config.org,
        failure_mode = ?config.failure_mode,
        authenticated = config.token.is_some(),
        "data proxy listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn controller(config: &Config, ephemeral: bool) -> Result<CacheController> {
    let storage: Arc<dyn CacheStorage> = if ephemeral {
        Arc::new(MemoryStorage::new())
    } else {
        Arc::new(DiskStorage::default_location()?)
    };
    CacheController::from_config(config, storage, Arc::new(HttpNetwork::default()))
}

async fn fetch(config: Config, url: &str, ephemeral: bool) -> Result<()> {
    let controller = controller(&config, ephemeral)?;
    controller.dispatch(Event::Install).await?;
    controller.dispatch(Event::Activate).await?;

    let request = if url.starts_with('/') {
        Request::parse(&format!("{}{}", config.origin.trim_end_matches('/'), url))?
    } else {
        Request::parse(url)?
    };

    let fetched = controller.send(request).await?;
    if fetched.is_offline() {
        tracing::warn!("offline: showing cached data");
    }
    println!("{} ({:?})", fetched.response.status, fetched.source);
    println!("{}", fetched.response.text());
    Ok(())
}

async fn purge(config: Config) -> Result<()> {
    let controller = controller(&config, false)?;
    match controller.dispatch(Event::Activate).await? {
        EventOutcome::Activated(purged) => {
            tracing::info!(count = purged.len(), current = %config.cache_name, "purge complete");
            Ok(())
        }
        other => Err(MirrorError::Other(format!("unexpected outcome {:?}", other))),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received SIGINT"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.json);

    let config = Config::from_env()?;

    match cli.command {
        Command::Serve => serve(config).await,
        Command::Fetch { url, ephemeral } => fetch(config, &url, ephemeral).await,
        Command::Purge => purge(config).await,
    }
}
