use anyhow::{Context, Result};
use clap::Parser;
use fenfav_core::storage::{self, Backend};
use fenfav_server::{load_config, serve, Config, Router};
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about = "Serve favorite chess positions over HTTP", long_about = None)]
struct Cli {
    /// Path to the TOML config file. Created with defaults if missing.
    #[clap(long, short, env = "FENFAV_CONFIG", default_value = "fenfav.toml")]
    config: PathBuf,
    /// Address to bind, overriding `server.address`
    #[clap(long)]
    address: Option<IpAddr>,
    /// Port to bind, overriding `server.port`
    #[clap(long, short)]
    port: Option<u16>,
    /// Storage backend (memory, json or sqlite), overriding `storage.backend`
    #[clap(long)]
    backend: Option<Backend>,
    /// Data file, overriding `storage.path`
    #[clap(long)]
    data: Option<PathBuf>,
    /// Log filter directives, overriding `logging.filter`
    #[clap(long, env = "FENFAV_LOG")]
    log_filter: Option<String>,
}

impl Cli {
    fn apply(self, config: &mut Config) {
        if let Some(address) = self.address {
            config.server.address = address;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(backend) = self.backend {
            config.storage.backend = backend;
        }
        if let Some(data) = self.data {
            config.storage.path = data;
        }
        if let Some(filter) = self.log_filter {
            config.logging.filter = filter;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(&cli.config)?;
    cli.apply(&mut config);

    init_telemetry(&config.logging.filter)?;

    let store = storage::open(config.storage.backend, &config.storage.path)
        .with_context(|| format!("Failed to open {} store", config.storage.backend))?;
    let router = Arc::new(Router::new(store));

    // Loads file-backed stores up front so a corrupt file fails at startup.
    let count = router
        .with_store(|store| store.len())
        .context("Failed to read favorites")?;
    info!(
        backend = %config.storage.backend,
        path = %config.storage.path.display(),
        count,
        "Opened favorites store"
    );

    let address = config.server.socket_addr();
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    serve(listener, router, config.server.max_body_bytes, shutdown_signal()).await
}

fn init_telemetry(filter: &str) -> Result<()> {
    let filter_layer =
        EnvFilter::try_new(filter).with_context(|| format!("Invalid log filter `{filter}`"))?;
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
