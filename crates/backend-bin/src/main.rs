use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use chirpy_backend_lib::{
    config::{Settings, StorageBackend, CONFIG_FILE},
    router,
    storage::{FlatFileStorage, MemoryStorage, Storage},
    AppState,
};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Chirpy HTTP server
#[derive(Parser, Debug)]
#[command(name = "chirpy", version, about)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Listen address, overriding `server.host` and `server.port`
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = Settings::load_from(&args.config)?;

    init_tracing(&settings.log_level, args.json_logs);

    let addr = match args.bind {
        Some(addr) => addr,
        None => settings.server.bind_addr()?,
    };

    match settings.storage.backend {
        StorageBackend::Memory => serve(MemoryStorage::new(), settings, addr).await,
        StorageBackend::FlatFile => {
            let storage = FlatFileStorage::new(&settings.storage.path)?;
            info!(path = %settings.storage.path.display(), "using flat-file storage");
            serve(storage, settings, addr).await
        },
    }
}

/// `RUST_LOG` wins over the configured level
fn init_tracing(default_level: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn serve<S: Storage + Clone + 'static>(
    storage: S,
    settings: Settings,
    addr: SocketAddr,
) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(storage, settings)?);
    let app = router::create_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // no signal handler available; run until killed
        std::future::pending::<()>().await;
    }
}
