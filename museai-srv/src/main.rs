//! MuseAI service (museai-srv) - Main entry point
//!
//! Serves the content generation API and the generated files.
//!
//! Startup order:
//! 1. Command line, then config resolution (CLI, env, TOML, defaults)
//! 2. Tracing
//! 3. Output directories and evolution state; a corrupt stats file aborts
//!    startup
//! 4. HTTP server with graceful shutdown

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use museai_common::config::{load_toml_config, ConfigOverrides, ServiceConfig};
use museai_gen::ArtifactStore;
use museai_srv::evolution::{EvolutionEngine, EvolutionHandle, JsonFileStore};
use museai_srv::services::Orchestrator;
use museai_srv::{build_router, AppState};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for museai-srv
///
/// Each option is also read from a `MUSEAI_*` environment variable and the
/// TOML config file, in that order of precedence.
#[derive(Parser, Debug)]
#[command(name = "museai-srv")]
#[command(about = "MuseAI content generator service")]
#[command(version)]
struct Args {
    /// TOML config file (default: <config dir>/museai/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory generated files are written to and served from
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Evolution statistics file
    #[arg(long)]
    stats_file: Option<PathBuf>,

    /// Upper bound on items per request
    #[arg(long)]
    max_quantity: Option<u32>,

    /// Seed for reproducible output
    #[arg(long)]
    rng_seed: Option<u64>,

    /// Log level when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            output_dir: self.output_dir.clone(),
            stats_file: self.stats_file.clone(),
            max_quantity: self.max_quantity,
            rng_seed: self.rng_seed,
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let toml = load_toml_config(args.config.as_deref()).context("Failed to load configuration")?;
    let config = ServiceConfig::resolve(&args.overrides(), &toml);

    init_tracing(&config.log_level);

    info!(
        "Starting MuseAI service (museai-srv) v{}",
        env!("CARGO_PKG_VERSION")
    );
    info!("Output directory: {}", config.output_dir.display());
    info!("Stats file: {}", config.stats_file.display());
    if let Some(seed) = config.rng_seed {
        info!("Random source seeded with {}", seed);
    }

    let artifacts = ArtifactStore::new(&config.output_dir);
    artifacts
        .ensure_directories()
        .context("Failed to create output directories")?;

    if let Some(parent) = config
        .stats_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let engine = EvolutionEngine::open(Box::new(JsonFileStore::new(&config.stats_file)))
        .context("Failed to load evolution state")?;

    let orchestrator = Orchestrator::new(
        artifacts,
        EvolutionHandle::new(engine),
        config.rng_seed,
        config.max_quantity,
    );
    let app = build_router(AppState::new(orchestrator));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("museai-srv listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// RUST_LOG wins over the configured level
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "museai_srv={0},museai_gen={0},museai_common={0},tower_http={0}",
            level
        ))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
