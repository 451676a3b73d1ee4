//! `viewportd` entry point.
//!
//! Hosts a viewport registry and a pointer router in one process.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load AppConfig            -- --config / VIEWPORTD_CONFIG / platform dir
//!  └─ ViewportRegistry          -- frame adjustments registered up front
//!  └─ start tasks
//!       ├─ follow_changes       (registry change feed → PointerRouter)
//!       └─ pump_samples         (stdin pointer samples → PointerRouter → sink)
//!  └─ publish seed viewports
//!  └─ wait for Ctrl-C or end of input
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use viewport_service::application::follow_changes::follow_changes;
use viewport_service::application::publish_viewports::ViewportRegistry;
use viewport_service::application::route_pointer::PointerRouter;
use viewport_service::infrastructure::delivery::TracingPointerSink;
use viewport_service::infrastructure::pointer_input::pump_samples;
use viewport_service::infrastructure::storage::config::{
    config_file_path, load_config_from, save_config_to, AppConfig,
};
use viewport_service::infrastructure::storage::seed::publish_seed_viewports;

/// Command-line arguments for `viewportd`.
#[derive(Debug, Parser)]
#[command(
    name = "viewportd",
    about = "Publishes display viewports and routes raw pointer samples into logical coordinates",
    version
)]
struct Cli {
    /// Path to the TOML config file.  Defaults to the platform config directory.
    #[arg(long, env = "VIEWPORTD_CONFIG")]
    config: Option<PathBuf>,

    /// Write a default config file to the config path and exit.
    #[arg(long)]
    write_default_config: bool,

    /// Do not read pointer samples from stdin; only wait for Ctrl-C.
    #[arg(long)]
    no_stdin: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => config_file_path().context("no --config given and no platform config directory")?,
    };

    if cli.write_default_config {
        save_config_to(&config_path, &AppConfig::default())
            .with_context(|| format!("failed to write {}", config_path.display()))?;
        println!("wrote default config to {}", config_path.display());
        return Ok(());
    }

    let config = load_config_from(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.service.log_level)),
        )
        .init();

    info!(config = %config_path.display(), "viewportd starting");

    let mut registry = ViewportRegistry::new(config.service.notify_capacity);
    for entry in &config.frame_adjustments {
        registry.set_frame_adjustment(entry.unique_id.clone(), entry.to_adjustment());
    }
    let changes = registry.subscribe();
    let registry = Arc::new(Mutex::new(registry));

    let router = Arc::new(Mutex::new(PointerRouter::new(
        Arc::new(TracingPointerSink),
        config.routing.clamp_to_logical_frame,
    )));

    // ── Change feed ───────────────────────────────────────────────────────────
    tokio::spawn(follow_changes(
        changes,
        Arc::clone(&registry),
        Arc::clone(&router),
    ));

    // ── Seed viewports ────────────────────────────────────────────────────────
    let seeded = publish_seed_viewports(&mut *registry.lock().await, &config.viewports);
    info!(seeded, configured = config.viewports.len(), "seed viewports loaded");

    // Seeds may still sit in the change feed; give the router a consistent start.
    let records = registry.lock().await.snapshots();
    router.lock().await.resync(records);

    info!("viewportd ready.  Press Ctrl-C to exit.");

    if cli.no_stdin {
        tokio::signal::ctrl_c().await.context("failed to listen for Ctrl-C")?;
        info!("shutdown signal received");
    } else {
        let input = BufReader::new(tokio::io::stdin());
        tokio::select! {
            result = pump_samples(input, Arc::clone(&router)) => {
                let stats = result.context("failed to read pointer samples")?;
                info!(routed = stats.routed, dropped = stats.dropped, malformed = stats.malformed, "pointer input closed");
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for Ctrl-C")?;
                info!("shutdown signal received");
            }
        }
    }

    info!("viewportd stopped");
    Ok(())
}
