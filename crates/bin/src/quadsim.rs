//! Quadsim - headless scene of moving rectangles indexed by a quadtree.
//!
//! Usage: `quadsim [config.toml]`. The config file is created with defaults
//! when it does not exist.

use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Quadsim v{}", env!("CARGO_PKG_VERSION"));

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(scene::config::DEFAULT_PATH));

    // Load configuration
    let config = scene::Config::load_from(&path)?;
    info!("Loaded configuration from {}", path.display());
    info!("  World: {}x{}", config.world.width, config.world.height);
    info!(
        "  Objects: {} moving, {} static, {}x{}",
        config.objects.count, config.objects.static_count, config.objects.width, config.objects.height
    );
    info!(
        "  Tree: max depth {}, {} per leaf (default {} / {})",
        config.tree.max_depth,
        config.tree.max_child_count,
        spatial::TreeConfig::DEFAULT_MAX_DEPTH,
        spatial::TreeConfig::DEFAULT_MAX_CHILD_COUNT
    );
    info!("  Tick interval: {}ms", config.simulation.tick_interval_ms);

    scene::run(config).await?;

    Ok(())
}
