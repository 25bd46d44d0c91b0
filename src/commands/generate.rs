//! Generate static files

use anyhow::Result;
use notify::Watcher;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::generator::{GenerateReport, Generator};
use crate::Folio;

/// Generate the static site
pub async fn run(folio: &Folio) -> Result<GenerateReport> {
    let start = Instant::now();

    let generator = Generator::new(folio)?;
    let report = generator.generate().await?;

    tracing::info!(
        "Generated {} pages ({} live, {} static mounts) and copied {} assets in {:.2}s",
        report.pages.len(),
        report.live_count(),
        report.static_count(),
        report.assets,
        start.elapsed().as_secs_f64()
    );

    Ok(report)
}

/// Watch for file changes and regenerate
pub async fn watch(folio: &Folio) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    // Watch source directory (includes the data directory)
    watcher.watch(&folio.source_dir, notify::RecursiveMode::Recursive)?;

    // Watch config file
    let config_path = folio.base_dir.join("_config.yml");
    if config_path.exists() {
        watcher.watch(&config_path, notify::RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let mut folio = folio.clone();
    let mut last_rebuild = Instant::now();

    while let Some(event) = rx.recv().await {
        // Debounce: only rebuild if more than 500ms since last rebuild
        if last_rebuild.elapsed() <= Duration::from_millis(500) {
            continue;
        }

        if event.paths.iter().any(|p| p.ends_with("_config.yml")) {
            match Folio::new(&folio.base_dir) {
                Ok(reloaded) => folio = reloaded,
                Err(e) => tracing::error!("Failed to reload config: {}", e),
            }
        }

        tracing::info!("File changed, regenerating...");
        if let Err(e) = run(&folio).await {
            tracing::error!("Generation failed: {}", e);
        }
        last_rebuild = Instant::now();
    }

    Ok(())
}
