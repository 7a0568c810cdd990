//! CLI command implementations
//!
//! One scan = parse the snapshot, run a full session against it (preload,
//! initial scan, then every direct child of `body` reported as one
//! inserted subtree), then print the report and optionally write the
//! annotated document back out.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use feedlay_core::PageEvent;
use feedlay_core::config::{self, FeedlayConfig};
use feedlay_core::matcher::matches_post_criteria;
use feedlay_core::preload::{ImageCache, preload_overlays};
use feedlay_core::session::FeedSession;
use feedlay_core::snapshot_watcher::{SnapshotEvent, SnapshotWatcher};

pub async fn scan(
    input: &Path,
    output: Option<&Path>,
    config_path: Option<&Path>,
    page_path: &str,
    offline: bool,
    json: bool,
) -> Result<(), String> {
    let config = config::load_or_default(config_path).map_err(|e| e.to_string())?;
    let cache = build_cache(&config, offline).await;
    run_once(&config, cache, input, output, page_path, json)
}

pub async fn watch(
    input: &Path,
    output: Option<&Path>,
    config_path: Option<&Path>,
    page_path: &str,
    offline: bool,
) -> Result<(), String> {
    let config = config::load_or_default(config_path).map_err(|e| e.to_string())?;
    // One preload serves every re-run; the cache never changes after startup
    let cache = build_cache(&config, offline).await;

    run_once(&config, cache.clone(), input, output, page_path, false)?;

    let mut watcher = SnapshotWatcher::new(input).map_err(|e| e.to_string())?;
    println!("Watching {}", input.display());

    while let Some(event) = watcher.next_event().await {
        match event {
            SnapshotEvent::Changed(path) => {
                info!(path = %path.display(), "snapshot changed, re-running");
                if let Err(e) = run_once(&config, cache.clone(), input, output, page_path, false) {
                    // Rewrites can race the read; the next event gets another try
                    warn!(error = %e, "re-scan failed");
                }
                watcher.drain_pending();
            }
            SnapshotEvent::Removed(path) => {
                println!("Snapshot removed: {}", path.display());
            }
            SnapshotEvent::Error(e) => {
                warn!(error = %e, "snapshot watcher error");
            }
        }
    }

    Ok(())
}

pub fn show_config(config_path: Option<&Path>) -> Result<(), String> {
    let config = config::load_or_default(config_path).map_err(|e| e.to_string())?;
    let rendered = toml::to_string_pretty(&config).map_err(|e| e.to_string())?;
    print!("{rendered}");
    Ok(())
}

pub fn check(text: &str) {
    if matches_post_criteria(text) {
        println!("match");
    } else {
        println!("no match");
    }
}

async fn build_cache(config: &FeedlayConfig, offline: bool) -> ImageCache {
    if offline {
        ImageCache::new()
    } else {
        preload_overlays(&config.overlays).await
    }
}

fn run_once(
    config: &FeedlayConfig,
    cache: ImageCache,
    input: &Path,
    output: Option<&Path>,
    page_path: &str,
    json: bool,
) -> Result<(), String> {
    let html = fs::read_to_string(input)
        .map_err(|e| format!("cannot read {}: {e}", input.display()))?;

    let mut session =
        FeedSession::from_html(config.clone(), &html).map_err(|e| e.to_string())?;
    session.set_path(page_path);
    session.start_with_cache(cache);

    let body = session.document().body();
    let nodes = session.document().children(body).to_vec();
    session.handle_events(&[PageEvent::NodesAdded { nodes }]);

    let stats = session.stats();
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&stats).map_err(|e| e.to_string())?
        );
    } else {
        println!(
            "Posts matched: {}  Media overlaid: {}  (detail view: {})",
            stats.posts_matched,
            stats.media_injected,
            session.is_detail_view()
        );
    }

    if let Some(out) = output {
        fs::write(out, session.into_document().to_html())
            .map_err(|e| format!("cannot write {}: {e}", out.display()))?;
        println!("Annotated snapshot written to {}", out.display());
    }

    Ok(())
}
