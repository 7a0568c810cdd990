//! Feed session
//!
//! A session owns the document, the preloaded image cache, and the feed
//! watcher, and wires the startup ordering together: preload every overlay
//! image (success or failure), run the initial scan, then observe. After
//! `start`, the embedder feeds it page-event batches and reads the
//! annotated document back out.

use crate::config::{ConfigError, FeedlayConfig};
use crate::dom::{Document, NodeId, parse_html};
use crate::events::PageEvent;
use crate::overlay::AppliedOverlay;
use crate::preload::{ImageCache, preload_overlays};
use crate::watcher::{FeedWatcher, WatcherState, WatcherStats};

/// An overlay pipeline bound to one document.
#[derive(Debug)]
pub struct FeedSession {
    document: Document,
    watcher: FeedWatcher,
}

impl FeedSession {
    /// Create an idle session over an existing document.
    pub fn new(config: FeedlayConfig, document: Document) -> Result<Self, ConfigError> {
        let watcher = FeedWatcher::new(config, ImageCache::new())?;
        Ok(Self { document, watcher })
    }

    /// Create an idle session by parsing an HTML snapshot.
    pub fn from_html(config: FeedlayConfig, html: &str) -> Result<Self, ConfigError> {
        Self::new(config, parse_html(html))
    }

    /// Current page path heuristic input; set before `start` so the
    /// initial scan sees the right view.
    pub fn set_path(&mut self, path: &str) {
        self.watcher.set_path(path);
    }

    /// Preload overlay images, run the initial scan, begin observing.
    pub async fn start(&mut self) {
        let cache = preload_overlays(&self.watcher.config().overlays).await;
        self.start_with_cache(cache);
    }

    /// Start with an already-built cache (embedders, tests, watch-mode
    /// re-runs that reuse one preload).
    pub fn start_with_cache(&mut self, cache: ImageCache) {
        self.watcher.set_cache(cache);
        self.watcher.start(&mut self.document);
    }

    /// Start without touching the network; every layer takes the
    /// direct-URL path.
    pub fn start_offline(&mut self) {
        self.start_with_cache(ImageCache::new());
    }

    /// Dispatch a batch of page events synchronously.
    pub fn handle_events(&mut self, events: &[PageEvent]) {
        self.watcher.handle_events(&mut self.document, events);
    }

    // ─── Accessors ───────────────────────────────────────────────────────────

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable document access for embedders that build mutations before
    /// reporting them as `NodesAdded` batches.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn state(&self) -> WatcherState {
        self.watcher.state()
    }

    pub fn stats(&self) -> WatcherStats {
        self.watcher.stats()
    }

    pub fn is_detail_view(&self) -> bool {
        self.watcher.is_detail_view()
    }

    pub fn applied_count(&self) -> usize {
        self.watcher.applied_count()
    }

    pub fn applied(&self, media: NodeId) -> Option<&AppliedOverlay> {
        self.watcher.applied(media)
    }
}
