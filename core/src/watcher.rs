//! Feed watching
//!
//! The watcher is a two-state machine driving the matcher and the
//! injector. It starts `Idle`, transitions to `Observing` exactly once
//! (after preloading completes and the initial scan runs), and never
//! transitions back; it processes added-node batches for the lifetime of
//! the page view.
//!
//! Dispatch is synchronous: one batch in, zero or more injections out.
//! For each added element node the nearest enclosing post container
//! supplies the text; qualifying media is collected from the added
//! subtree itself, the way the host's mutation records scope it.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use feedlay_types::Dimensions;

use crate::config::{ConfigError, FeedlayConfig};
use crate::dom::{Document, NodeId};
use crate::events::PageEvent;
use crate::matcher::{DetailViewMatcher, matches_post_criteria};
use crate::overlay::{AppliedOverlay, inject_overlays, rescale_overlays};
use crate::preload::ImageCache;

/// Watcher lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    /// Before the initial scan; batches are ignored
    Idle,
    /// Live; batches dispatch to the matcher and injector
    Observing,
}

/// Counters for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WatcherStats {
    /// Added-node batches dispatched
    pub batches: usize,
    /// Posts approved by the text criteria (detail-view bypasses are not
    /// counted here)
    pub posts_matched: usize,
    /// Media elements that received overlay layers
    pub media_injected: usize,
}

/// Watches a document for inserted posts and drives overlay injection.
#[derive(Debug)]
pub struct FeedWatcher {
    config: FeedlayConfig,
    detail_view: DetailViewMatcher,
    cache: ImageCache,

    /// Injection records by media element, for the rescale path
    applied: HashMap<NodeId, AppliedOverlay>,

    state: WatcherState,
    current_path: String,
    stats: WatcherStats,
}

impl FeedWatcher {
    /// Create an idle watcher. Compiles the detail-view pattern.
    pub fn new(config: FeedlayConfig, cache: ImageCache) -> Result<Self, ConfigError> {
        let detail_view = DetailViewMatcher::new(&config.detail_path_pattern)?;
        Ok(Self {
            config,
            detail_view,
            cache,
            applied: HashMap::new(),
            state: WatcherState::Idle,
            current_path: "/".to_string(),
            stats: WatcherStats::default(),
        })
    }

    pub fn state(&self) -> WatcherState {
        self.state
    }

    pub fn stats(&self) -> WatcherStats {
        self.stats
    }

    pub fn config(&self) -> &FeedlayConfig {
        &self.config
    }

    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }

    /// Install the preloaded image cache. Meaningful only before `start`;
    /// already-injected layers keep their original source stamps.
    pub fn set_cache(&mut self, cache: ImageCache) {
        self.cache = cache;
    }

    /// Update the current page path (single-page-app navigation). Only the
    /// detail-view heuristic changes; no rescan happens.
    pub fn set_path(&mut self, path: &str) {
        self.current_path = path.to_string();
    }

    pub fn is_detail_view(&self) -> bool {
        self.detail_view.is_detail_view(&self.current_path)
    }

    /// Number of media elements currently carrying overlays.
    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }

    pub fn applied(&self, media: NodeId) -> Option<&AppliedOverlay> {
        self.applied.get(&media)
    }

    /// Run the initial scan and begin observing. The `Idle -> Observing`
    /// transition happens once; a second call is a no-op.
    pub fn start(&mut self, doc: &mut Document) {
        if self.state == WatcherState::Observing {
            debug!("watcher already observing");
            return;
        }

        // One-shot pass for already-present content on detail-view pages
        if self.is_detail_view() {
            let media = self.collect_media(doc, doc.root());
            for id in media {
                self.inject(doc, id);
            }
            info!(
                path = %self.current_path,
                injected = self.stats.media_injected,
                "initial detail-view scan complete"
            );
        }

        self.state = WatcherState::Observing;
        info!("feed watcher observing");
    }

    /// Dispatch a batch of page events synchronously.
    pub fn handle_events(&mut self, doc: &mut Document, events: &[PageEvent]) {
        for event in events {
            match event {
                PageEvent::NodesAdded { nodes } => self.handle_nodes_added(doc, nodes),
                PageEvent::NodeResized { node, rendered } => {
                    self.handle_resize(doc, *node, *rendered)
                }
                PageEvent::PathChanged { path } => self.set_path(path),
            }
        }
    }

    fn handle_nodes_added(&mut self, doc: &mut Document, nodes: &[NodeId]) {
        if self.state == WatcherState::Idle {
            debug!("batch ignored before watcher start");
            return;
        }

        self.stats.batches += 1;
        for &node in nodes {
            if !doc.is_element(node) {
                continue;
            }
            self.process_added_node(doc, node);
        }
    }

    fn process_added_node(&mut self, doc: &mut Document, node: NodeId) {
        let container = self.nearest_post_container(doc, node);
        let text = doc.inner_text(container);

        let text_matched = matches_post_criteria(&text);
        if !self.is_detail_view() && !text_matched {
            return;
        }
        if text_matched {
            self.stats.posts_matched += 1;
        }

        let media = self.collect_media(doc, node);
        for id in media {
            self.inject(doc, id);
        }
    }

    fn handle_resize(&mut self, doc: &mut Document, node: NodeId, rendered: Dimensions) {
        let Some(applied) = self.applied.get(&node) else {
            debug!(?node, "resize for untracked element ignored");
            return;
        };
        rescale_overlays(doc, applied, rendered);
    }

    fn inject(&mut self, doc: &mut Document, media: NodeId) {
        if let Some(applied) = inject_overlays(
            doc,
            media,
            &self.config.overlays,
            &self.cache,
            &self.config.photo_container_marker,
        ) {
            self.stats.media_injected += 1;
            self.applied.insert(media, applied);
        }
    }

    /// Nearest ancestor-or-self post container; the node itself when no
    /// container encloses it.
    fn nearest_post_container(&self, doc: &Document, node: NodeId) -> NodeId {
        let tag = self.config.post_container_tag.as_str();
        if doc.tag(node) == Some(tag) {
            return node;
        }
        doc.ancestors(node)
            .find(|&id| doc.tag(id) == Some(tag))
            .unwrap_or(node)
    }

    /// Qualifying media in the subtree under `root`.
    fn collect_media(&self, doc: &Document, root: NodeId) -> Vec<NodeId> {
        doc.descendants(root)
            .filter(|&id| self.is_qualifying_media(doc, id))
            .collect()
    }

    fn is_qualifying_media(&self, doc: &Document, id: NodeId) -> bool {
        doc.tag(id) == Some(self.config.media_tag.as_str())
            && doc
                .attr(id, "src")
                .is_some_and(|src| src.contains(&self.config.media_src_substring))
    }
}
