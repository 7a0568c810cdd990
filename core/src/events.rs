//! Events delivered by the host-page embedding.
//!
//! The browser's mutation and resize observers collapse into a single
//! subscription: the embedder hands the watcher batches of `PageEvent`s and
//! the watcher dispatches them synchronously. These represent "things the
//! host page did" at a higher level than raw tree edits.

use feedlay_types::Dimensions;

use crate::dom::NodeId;

/// A host-page occurrence the feed watcher reacts to.
#[derive(Debug, Clone)]
pub enum PageEvent {
    /// A batch of subtree roots inserted under the document body. One batch
    /// corresponds to one mutation-observer callback.
    NodesAdded { nodes: Vec<NodeId> },

    /// A media element's rendered box changed size (layout reflow).
    NodeResized {
        node: NodeId,
        rendered: Dimensions,
    },

    /// The page location changed (single-page-app navigation). The watcher
    /// only updates its detail-view heuristic; no rescan happens.
    PathChanged { path: String },
}
