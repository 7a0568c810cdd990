pub mod config;
pub mod dom;
pub mod events;
pub mod matcher;
pub mod overlay;
pub mod preload;
pub mod session;
pub mod snapshot_watcher;
pub mod watcher;

// Re-exports for convenience
pub use config::FeedlayConfig;
pub use events::PageEvent;
pub use preload::{ImageCache, preload_overlays};
pub use session::FeedSession;
pub use watcher::{FeedWatcher, WatcherState, WatcherStats};
