//! Overlay image preloading
//!
//! All configured overlay images are fetched once at startup, decoded, and
//! held in an in-memory cache keyed by URL. A failed attempt is logged,
//! recorded, and never retried. Completion of every attempt (success or
//! failure) gates the start of the feed watcher, so injection can prefer
//! cached bitmaps; the injector still works on a cache miss by referencing
//! the URL directly.

use std::collections::{HashMap, HashSet};

use image::GenericImageView;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use feedlay_types::{Dimensions, OverlaySpec};

/// A fetched and decoded overlay image.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
    /// Raw fetched bytes (as served, not re-encoded)
    pub bytes: Vec<u8>,
}

impl LoadedImage {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width as f32, self.height as f32)
    }
}

/// In-memory overlay image cache.
///
/// Populated once by [`preload_overlays`], read-only thereafter; entries
/// are never evicted. Owned by the session and passed down explicitly;
/// there is no ambient global.
#[derive(Debug, Clone, Default)]
pub struct ImageCache {
    images: HashMap<String, LoadedImage>,
    failed: HashSet<String>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cache from already-decoded images (embedders, tests).
    pub fn from_images(images: impl IntoIterator<Item = LoadedImage>) -> Self {
        let mut cache = Self::new();
        for image in images {
            cache.insert(image);
        }
        cache
    }

    pub fn insert(&mut self, image: LoadedImage) {
        self.images.insert(image.url.clone(), image);
    }

    pub fn get(&self, url: &str) -> Option<&LoadedImage> {
        self.images.get(url)
    }

    pub fn is_cached(&self, url: &str) -> bool {
        self.images.contains_key(url)
    }

    /// Record a load attempt that failed. Layers for this URL are hidden
    /// at injection time instead of pointing at a known-broken source.
    pub fn mark_failed(&mut self, url: &str) {
        self.failed.insert(url.to_string());
    }

    pub fn is_failed(&self, url: &str) -> bool {
        self.failed.contains(url)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Fetch every configured overlay image concurrently and build the cache.
///
/// Never fails as a whole: each attempt's outcome is recorded per URL and
/// processing continues.
pub async fn preload_overlays(specs: &[OverlaySpec]) -> ImageCache {
    let client = reqwest::Client::new();
    let mut tasks = JoinSet::new();

    for spec in specs {
        let client = client.clone();
        let url = spec.url.clone();
        tasks.spawn(async move {
            let result = fetch_image(&client, &url).await;
            (url, result)
        });
    }

    let mut cache = ImageCache::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((url, Ok(image))) => {
                debug!(url = %url, width = image.width, height = image.height, "preloaded overlay image");
                cache.insert(image);
            }
            Ok((url, Err(e))) => {
                warn!(url = %url, error = %e, "failed to preload overlay image");
                cache.mark_failed(&url);
            }
            Err(e) => {
                warn!(error = %e, "preload task failed to complete");
            }
        }
    }

    cache
}

async fn fetch_image(client: &reqwest::Client, url: &str) -> Result<LoadedImage, PreloadError> {
    let response = client.get(url).send().await.map_err(|e| PreloadError::Http {
        url: url.to_string(),
        source: e,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(PreloadError::Status {
            url: url.to_string(),
            status,
        });
    }

    let bytes = response.bytes().await.map_err(|e| PreloadError::Http {
        url: url.to_string(),
        source: e,
    })?;

    let decoded = image::load_from_memory(&bytes).map_err(|e| PreloadError::Decode {
        url: url.to_string(),
        source: e,
    })?;
    let (width, height) = decoded.dimensions();

    Ok(LoadedImage {
        url: url.to_string(),
        width,
        height,
        bytes: bytes.to_vec(),
    })
}

/// Errors from a single overlay image load attempt.
#[derive(Debug, Error)]
pub enum PreloadError {
    #[error("request for {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to decode {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: image::ImageError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image(url: &str) -> LoadedImage {
        LoadedImage {
            url: url.to_string(),
            width: 640,
            height: 480,
            bytes: vec![0u8; 16],
        }
    }

    #[test]
    fn test_cache_lookup() {
        let cache = ImageCache::from_images([test_image("https://x.example/a.png")]);
        assert!(cache.is_cached("https://x.example/a.png"));
        assert!(!cache.is_cached("https://x.example/b.png"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failed_urls_are_recorded_separately() {
        let mut cache = ImageCache::new();
        cache.mark_failed("https://x.example/broken.png");
        assert!(cache.is_failed("https://x.example/broken.png"));
        assert!(!cache.is_cached("https://x.example/broken.png"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_loaded_image_dimensions() {
        let image = test_image("https://x.example/a.png");
        assert_eq!(image.dimensions(), Dimensions::new(640.0, 480.0));
    }
}
