//! Configuration loading
//!
//! The overlay list and the host-page selector knobs live in one TOML
//! file. Compiled-in defaults reproduce the reference configuration, so a
//! missing config file is not an error; a file that exists but fails to
//! parse is.
//!
//! Host-page markup assumptions (tags, attribute markers, the source-URL
//! substring) are all here so a host redesign means editing one file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use feedlay_types::OverlaySpec;

/// Reference overlay list: two fixed images, stacked in order.
const DEFAULT_OVERLAY_URLS: &[(&str, f32)] = &[
    ("https://i.imgur.com/qABSUFh.png", 0.8),
    ("https://i.imgur.com/w6EZQjx.png", 0.6),
];

/// Path shape of a single-post detail view.
pub const DEFAULT_DETAIL_PATH_PATTERN: &str = r"/status/\d+$";

/// Full engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedlayConfig {
    /// Tag of qualifying media elements
    pub media_tag: String,

    /// Substring a media element's `src` must contain to qualify
    pub media_src_substring: String,

    /// Tag of the post container an added node is resolved against
    pub post_container_tag: String,

    /// `data-testid` value of the photo container a media element must be
    /// nested inside
    pub photo_container_marker: String,

    /// Regex applied to the page path to recognize detail views
    pub detail_path_pattern: String,

    /// Overlay images, lowest layer first
    #[serde(rename = "overlay")]
    pub overlays: Vec<OverlaySpec>,
}

impl Default for FeedlayConfig {
    fn default() -> Self {
        Self {
            media_tag: "img".to_string(),
            media_src_substring: "media".to_string(),
            post_container_tag: "article".to_string(),
            photo_container_marker: "tweetPhoto".to_string(),
            detail_path_pattern: DEFAULT_DETAIL_PATH_PATTERN.to_string(),
            overlays: DEFAULT_OVERLAY_URLS
                .iter()
                .map(|&(url, opacity)| OverlaySpec::new(url, opacity))
                .collect(),
        }
    }
}

impl FeedlayConfig {
    /// Normalize hand-edited values: opacities clamp into [0, 1].
    pub fn normalize(&mut self) {
        for overlay in &mut self.overlays {
            overlay.opacity = overlay.clamped_opacity();
        }
    }
}

/// Load a config from a TOML file.
pub fn load_file(path: &Path) -> Result<FeedlayConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut config: FeedlayConfig =
        toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
    config.normalize();
    Ok(config)
}

/// Save a config to a TOML file.
pub fn save_file(path: &Path, config: &FeedlayConfig) -> Result<(), ConfigError> {
    let contents = toml::to_string_pretty(config).map_err(|e| ConfigError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;

    fs::write(path, contents).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Resolve the effective config.
///
/// An explicit path must load (errors propagate). With no explicit path,
/// the platform config location is tried and the compiled-in defaults are
/// used when nothing is there.
pub fn load_or_default(explicit: Option<&Path>) -> Result<FeedlayConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_file(path);
    }

    if let Some(path) = default_config_path()
        && path.exists()
    {
        return load_file(&path);
    }

    Ok(FeedlayConfig::default())
}

/// Platform config file location (`<config_dir>/feedlay/config.toml`).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("feedlay").join("config.toml"))
}

/// Errors that can occur during config loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Serialize error for {path:?}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: toml::ser::Error,
    },

    #[error("Invalid detail path pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference() {
        let config = FeedlayConfig::default();
        assert_eq!(config.overlays.len(), 2);
        assert_eq!(config.overlays[0].opacity, 0.8);
        assert_eq!(config.overlays[1].opacity, 0.6);
        assert_eq!(config.media_src_substring, "media");
        assert_eq!(config.photo_container_marker, "tweetPhoto");
    }

    #[test]
    fn test_parse_config_toml() {
        let toml = r#"
media_src_substring = "photo"

[[overlay]]
url = "https://images.example/one.png"
opacity = 0.9

[[overlay]]
url = "https://images.example/two.png"
opacity = 0.4
"#;

        let config: FeedlayConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.overlays.len(), 2);
        assert_eq!(config.overlays[1].url, "https://images.example/two.png");
        assert_eq!(config.media_src_substring, "photo");
        // Unspecified fields keep their defaults
        assert_eq!(config.post_container_tag, "article");
    }

    #[test]
    fn test_normalize_clamps_opacity() {
        let toml = r#"
[[overlay]]
url = "https://images.example/one.png"
opacity = 1.8
"#;
        let mut config: FeedlayConfig = toml::from_str(toml).unwrap();
        config.normalize();
        assert_eq!(config.overlays[0].opacity, 1.0);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = FeedlayConfig::default();
        let rendered = toml::to_string_pretty(&config).unwrap();
        let parsed: FeedlayConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
