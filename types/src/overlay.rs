//! Overlay specifications
//!
//! An overlay is a fixed image layered over a matched media element. The
//! list of overlays is immutable after startup; list order defines stacking
//! order (the first entry renders lowest).

use serde::{Deserialize, Serialize};

/// A single configured overlay image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlaySpec {
    /// Source URL of the overlay image
    pub url: String,

    /// Layer opacity in `[0, 1]`
    #[serde(default = "default_opacity")]
    pub opacity: f32,
}

fn default_opacity() -> f32 {
    1.0
}

impl OverlaySpec {
    pub fn new(url: impl Into<String>, opacity: f32) -> Self {
        Self {
            url: url.into(),
            opacity,
        }
    }

    /// Opacity clamped into the valid `[0, 1]` range.
    ///
    /// Hand-edited config files can carry out-of-range values; those clamp
    /// rather than reject. NaN clamps to 1.0.
    pub fn clamped_opacity(&self) -> f32 {
        if self.opacity.is_nan() {
            return 1.0;
        }
        self.opacity.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overlay_toml() {
        let toml = r#"
url = "https://images.example/layer.png"
opacity = 0.8
"#;
        let spec: OverlaySpec = toml::from_str(toml).unwrap();
        assert_eq!(spec.url, "https://images.example/layer.png");
        assert_eq!(spec.opacity, 0.8);
    }

    #[test]
    fn test_opacity_defaults_to_opaque() {
        let spec: OverlaySpec = toml::from_str(r#"url = "https://x.example/a.png""#).unwrap();
        assert_eq!(spec.opacity, 1.0);
    }

    #[test]
    fn test_clamped_opacity() {
        assert_eq!(OverlaySpec::new("u", 0.6).clamped_opacity(), 0.6);
        assert_eq!(OverlaySpec::new("u", -0.5).clamped_opacity(), 0.0);
        assert_eq!(OverlaySpec::new("u", 3.0).clamped_opacity(), 1.0);
        assert_eq!(OverlaySpec::new("u", f32::NAN).clamped_opacity(), 1.0);
    }
}
