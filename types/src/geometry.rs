//! Element geometry
//!
//! Media elements have a natural (intrinsic) size and a rendered size that
//! the surrounding layout can change at any time. Overlay layers are sized
//! to the natural box and kept aligned with a uniform scale transform.

use serde::{Deserialize, Serialize};

/// A width/height pair in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

impl Dimensions {
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when this box has a usable width.
    ///
    /// Images that have not finished loading report a zero natural size;
    /// scaling against them is meaningless.
    pub fn has_width(&self) -> bool {
        self.width > 0.0
    }

    /// Uniform scale factor that maps this (natural) box onto a rendered
    /// width: `rendered.width / self.width`. Returns 0.0 when the natural
    /// width is zero.
    ///
    /// # Examples
    /// ```
    /// use feedlay_types::geometry::Dimensions;
    /// let natural = Dimensions::new(800.0, 600.0);
    /// let rendered = Dimensions::new(400.0, 300.0);
    /// assert_eq!(natural.scale_to(rendered), 0.5);
    /// ```
    pub fn scale_to(&self, rendered: Dimensions) -> f32 {
        if !self.has_width() {
            return 0.0;
        }
        rendered.width / self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_halved() {
        let natural = Dimensions::new(800.0, 600.0);
        assert_eq!(natural.scale_to(Dimensions::new(400.0, 300.0)), 0.5);
    }

    #[test]
    fn test_scale_identity() {
        let natural = Dimensions::new(640.0, 480.0);
        assert_eq!(natural.scale_to(natural), 1.0);
    }

    #[test]
    fn test_scale_zero_natural_width() {
        assert_eq!(Dimensions::ZERO.scale_to(Dimensions::new(400.0, 300.0)), 0.0);
    }

    #[test]
    fn test_scale_upsized() {
        let natural = Dimensions::new(200.0, 100.0);
        assert_eq!(natural.scale_to(Dimensions::new(500.0, 250.0)), 2.5);
    }
}
