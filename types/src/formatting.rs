//! Centralized CSS value formatting utilities.
//!
//! All style-string numeric formatting goes through this module so that
//! layer styles serialize identically everywhere (injector, rescale path,
//! tests) and never pick up locale- or float-noise differences.

/// Trim trailing zeros (and a trailing `.`) from a fixed-precision render.
fn trim_fixed(s: String) -> String {
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}

/// Format a number the way CSS expects: up to four decimal places with
/// trailing zeros removed.
///
/// # Examples
/// ```
/// use feedlay_types::formatting::format_css_number;
/// assert_eq!(format_css_number(800.0), "800");
/// assert_eq!(format_css_number(0.5), "0.5");
/// assert_eq!(format_css_number(0.8), "0.8");
/// ```
pub fn format_css_number(value: f32) -> String {
    trim_fixed(format!("{:.4}", value))
}

/// Format a pixel length, e.g. `800px`.
///
/// # Examples
/// ```
/// use feedlay_types::formatting::format_px;
/// assert_eq!(format_px(800.0), "800px");
/// assert_eq!(format_px(37.5), "37.5px");
/// ```
pub fn format_px(value: f32) -> String {
    format!("{}px", format_css_number(value))
}

/// Format a uniform scale transform, e.g. `scale(0.5)`.
///
/// # Examples
/// ```
/// use feedlay_types::formatting::format_scale;
/// assert_eq!(format_scale(0.5), "scale(0.5)");
/// assert_eq!(format_scale(1.0), "scale(1)");
/// ```
pub fn format_scale(factor: f32) -> String {
    format!("scale({})", format_css_number(factor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_numbers_lose_decimals() {
        assert_eq!(format_css_number(600.0), "600");
        assert_eq!(format_px(0.0), "0px");
    }

    #[test]
    fn test_fractions_keep_significant_digits() {
        assert_eq!(format_css_number(0.25), "0.25");
        assert_eq!(format_css_number(0.6), "0.6");
    }

    #[test]
    fn test_scale_render() {
        assert_eq!(format_scale(2.5), "scale(2.5)");
    }
}
