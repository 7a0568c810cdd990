//! Post matching
//!
//! Two independent checks decide whether a post gets overlays:
//! - **Text criteria**: fixed keyword rules over the post's case-folded
//!   inner text.
//! - **Detail view**: a path-shape check on the current page location;
//!   single-post detail pages bypass the text criteria entirely.

use regex::Regex;

use crate::config::ConfigError;

/// Decide whether a post's text marks it as a targeted post.
///
/// Case-folds, then matches if any hold:
/// (a) contains `"5x5"` or `"music friday"`;
/// (b) contains `"friday"` and (`"x5"` or `"x 5"`).
///
/// Empty text never matches.
pub fn matches_post_criteria(text: &str) -> bool {
    let text = text.to_lowercase();
    if text.contains("5x5") || text.contains("music friday") {
        return true;
    }
    text.contains("friday") && (text.contains("x5") || text.contains("x 5"))
}

/// Compiled path-shape check for single-post detail views.
#[derive(Debug, Clone)]
pub struct DetailViewMatcher {
    pattern: Regex,
}

impl DetailViewMatcher {
    /// Compile the configured path pattern.
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let pattern = Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            source: e,
        })?;
        Ok(Self { pattern })
    }

    /// True when `path` has the shape of a single-post detail page.
    pub fn is_detail_view(&self, path: &str) -> bool {
        self.pattern.is_match(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_DETAIL_PATH_PATTERN;

    #[test]
    fn test_grid_phrase_matches_any_case() {
        assert!(matches_post_criteria("my 5x5 for this week"));
        assert!(matches_post_criteria("MY 5X5 FOR THIS WEEK"));
    }

    #[test]
    fn test_music_friday_matches_any_case() {
        assert!(matches_post_criteria("Music Friday is here"));
        assert!(matches_post_criteria("happy MUSIC FRIDAY"));
    }

    #[test]
    fn test_friday_with_grid_shorthand_matches() {
        assert!(matches_post_criteria("friday picks, 3x5 this time"));
        assert!(matches_post_criteria("Friday! top x 5 albums"));
    }

    #[test]
    fn test_friday_alone_does_not_match() {
        assert!(!matches_post_criteria("Happy Friday everyone"));
    }

    #[test]
    fn test_unrelated_text_does_not_match() {
        assert!(!matches_post_criteria("Happy Tuesday"));
    }

    #[test]
    fn test_empty_text_never_matches() {
        assert!(!matches_post_criteria(""));
    }

    #[test]
    fn test_example_post_matches() {
        assert!(matches_post_criteria("Happy Friday! Here's my 5x5"));
    }

    #[test]
    fn test_detail_view_path_shape() {
        let matcher = DetailViewMatcher::new(DEFAULT_DETAIL_PATH_PATTERN).unwrap();
        assert!(matcher.is_detail_view("/someuser/status/1234567890"));
        assert!(!matcher.is_detail_view("/home"));
        assert!(!matcher.is_detail_view("/someuser/status/1234/photo"));
        assert!(!matcher.is_detail_view("/someuser/status/"));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        assert!(DetailViewMatcher::new("(unclosed").is_err());
    }
}
