//! Style-attribute manipulation
//!
//! Layer geometry is expressed entirely through inline `style` attributes,
//! the way the host page would see it. Properties are upserted rather than
//! appended so repeated rescales never grow the attribute.

use feedlay_types::formatting::{format_css_number, format_px, format_scale};
use feedlay_types::Dimensions;

use crate::dom::{Document, NodeId};

/// Style of the full-size positioning wrapper that holds the layers.
pub const WRAPPER_STYLE: &str = "position: absolute; top: 0; left: 0; width: 100%; height: 100%;";

/// Build the inline style for one overlay layer.
///
/// The layer is sized to the media element's natural box and kept aligned
/// with a uniform top-left scale transform; stacking order comes from the
/// caller-provided z-index.
pub fn layer_style(natural: Dimensions, opacity: f32, z_index: i32, scale: f32) -> String {
    format!(
        "position: absolute; top: 0; left: 0; width: {}; height: {}; object-fit: contain; \
         z-index: {}; opacity: {}; transform-origin: top left; transform: {}",
        format_px(natural.width),
        format_px(natural.height),
        z_index,
        format_css_number(opacity),
        format_scale(scale),
    )
}

/// Set one property in an element's `style` attribute, preserving the
/// other properties and their order.
pub fn set_style_property(doc: &mut Document, id: NodeId, property: &str, value: &str) {
    let existing = doc.attr(id, "style").unwrap_or("");
    let mut pairs = parse_style(existing);

    if let Some(entry) = pairs.iter_mut().find(|(name, _)| name == property) {
        entry.1 = value.to_string();
    } else {
        pairs.push((property.to_string(), value.to_string()));
    }

    let rendered = pairs
        .iter()
        .map(|(name, val)| format!("{name}: {val}"))
        .collect::<Vec<_>>()
        .join("; ");
    doc.set_attr(id, "style", &rendered);
}

/// Read one property from an element's `style` attribute.
pub fn style_property(doc: &Document, id: NodeId, property: &str) -> Option<String> {
    parse_style(doc.attr(id, "style")?)
        .into_iter()
        .find(|(name, _)| name == property)
        .map(|(_, value)| value)
}

fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_property_on_bare_element() {
        let mut doc = Document::new();
        let el = doc.create_element("img");
        set_style_property(&mut doc, el, "position", "relative");
        assert_eq!(doc.attr(el, "style"), Some("position: relative"));
    }

    #[test]
    fn test_upsert_preserves_other_properties() {
        let mut doc = Document::new();
        let el = doc.create_element("img");
        doc.set_attr(el, "style", "width: 10px; transform: scale(1)");
        set_style_property(&mut doc, el, "transform", "scale(0.5)");
        assert_eq!(
            doc.attr(el, "style"),
            Some("width: 10px; transform: scale(0.5)")
        );
        assert_eq!(
            style_property(&doc, el, "transform").as_deref(),
            Some("scale(0.5)")
        );
    }

    #[test]
    fn test_layer_style_render() {
        let style = layer_style(Dimensions::new(800.0, 600.0), 0.8, 10, 1.0);
        assert!(style.contains("width: 800px"));
        assert!(style.contains("height: 600px"));
        assert!(style.contains("z-index: 10"));
        assert!(style.contains("opacity: 0.8"));
        assert!(style.contains("transform: scale(1)"));
    }
}
