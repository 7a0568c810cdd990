//! The overlay injector.
//!
//! Given a qualifying media element, attach one absolutely positioned
//! layer per configured overlay, guarded so a second pass over the same
//! element is a no-op. Layer sizing uses the element's natural box; the
//! rescale path reapplies a uniform transform when the rendered box
//! changes.

use tracing::{debug, warn};

use feedlay_types::formatting::format_scale;
use feedlay_types::{Dimensions, OverlaySpec};

use crate::dom::{Document, NodeId};
use crate::preload::ImageCache;

use super::style::{WRAPPER_STYLE, layer_style, set_style_property};

/// Marker attribute set on a media element once overlays are applied.
/// Guards against double application; lives and dies with the element.
pub const MARKER_ATTR: &str = "data-overlay-applied";

/// Attribute identifying the positioning wrapper that holds the layers.
pub const CONTAINER_ATTR: &str = "data-overlay-container";

/// Attribute carrying a layer's index within the overlay list.
pub const LAYER_ATTR: &str = "data-overlay-layer";

/// Attribute recording whether a layer was served from the preload cache
/// or references its URL directly.
pub const LAYER_SOURCE_ATTR: &str = "data-overlay-source";

/// Host-page attribute the photo-container guard inspects.
const PHOTO_CONTAINER_ATTR: &str = "data-testid";

/// Layers stack above host content starting here; the overlay list index
/// is added on top.
const BASE_Z_INDEX: i32 = 10;

/// Record of one injection, kept by the session for resize tracking.
#[derive(Debug, Clone)]
pub struct AppliedOverlay {
    pub media: NodeId,
    pub layers: Vec<NodeId>,
    pub natural: Dimensions,
}

/// Apply every configured overlay to `media`.
///
/// Skips (returning `None`) when the element already carries the applied
/// marker, or when `photo_marker` is non-empty and no ancestor carries it
/// as its `data-testid`. An empty `photo_marker` disables the containment
/// guard for hosts without such a container.
///
/// Layers for overlay URLs whose preload attempt failed are created hidden
/// so a known-broken source never paints; everything else still applies.
pub fn inject_overlays(
    doc: &mut Document,
    media: NodeId,
    specs: &[OverlaySpec],
    cache: &ImageCache,
    photo_marker: &str,
) -> Option<AppliedOverlay> {
    if doc.has_attr(media, MARKER_ATTR) {
        debug!(?media, "overlays already applied, skipping");
        return None;
    }

    if !photo_marker.is_empty() && !in_photo_container(doc, media, photo_marker) {
        debug!(?media, "media element outside photo container, skipping");
        return None;
    }

    doc.set_attr(media, MARKER_ATTR, "true");
    set_style_property(doc, media, "position", "relative");

    let natural = natural_dimensions(doc, media);
    // Rendered box equals the natural box until a resize event says otherwise
    let scale = natural.scale_to(natural);

    let wrapper = doc.create_element_with("div", &[(CONTAINER_ATTR, "true"), ("style", WRAPPER_STYLE)]);
    doc.insert_after(media, wrapper);

    let mut layers = Vec::with_capacity(specs.len());
    for (index, spec) in specs.iter().enumerate() {
        let layer = build_layer(doc, spec, index, natural, scale, cache);
        doc.append(wrapper, layer);
        layers.push(layer);
    }

    Some(AppliedOverlay {
        media,
        layers,
        natural,
    })
}

/// Reapply the uniform scale transform after a layout reflow.
pub fn rescale_overlays(doc: &mut Document, applied: &AppliedOverlay, rendered: Dimensions) {
    let scale = applied.natural.scale_to(rendered);
    for &layer in &applied.layers {
        set_style_property(doc, layer, "transform", &format_scale(scale));
    }
}

fn build_layer(
    doc: &mut Document,
    spec: &OverlaySpec,
    index: usize,
    natural: Dimensions,
    scale: f32,
    cache: &ImageCache,
) -> NodeId {
    let layer = doc.create_element("img");
    doc.set_attr(layer, "src", &spec.url);
    doc.set_attr(layer, LAYER_ATTR, &index.to_string());

    let source = if cache.is_cached(&spec.url) {
        "cache"
    } else {
        "network"
    };
    doc.set_attr(layer, LAYER_SOURCE_ATTR, source);

    let z_index = BASE_Z_INDEX + index as i32;
    doc.set_attr(
        layer,
        "style",
        &layer_style(natural, spec.clamped_opacity(), z_index, scale),
    );

    if cache.is_failed(&spec.url) {
        warn!(url = %spec.url, "overlay image unavailable, hiding layer");
        set_style_property(doc, layer, "display", "none");
    }

    layer
}

fn in_photo_container(doc: &Document, media: NodeId, marker: &str) -> bool {
    doc.ancestors(media)
        .any(|ancestor| doc.attr(ancestor, PHOTO_CONTAINER_ATTR) == Some(marker))
}

/// Natural (intrinsic) dimensions from the element's width/height
/// attributes. An image that never declared them reports zero, matching a
/// not-yet-loaded image in the host environment.
fn natural_dimensions(doc: &Document, media: NodeId) -> Dimensions {
    let parse = |name: &str| {
        doc.attr(media, name)
            .and_then(|v| v.trim().parse::<f32>().ok())
            .unwrap_or(0.0)
    };
    Dimensions::new(parse("width"), parse("height"))
}
