//! Overlay injection
//!
//! This module turns a matched media element into a stack of overlay
//! layers:
//! - **Style**: style-attribute manipulation and the layer style template
//! - **Injector**: the guarded, idempotent layer-creation pass plus the
//!   rescale path driven by resize events
//!
//! Layers are plain nodes in the owned document tree. Tree operations
//! cannot fail here; the one failure mode that exists (an overlay image
//! whose preload attempt failed) degrades to a hidden layer and a
//! warning, never to an aborted pass.

mod injector;
mod style;


pub use injector::{
    AppliedOverlay, CONTAINER_ATTR, LAYER_ATTR, LAYER_SOURCE_ATTR, MARKER_ATTR, inject_overlays,
    rescale_overlays,
};
pub use style::{WRAPPER_STYLE, layer_style, set_style_property, style_property};
