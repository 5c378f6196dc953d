//! Render-surface contract.
//!
//! A surface is anything that can hold a retained tree of SVG-like
//! elements and patch their attributes in place: the browser DOM in the
//! wasm bridge, or the in-memory `SvgDocument` used for static export and
//! tests. Widgets never rebuild the tree on a drag; they patch it.

use kurbo::{Affine, Point};
use vw_core::Bounds;

/// Top-level containers every surface provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Background, grid and axes, in the raw `viewBox` frame.
    Decorations,
    /// Primitives and handles, inside the y-flip transform when enabled.
    Content,
    /// Slider and readouts, outside the drawing.
    Panel,
}

/// One element to insert: tag, id, optional parent, attributes, text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub id: String,
    pub tag: &'static str,
    /// Id of an already-inserted element in the same layer; `None` appends
    /// to the layer root.
    pub parent: Option<String>,
    pub attrs: Vec<(String, String)>,
    pub text: Option<String>,
}

impl Element {
    pub fn new(tag: &'static str, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    #[must_use]
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.push((name.to_string(), value.into()));
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set or replace an attribute.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }
}

/// The operations widgets need from a backend.
pub trait RenderSurface {
    /// Append an element to `layer` (or to its `parent` within the layer).
    fn insert(&mut self, layer: Layer, element: Element);

    /// Remove every element in `layer`.
    fn clear(&mut self, layer: Layer);

    /// Patch one attribute of an existing element. Unknown ids are ignored.
    fn set_attribute(&mut self, id: &str, name: &str, value: &str);

    /// Replace the text content of an existing element.
    fn set_text(&mut self, id: &str, text: &str);

    /// Map a screen-space point into the content layer's local frame using
    /// the inverse of its current screen transform. `None` when the
    /// transform is unavailable or singular, or the input is not finite.
    fn screen_to_local(&self, x: f64, y: f64) -> Option<Point>;
}

/// `viewBox` → pixel transform for a surface `pixel_width` pixels wide,
/// preserving the aspect ratio.
pub fn viewport_transform(bounds: &Bounds, pixel_width: f64) -> Affine {
    let scale = pixel_width / bounds.width;
    Affine::scale(scale) * Affine::translate((-bounds.x, -bounds.y))
}

/// The extra transform applied to the content layer.
pub fn content_transform(flip_y: bool) -> Affine {
    if flip_y { Affine::FLIP_Y } else { Affine::IDENTITY }
}

/// Attribute-friendly number: rounded to 4 decimals, no trailing zeros,
/// non-finite values written as `0`.
pub fn num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let r = (v * 10_000.0).round() / 10_000.0;
    if r == 0.0 { "0".to_string() } else { r.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn element_builder_and_patch() {
        let mut el = Element::new("line", "shape-0-shaft")
            .parent("shape-0")
            .attr("x1", "0");
        assert_eq!(el.get("x1"), Some("0"));
        el.set("x1", "2.5");
        el.set("y1", "1");
        assert_eq!(el.get("x1"), Some("2.5"));
        assert_eq!(el.attrs.len(), 2);
        assert_eq!(el.parent.as_deref(), Some("shape-0"));
    }

    #[test]
    fn viewport_maps_bounds_to_pixels() {
        let t = viewport_transform(&Bounds::new(-10.0, -8.0, 20.0, 16.0), 400.0);
        assert_eq!(t * Point::new(-10.0, -8.0), Point::new(0.0, 0.0));
        assert_eq!(t * Point::new(10.0, 8.0), Point::new(400.0, 320.0));
    }

    #[test]
    fn number_formatting() {
        assert_eq!(num(4.500000000000001), "4.5");
        assert_eq!(num(-8.0), "-8");
        assert_eq!(num(-0.00001), "0");
        assert_eq!(num(f64::NAN), "0");
        assert_eq!(num(0.471238898), "0.4712");
    }
}
