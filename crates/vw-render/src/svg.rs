//! In-memory SVG surface.
//!
//! Keeps the retained element tree in plain Rust so a widget can be
//! mounted, dragged and re-themed without a browser, then serialized to a
//! standalone SVG string. The panel layer is tracked (readouts can be
//! inspected) but not serialized.

use crate::surface::{Element, Layer, RenderSurface, content_transform, viewport_transform};
use kurbo::{Affine, Point};
use std::collections::HashMap;
use vw_core::{Bounds, Scene};

/// Default pixel width used for the exported `width` attribute.
pub const DEFAULT_PIXEL_WIDTH: f64 = 640.0;

#[derive(Debug, Clone)]
pub struct SvgDocument {
    bounds: Bounds,
    flip_y: bool,
    pixel_width: f64,
    /// Content-layer local → screen transform.
    screen_ctm: Affine,
    elements: Vec<(Layer, Element)>,
    index: HashMap<String, usize>,
}

impl SvgDocument {
    #[must_use]
    pub fn new(bounds: Bounds, flip_y: bool, pixel_width: f64) -> Self {
        Self {
            bounds,
            flip_y,
            pixel_width,
            screen_ctm: viewport_transform(&bounds, pixel_width) * content_transform(flip_y),
            elements: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// An empty document framed for `scene`.
    #[must_use]
    pub fn for_scene(scene: &Scene) -> Self {
        Self::new(scene.bounds, scene.flip_y, DEFAULT_PIXEL_WIDTH)
    }

    /// Override the content layer's screen transform (e.g. page scroll).
    pub fn set_screen_ctm(&mut self, ctm: Affine) {
        self.screen_ctm = ctm;
    }

    pub fn screen_ctm(&self) -> Affine {
        self.screen_ctm
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.index.get(id).map(|&i| &self.elements[i].1)
    }

    pub fn attribute(&self, id: &str, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.get(name))
    }

    pub fn text_of(&self, id: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.text.as_deref())
    }

    /// Number of elements in a layer.
    pub fn count(&self, layer: Layer) -> usize {
        self.elements.iter().filter(|(l, _)| *l == layer).count()
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (i, (_, el)) in self.elements.iter().enumerate() {
            self.index.insert(el.id.clone(), i);
        }
    }

    // ─── Serialization ───────────────────────────────────────────────────

    /// Serialize the decoration and content layers as a standalone SVG.
    pub fn to_svg_string(&self) -> String {
        let b = &self.bounds;
        let height = self.pixel_width * b.height / b.width;
        let mut svg = String::new();
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"{}\">\n",
            self.pixel_width,
            height,
            b.view_box()
        ));
        svg.push_str("<style>\n");
        svg.push_str("  text { font-family: Inter, system-ui, sans-serif; font-weight: 500; user-select: none; }\n");
        svg.push_str("</style>\n");

        svg.push_str("<g id=\"decorations\">\n");
        self.write_children(&mut svg, Layer::Decorations, None, 1);
        svg.push_str("</g>\n");

        if self.flip_y {
            svg.push_str("<g id=\"content\" transform=\"scale(1 -1)\">\n");
        } else {
            svg.push_str("<g id=\"content\">\n");
        }
        self.write_children(&mut svg, Layer::Content, None, 1);
        svg.push_str("</g>\n</svg>\n");
        svg
    }

    fn write_children(&self, out: &mut String, layer: Layer, parent: Option<&str>, depth: usize) {
        for (l, el) in &self.elements {
            if *l != layer || el.parent.as_deref() != parent {
                continue;
            }
            let indent = "  ".repeat(depth);
            out.push_str(&format!("{indent}<{} id=\"{}\"", el.tag, escape(&el.id)));
            for (name, value) in &el.attrs {
                out.push_str(&format!(" {name}=\"{}\"", escape(value)));
            }

            let has_children = self
                .elements
                .iter()
                .any(|(cl, c)| cl == l && c.parent.as_deref() == Some(el.id.as_str()));
            match (&el.text, has_children) {
                (None, false) => out.push_str(" />\n"),
                (Some(text), false) => {
                    out.push_str(&format!(">{}</{}>\n", escape(text), el.tag));
                }
                (text, true) => {
                    out.push_str(">\n");
                    if let Some(text) = text {
                        out.push_str(&format!("{indent}  {}\n", escape(text)));
                    }
                    self.write_children(out, layer, Some(&el.id), depth + 1);
                    out.push_str(&format!("{indent}</{}>\n", el.tag));
                }
            }
        }
    }
}

impl RenderSurface for SvgDocument {
    fn insert(&mut self, layer: Layer, element: Element) {
        if let Some(&i) = self.index.get(&element.id) {
            log::warn!("element #{} inserted twice; replacing", element.id);
            self.elements[i] = (layer, element);
            return;
        }
        self.index.insert(element.id.clone(), self.elements.len());
        self.elements.push((layer, element));
    }

    fn clear(&mut self, layer: Layer) {
        self.elements.retain(|(l, _)| *l != layer);
        self.rebuild_index();
    }

    fn set_attribute(&mut self, id: &str, name: &str, value: &str) {
        let Some(&i) = self.index.get(id) else {
            log::warn!("set_attribute on unknown element #{id}");
            return;
        };
        self.elements[i].1.set(name, value);
    }

    fn set_text(&mut self, id: &str, text: &str) {
        match self.index.get(id) {
            Some(&i) => self.elements[i].1.text = Some(text.to_string()),
            None => log::warn!("set_text on unknown element #{id}"),
        }
    }

    fn screen_to_local(&self, x: f64, y: f64) -> Option<Point> {
        if !(x.is_finite() && y.is_finite()) {
            return None;
        }
        if self.screen_ctm.determinant().abs() < f64::EPSILON {
            return None;
        }
        Some(self.screen_ctm.inverse() * Point::new(x, y))
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
