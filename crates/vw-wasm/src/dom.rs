//! Browser DOM render surface.
//!
//! Builds the widget's `<svg>` (decorations and content groups) and an
//! HTML panel container inside the host element, then patches attributes
//! in place as the engine reports redraws.

use kurbo::{Affine, Point};
use std::collections::HashMap;
use vw_core::Bounds;
use vw_render::{Element as SurfaceElement, Layer, RenderSurface};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, SvgGraphicsElement};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

pub struct DomSurface {
    document: Document,
    decorations: Element,
    content: Element,
    panel: Element,
    elements: HashMap<String, (Layer, Element)>,
}

impl DomSurface {
    /// Create the surface skeleton inside `host`.
    pub fn new(host: &HtmlElement, bounds: Bounds, flip_y: bool) -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("No document available"))?;

        let svg = document.create_element_ns(Some(SVG_NS), "svg")?;
        svg.set_attribute("viewBox", &bounds.view_box())?;
        svg.set_attribute("class", "vector-widget")?;

        let decorations = document.create_element_ns(Some(SVG_NS), "g")?;
        decorations.set_attribute("class", "decorations")?;
        let content = document.create_element_ns(Some(SVG_NS), "g")?;
        content.set_attribute("class", "content")?;
        if flip_y {
            content.set_attribute("transform", "scale(1 -1)")?;
        }
        svg.append_child(&decorations)?;
        svg.append_child(&content)?;

        let panel = document.create_element("div")?;
        panel.set_attribute("class", "panels")?;

        host.append_child(&svg)?;
        host.append_child(&panel)?;

        Ok(Self {
            document,
            decorations,
            content,
            panel,
            elements: HashMap::new(),
        })
    }

    fn root(&self, layer: Layer) -> &Element {
        match layer {
            Layer::Decorations => &self.decorations,
            Layer::Content => &self.content,
            Layer::Panel => &self.panel,
        }
    }

    fn build(&self, layer: Layer, el: &SurfaceElement) -> Result<Element, JsValue> {
        let node = match layer {
            Layer::Panel => self.document.create_element(el.tag)?,
            _ => self.document.create_element_ns(Some(SVG_NS), el.tag)?,
        };
        node.set_attribute("id", &el.id)?;
        for (name, value) in &el.attrs {
            node.set_attribute(name, value)?;
        }
        if let Some(text) = &el.text {
            node.set_text_content(Some(text));
        }
        let parent = el
            .parent
            .as_deref()
            .and_then(|p| self.elements.get(p))
            .map(|(_, e)| e)
            .unwrap_or_else(|| self.root(layer));
        parent.append_child(&node)?;
        Ok(node)
    }
}

impl RenderSurface for DomSurface {
    fn insert(&mut self, layer: Layer, element: SurfaceElement) {
        if let Some((_, old)) = self.elements.remove(&element.id) {
            log::warn!("element #{} inserted twice; replacing", element.id);
            old.remove();
        }
        match self.build(layer, &element) {
            Ok(node) => {
                self.elements.insert(element.id, (layer, node));
            }
            Err(e) => log::warn!("failed to insert #{}: {e:?}", element.id),
        }
    }

    fn clear(&mut self, layer: Layer) {
        self.root(layer).set_inner_html("");
        self.elements.retain(|_, (l, _)| *l != layer);
    }

    fn set_attribute(&mut self, id: &str, name: &str, value: &str) {
        let Some((_, el)) = self.elements.get(id) else {
            log::warn!("set_attribute on unknown element #{id}");
            return;
        };
        if let Err(e) = el.set_attribute(name, value) {
            log::warn!("set_attribute #{id} {name}: {e:?}");
        }
    }

    fn set_text(&mut self, id: &str, text: &str) {
        match self.elements.get(id) {
            Some((_, el)) => el.set_text_content(Some(text)),
            None => log::warn!("set_text on unknown element #{id}"),
        }
    }

    fn screen_to_local(&self, x: f64, y: f64) -> Option<Point> {
        if !(x.is_finite() && y.is_finite()) {
            return None;
        }
        let ctm = self
            .content
            .dyn_ref::<SvgGraphicsElement>()?
            .get_screen_ctm()?;
        let m = Affine::new([
            f64::from(ctm.a()),
            f64::from(ctm.b()),
            f64::from(ctm.c()),
            f64::from(ctm.d()),
            f64::from(ctm.e()),
            f64::from(ctm.f()),
        ]);
        if m.determinant().abs() < f64::EPSILON {
            return None;
        }
        Some(m.inverse() * Point::new(x, y))
    }
}
