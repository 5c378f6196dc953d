//! WASM bridge for vector widgets. Mounts a widget into a host element.
//!
//! Compiled via `wasm-pack build --target web`. The page creates one
//! `VectorWidget` per custom element, forwards pointer events and slider
//! `input` events to it, and calls `set_theme` when the color scheme
//! changes.

mod dom;

use dom::DomSurface;
use vw_editor::{InputEvent, WidgetConfig, WidgetEngine, WidgetKind};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

/// Host-element attributes forwarded to `WidgetConfig`.
const CONFIG_ATTRIBUTES: [&str; 2] = ["bounds", "clamp"];

/// One live widget bound to a DOM subtree.
#[wasm_bindgen]
pub struct VectorWidget {
    engine: WidgetEngine,
    surface: DomSurface,
}

#[wasm_bindgen]
impl VectorWidget {
    /// Build the widget named by `tag` (e.g. `vector-add`) inside `host`.
    #[wasm_bindgen(constructor)]
    pub fn new(host: HtmlElement, tag: &str, dark: bool) -> Result<VectorWidget, JsValue> {
        console_error_panic_hook_setup();

        let attrs: Vec<(&str, String)> = CONFIG_ATTRIBUTES
            .iter()
            .filter_map(|&name| host.get_attribute(name).map(|v| (name, v)))
            .collect();
        let mut config =
            WidgetConfig::from_attributes(attrs.iter().map(|(n, v)| (*n, v.as_str())))
                .map_err(|e| JsValue::from_str(&e))?;
        config.dark = dark;

        let engine = WidgetEngine::from_tag(tag, config).map_err(|e| JsValue::from_str(&e))?;
        let mut surface = DomSurface::new(&host, engine.scene.bounds, engine.scene.flip_y)?;
        engine.mount(&mut surface);
        log::debug!("mounted {tag}");

        Ok(Self { engine, surface })
    }

    // ─── Pointer input ───────────────────────────────────────────────────

    /// Returns `true` while any handle is being dragged.
    pub fn handle_pointer_down(&mut self, client_x: f64, client_y: f64) -> bool {
        self.dispatch(InputEvent::from_pointer_down(client_x, client_y))
    }

    pub fn handle_pointer_move(&mut self, client_x: f64, client_y: f64) -> bool {
        self.dispatch(InputEvent::from_pointer_move(client_x, client_y))
    }

    pub fn handle_pointer_up(&mut self, client_x: f64, client_y: f64) -> bool {
        self.dispatch(InputEvent::from_pointer_up(client_x, client_y))
    }

    fn dispatch(&mut self, event: InputEvent) -> bool {
        self.engine.dispatch(&event, &mut self.surface);
        self.engine.any_dragging()
    }

    // ─── Panel & theme ───────────────────────────────────────────────────

    /// Feed a new slider value from the range input.
    pub fn set_slider(&mut self, value: f64) {
        let redraws = self.engine.set_slider(value);
        self.engine.flush(&mut self.surface, &redraws);
    }

    /// Switch between light (`false`) and dark (`true`) colors.
    pub fn set_theme(&mut self, dark: bool) {
        let redraws = self.engine.set_theme(dark);
        self.engine.flush(&mut self.surface, &redraws);
    }

    /// Current readouts as a JSON array of `{key, label, text, tone}`.
    pub fn readouts_json(&self) -> String {
        serde_json::to_string(&self.engine.readouts()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Current slider value, or `undefined` for widgets without one.
    pub fn slider_value(&self) -> Option<f64> {
        self.engine.slider_value()
    }

    pub fn tag(&self) -> String {
        self.engine.kind.tag().to_string()
    }
}

// ─── Standalone functions (no widget needed) ─────────────────────────────

/// Every widget tag this module can build.
#[wasm_bindgen]
pub fn widget_tags() -> js_sys::Array {
    WidgetKind::ALL
        .iter()
        .map(|k| JsValue::from_str(k.tag()))
        .collect()
}

/// Render a widget in its initial state to a standalone SVG string.
#[wasm_bindgen]
pub fn render_static_svg(tag: &str, dark: bool) -> Result<String, JsValue> {
    let config = WidgetConfig {
        dark,
        ..WidgetConfig::default()
    };
    let engine = WidgetEngine::from_tag(tag, config).map_err(|e| JsValue::from_str(&e))?;
    Ok(engine.render_svg())
}

/// Set up a panic hook that logs to the browser console.
fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Vector widget panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
