//! Slider and info-panel elements.
//!
//! | Element | Id |
//! |---------|----|
//! | control row | `control-panel` |
//! | slider label / input / value | `slider-label`, `slider`, `slider-value` |
//! | info row | `info-panel` |
//! | readout box / value | `readout-KEY`, `readout-KEY-value` |

use crate::widgets::{Readout, SliderSpec};
use vw_core::Theme;
use vw_render::surface::num;
use vw_render::{Element, Layer, RenderSurface};

pub const SLIDER_ID: &str = "slider";
pub const SLIDER_VALUE_ID: &str = "slider-value";

fn readout_id(key: &str) -> String {
    format!("readout-{key}")
}

fn readout_style(readout: &Readout, theme: &Theme) -> String {
    format!(
        "color: {}; background: {}",
        theme.line(readout.tone).to_hex(),
        theme.secondary(readout.tone).to_hex()
    )
}

/// Insert the slider row (if any) and one box per readout.
pub fn mount_panel(
    surface: &mut dyn RenderSurface,
    theme: &Theme,
    readouts: &[Readout],
    slider: Option<(&SliderSpec, f64)>,
) {
    surface.clear(Layer::Panel);

    if let Some((spec, value)) = slider {
        surface.insert(
            Layer::Panel,
            Element::new("div", "control-panel").attr("class", "control-panel"),
        );
        surface.insert(
            Layer::Panel,
            Element::new("label", "slider-label")
                .parent("control-panel")
                .attr("for", SLIDER_ID)
                .text(format!("{}: ", spec.label)),
        );
        surface.insert(
            Layer::Panel,
            Element::new("input", SLIDER_ID)
                .parent("control-panel")
                .attr("type", "range")
                .attr("min", num(spec.min))
                .attr("max", num(spec.max))
                .attr("step", num(spec.step))
                .attr("value", num(value)),
        );
        surface.insert(
            Layer::Panel,
            Element::new("span", SLIDER_VALUE_ID)
                .parent("control-panel")
                .text(spec.format(value)),
        );
    }

    surface.insert(
        Layer::Panel,
        Element::new("div", "info-panel").attr("class", "info-panel"),
    );
    for readout in readouts {
        let id = readout_id(&readout.key);
        surface.insert(
            Layer::Panel,
            Element::new("div", id.clone())
                .parent("info-panel")
                .attr("class", format!("vector-info {}", readout.key))
                .attr("style", readout_style(readout, theme))
                .text(format!("{}: ", readout.label)),
        );
        surface.insert(
            Layer::Panel,
            Element::new("span", format!("{id}-value"))
                .parent(id)
                .text(readout.text.clone()),
        );
    }
}

/// Rewrite every readout value.
pub fn update_readouts(surface: &mut dyn RenderSurface, readouts: &[Readout]) {
    for readout in readouts {
        surface.set_text(&format!("{}-value", readout_id(&readout.key)), &readout.text);
    }
}

/// Sync the slider input and its value label.
pub fn update_slider(surface: &mut dyn RenderSurface, spec: &SliderSpec, value: f64) {
    surface.set_attribute(SLIDER_ID, "value", &num(value));
    surface.set_text(SLIDER_VALUE_ID, &spec.format(value));
}

/// Re-color the readout boxes.
pub fn apply_panel_theme(surface: &mut dyn RenderSurface, theme: &Theme, readouts: &[Readout]) {
    for readout in readouts {
        surface.set_attribute(&readout_id(&readout.key), "style", &readout_style(readout, theme));
    }
}
