//! Scene → surface elements.
//!
//! `mount_scene` inserts the full element tree once; afterwards the widget
//! engine calls `update_shape` / `update_handle` for exactly the primitives
//! a point notification reached, and `apply_theme` when the appearance
//! changes. Element ids are derived from shape and handle indices:
//!
//! | Element | Id |
//! |---------|----|
//! | vector / polygon group | `shape-N` |
//! | vector shaft, arrowhead | `shape-N-shaft`, `shape-N-head` |
//! | polygon outline | `shape-N-body` |
//! | label text | `shape-N-label` |
//! | handle hit circle | `handle-N` |
//! | decoration lines | `background`, `grid-N` |

use crate::surface::{Element, Layer, RenderSurface, num};
use kurbo::Point;
use vw_core::grid::{DECORATION_STROKE_WIDTH, LineRole, grid_lines};
use vw_core::shapes::{LabelGeometry, PolygonShape, VectorShape};
use vw_core::{HandleId, Scene, Shape, ShapeId, StrokeColor, Theme};

/// Label font size in user units.
pub const LABEL_FONT_SIZE: f64 = 0.64;

pub fn shape_element_id(id: ShapeId) -> String {
    format!("shape-{}", id.0)
}

pub fn handle_element_id(id: HandleId) -> String {
    format!("handle-{}", id.0)
}

/// Insert every decoration, primitive and handle. Existing decoration and
/// content elements are discarded first.
pub fn mount_scene(surface: &mut dyn RenderSurface, scene: &Scene, theme: &Theme) {
    draw_decorations(surface, scene, theme);
    surface.clear(Layer::Content);

    for (i, shape) in scene.shapes.iter().enumerate() {
        let id = ShapeId(i);
        match shape {
            Shape::Vector(v) => mount_vector(surface, id, v, theme),
            Shape::Polygon(p) => mount_polygon(surface, id, p, theme),
        }
        update_shape(surface, scene, id);
    }

    for (i, handle) in scene.handles.iter().enumerate() {
        let id = HandleId(i);
        surface.insert(
            Layer::Content,
            Element::new("circle", handle_element_id(id))
                .attr("class", "handle")
                .attr("r", num(handle.radius))
                .attr("fill", "transparent")
                .attr("stroke", "none")
                .attr("style", cursor_style(handle.interactive, false)),
        );
        update_handle(surface, scene, id, false);
    }
    log::debug!(
        "mounted scene: {} shapes, {} handles",
        scene.shapes.len(),
        scene.handles.len()
    );
}

/// Rebuild the background and grid in the current theme.
pub fn draw_decorations(surface: &mut dyn RenderSurface, scene: &Scene, theme: &Theme) {
    surface.clear(Layer::Decorations);
    let b = scene.bounds;
    surface.insert(
        Layer::Decorations,
        Element::new("rect", "background")
            .attr("x", num(b.x))
            .attr("y", num(b.y))
            .attr("width", num(b.width))
            .attr("height", num(b.height))
            .attr("fill", theme.background.to_hex()),
    );
    for (i, gl) in grid_lines(scene).iter().enumerate() {
        let (class, color) = match gl.role {
            LineRole::Grid => ("grid-line", theme.grid),
            LineRole::Axis => ("axis-line", theme.axes),
        };
        surface.insert(
            Layer::Decorations,
            Element::new("line", format!("grid-{i}"))
                .attr("class", class)
                .attr("x1", num(gl.line.p0.x))
                .attr("y1", num(gl.line.p0.y))
                .attr("x2", num(gl.line.p1.x))
                .attr("y2", num(gl.line.p1.y))
                .attr("stroke", color.to_hex())
                .attr("stroke-width", num(DECORATION_STROKE_WIDTH)),
        );
    }
}

/// Re-color decorations and every primitive. Geometry is untouched.
pub fn apply_theme(surface: &mut dyn RenderSurface, scene: &Scene, theme: &Theme) {
    draw_decorations(surface, scene, theme);
    for (i, shape) in scene.shapes.iter().enumerate() {
        let gid = shape_element_id(ShapeId(i));
        surface.set_attribute(&gid, "color", &theme.line(shape.tone()).to_hex());
        let stroke = match shape {
            Shape::Vector(v) => &v.stroke,
            Shape::Polygon(p) => &p.stroke,
        };
        if let StrokeColor::Tone(t) = stroke.color {
            let part = match shape {
                Shape::Vector(_) => "shaft",
                Shape::Polygon(_) => "body",
            };
            surface.set_attribute(&format!("{gid}-{part}"), "stroke", &theme.line(t).to_hex());
        }
    }
}

// ─── Vectors ─────────────────────────────────────────────────────────────

fn stroke_paint(color: StrokeColor, theme: &Theme) -> String {
    match color {
        StrokeColor::Inherit => "currentColor".to_string(),
        StrokeColor::Tone(t) => theme.line(t).to_hex(),
    }
}

fn mount_vector(surface: &mut dyn RenderSurface, id: ShapeId, v: &VectorShape, theme: &Theme) {
    let gid = shape_element_id(id);
    surface.insert(
        Layer::Content,
        Element::new("g", gid.clone())
            .attr("class", format!("vector {}", v.key))
            .attr("color", theme.line(v.tone).to_hex()),
    );
    surface.insert(
        Layer::Content,
        Element::new("line", format!("{gid}-shaft"))
            .parent(gid.clone())
            .attr("stroke", stroke_paint(v.stroke.color, theme))
            .attr("stroke-width", num(v.stroke.width))
            .attr("stroke-dasharray", v.stroke.dash_array()),
    );
    if v.marker.is_some() {
        surface.insert(
            Layer::Content,
            Element::new("polygon", format!("{gid}-head"))
                .parent(gid.clone())
                .attr("fill", "currentColor"),
        );
    }
    if let Some(label) = &v.label {
        surface.insert(Layer::Content, label_element(&gid, &label.text));
    }
}

fn mount_polygon(surface: &mut dyn RenderSurface, id: ShapeId, p: &PolygonShape, theme: &Theme) {
    let gid = shape_element_id(id);
    surface.insert(
        Layer::Content,
        Element::new("g", gid.clone())
            .attr("class", format!("polygon {}", p.key))
            .attr("color", theme.line(p.tone).to_hex()),
    );
    surface.insert(
        Layer::Content,
        Element::new("polygon", format!("{gid}-body"))
            .parent(gid.clone())
            .attr("fill", "currentColor")
            .attr("fill-opacity", p.fill_opacity.to_string())
            .attr("stroke", stroke_paint(p.stroke.color, theme))
            .attr("stroke-opacity", p.stroke_opacity.to_string())
            .attr("stroke-width", num(p.stroke.width))
            .attr("stroke-dasharray", p.stroke.dash_array()),
    );
    if let Some(label) = &p.label {
        surface.insert(Layer::Content, label_element(&gid, &label.text));
    }
}

fn label_element(gid: &str, text: &str) -> Element {
    Element::new("text", format!("{gid}-label"))
        .parent(gid)
        .attr("class", "label")
        .attr("fill", "currentColor")
        .attr("font-size", num(LABEL_FONT_SIZE))
        .attr("text-anchor", "middle")
        .attr("dominant-baseline", "middle")
        .text(text)
}

/// Patch one primitive's geometry attributes from the current points.
pub fn update_shape(surface: &mut dyn RenderSurface, scene: &Scene, id: ShapeId) {
    let Some(shape) = scene.shape(id) else {
        log::warn!("update for unknown shape {}", id.0);
        return;
    };
    let gid = shape_element_id(id);
    match shape {
        Shape::Vector(v) => {
            let Some(geo) = v.geometry(&scene.points) else {
                return;
            };
            let shaft = format!("{gid}-shaft");
            surface.set_attribute(&shaft, "x1", &num(geo.shaft.p0.x));
            surface.set_attribute(&shaft, "y1", &num(geo.shaft.p0.y));
            surface.set_attribute(&shaft, "x2", &num(geo.shaft.p1.x));
            surface.set_attribute(&shaft, "y2", &num(geo.shaft.p1.y));
            if v.marker.is_some() {
                let head = format!("{gid}-head");
                match geo.head {
                    Some(corners) => {
                        surface.set_attribute(&head, "points", &points_attr(&corners));
                        surface.set_attribute(&head, "visibility", "visible");
                    }
                    None => surface.set_attribute(&head, "visibility", "hidden"),
                }
            }
            if let Some(label) = geo.label {
                place_label(surface, &gid, label);
            }
        }
        Shape::Polygon(p) => {
            let Some(geo) = p.geometry(&scene.points) else {
                return;
            };
            surface.set_attribute(&format!("{gid}-body"), "points", &points_attr(&geo.points));
            if let Some(label) = geo.label {
                place_label(surface, &gid, label);
            }
        }
    }
}

fn place_label(surface: &mut dyn RenderSurface, gid: &str, label: LabelGeometry) {
    let id = format!("{gid}-label");
    surface.set_attribute(&id, "x", &num(label.anchor.x));
    surface.set_attribute(&id, "y", &num(label.anchor.y));
    let transform = if label.mirrored { "scale(1 -1)" } else { "none" };
    surface.set_attribute(&id, "transform", transform);
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", num(p.x), num(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

// ─── Handles ─────────────────────────────────────────────────────────────

fn cursor_style(interactive: bool, dragging: bool) -> &'static str {
    match (interactive, dragging) {
        (false, _) => "cursor: auto",
        (true, false) => "cursor: grab",
        (true, true) => "cursor: grabbing",
    }
}

/// Move a handle's hit circle to its point and refresh its cursor.
pub fn update_handle(surface: &mut dyn RenderSurface, scene: &Scene, id: HandleId, dragging: bool) {
    let Some(handle) = scene.handle(id) else {
        log::warn!("update for unknown handle {}", id.0);
        return;
    };
    let Some(center) = handle.center(&scene.points) else {
        return;
    };
    let hid = handle_element_id(id);
    surface.set_attribute(&hid, "cx", &num(center.x));
    surface.set_attribute(&hid, "cy", &num(center.y));
    surface.set_attribute(&hid, "style", cursor_style(handle.interactive, dragging));
}
