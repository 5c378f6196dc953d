//! Scene → Vello drawing commands.
//!
//! Paints a widget scene without a DOM: background, grid, then every
//! primitive in insertion order. Used for native previews; the retained
//! SVG surfaces remain the interactive path.

use kurbo::{Affine, BezPath, Rect, Stroke as KurboStroke};
use peniko::{Color, Fill};
use vello::Scene as VelloScene;
use vw_core::grid::{DECORATION_STROKE_WIDTH, LineRole, grid_lines};
use vw_core::shapes::{PolygonShape, VectorShape};
use vw_core::{Color as WidgetColor, Scene, Shape, Stroke, Theme};

/// Paint `scene` into `out`. `transform` maps the scene's `viewBox` to
/// pixels (see `viewport_transform`).
///
/// Text labels are not painted: this painter has no font context, so only
/// SVG surfaces show them. Call once per frame with a freshly-cleared
/// Vello scene.
pub fn paint_scene(out: &mut VelloScene, scene: &Scene, theme: &Theme, transform: Affine) {
    paint_decorations(out, scene, theme, transform);

    let content = transform * crate::surface::content_transform(scene.flip_y);
    for shape in &scene.shapes {
        match shape {
            Shape::Vector(v) => paint_vector(out, scene, v, theme, content),
            Shape::Polygon(p) => paint_polygon(out, scene, p, theme, content),
        }
    }
}

fn paint_decorations(out: &mut VelloScene, scene: &Scene, theme: &Theme, transform: Affine) {
    let b = scene.bounds;
    let rect = Rect::new(b.x, b.y, b.x + b.width, b.y + b.height);
    out.fill(Fill::NonZero, transform, to_color(theme.background, 1.0), None, &rect);

    let stroke = KurboStroke::new(DECORATION_STROKE_WIDTH);
    for gl in grid_lines(scene) {
        let color = match gl.role {
            LineRole::Grid => theme.grid,
            LineRole::Axis => theme.axes,
        };
        out.stroke(&stroke, transform, to_color(color, 1.0), None, &gl.line);
    }
}

// ─── Primitive painters ──────────────────────────────────────────────────────

fn paint_vector(out: &mut VelloScene, scene: &Scene, v: &VectorShape, theme: &Theme, t: Affine) {
    let Some(geo) = v.geometry(&scene.points) else {
        return;
    };
    let line_color = to_color(theme.line(v.stroke.resolve(v.tone)), 1.0);
    stroke_shape(out, &geo.shaft, &v.stroke, line_color, t);

    if let Some([left, tip, right]) = geo.head {
        let mut head = BezPath::new();
        head.move_to(left);
        head.line_to(tip);
        head.line_to(right);
        head.close_path();
        fill_shape(out, &head, to_color(theme.line(v.tone), 1.0), t);
    }

    if let (Some(label), Some(pos)) = (&v.label, geo.label) {
        log::trace!(
            "label {} {:?} at ({}, {}) not painted",
            v.key,
            label.text,
            pos.anchor.x,
            pos.anchor.y
        );
    }
}

fn paint_polygon(out: &mut VelloScene, scene: &Scene, p: &PolygonShape, theme: &Theme, t: Affine) {
    let Some(geo) = p.geometry(&scene.points) else {
        return;
    };
    let mut path = BezPath::new();
    let mut pts = geo.points.iter();
    let Some(&first) = pts.next() else {
        return;
    };
    path.move_to(first);
    for &pt in pts {
        path.line_to(pt);
    }
    path.close_path();

    fill_shape(out, &path, to_color(theme.line(p.tone), p.fill_opacity), t);
    let stroke_color = to_color(theme.line(p.stroke.resolve(p.tone)), p.stroke_opacity);
    stroke_shape(out, &path, &p.stroke, stroke_color, t);
}

// ─── Fill and stroke ─────────────────────────────────────────────────────────

fn fill_shape<S: kurbo::Shape>(out: &mut VelloScene, shape: &S, color: Color, t: Affine) {
    out.fill(Fill::NonZero, t, color, None, shape);
}

fn stroke_shape<S: kurbo::Shape>(out: &mut VelloScene, shape: &S, stroke: &Stroke, color: Color, t: Affine) {
    let mut vello_stroke = KurboStroke::new(stroke.width);
    if let Some(dash) = &stroke.dash {
        vello_stroke = vello_stroke.with_dashes(0.0, dash.iter().copied());
    }
    out.stroke(&vello_stroke, t, color, None, shape);
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn to_color(c: WidgetColor, opacity: f32) -> Color {
    let [r, g, b, a] = c.to_rgba8();
    let alpha = opacity.clamp(0.0, 1.0);
    Color::from_rgba8(r, g, b, (a as f32 * alpha) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::viewport_transform;
    use vw_core::{Bounds, GridKind, Label, Tone};

    #[test]
    fn paints_background_grid_and_shapes() {
        let mut s = Scene::new(Bounds::new(-4.0, -4.0, 8.0, 8.0), GridKind::Cartesian, true);
        let o = s.add_point("paint_o", 0.0, 0.0);
        let a = s.add_point("paint_a", 3.0, 1.0);
        let b = s.add_point("paint_b", 1.0, 3.0);
        s.add_shape(VectorShape::new("a", o, a, Tone::Red).label("A", 0.5));
        s.add_shape(
            VectorShape::new("aux", a, b, Tone::Grey).stroke(Stroke::dashed(0.15, 0.3, 0.1)),
        );
        s.add_shape(PolygonShape::new("p", &[o, a, b], Tone::Yellow).label(Label::new("P", 0.0)));

        let mut out = VelloScene::new();
        let t = viewport_transform(&s.bounds, 320.0);
        paint_scene(&mut out, &s, &Theme::dark(), t);
        assert!(!out.encoding().is_empty());
    }

    #[test]
    fn labels_add_no_paths() {
        let build = |labelled: bool| {
            let mut s = Scene::new(Bounds::new(-4.0, -4.0, 8.0, 8.0), GridKind::Cartesian, true);
            let o = s.add_point("paint_label_o", 0.0, 0.0);
            let a = s.add_point("paint_label_a", 3.0, 1.0);
            let v = VectorShape::new("a", o, a, Tone::Red);
            s.add_shape(if labelled { v.label("A", 0.5) } else { v });
            let mut out = VelloScene::new();
            paint_scene(&mut out, &s, &Theme::light(), Affine::IDENTITY);
            out.encoding().n_paths
        };
        assert_eq!(build(true), build(false));
    }
}
