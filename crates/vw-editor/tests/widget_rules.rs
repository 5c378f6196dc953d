//! Integration tests: widget engine (vw-editor ↔ vw-core ↔ vw-render).
//!
//! Drives each widget through its derived-value rule and checks the
//! readouts, then runs a full pointer drag and a theme switch against the
//! in-memory SVG surface.

use pretty_assertions::assert_eq;
use vw_core::{HandleId, Point, Theme};
use vw_editor::engine::{Redraw, WidgetMutation};
use vw_editor::{InputEvent, WidgetConfig, WidgetEngine, WidgetKind};
use vw_render::{Layer, SvgDocument};

fn engine(kind: WidgetKind) -> WidgetEngine {
    WidgetEngine::new(kind, WidgetConfig::default())
}

fn close(p: Point, x: f64, y: f64) -> bool {
    (p.x - x).abs() < 1e-9 && (p.y - y).abs() < 1e-9
}

fn readout(engine: &WidgetEngine, key: &str) -> String {
    engine
        .readouts()
        .into_iter()
        .find(|r| r.key == key)
        .map(|r| r.text)
        .unwrap_or_default()
}

fn move_point(engine: &mut WidgetEngine, id: &str, x: f64, y: f64) -> Vec<Redraw> {
    let point = engine.scene.index_of(id).unwrap();
    engine.apply(WidgetMutation::MovePoint { point, x, y })
}

// ─── Derived rules ──────────────────────────────────────────────────────

#[test]
fn add_sums_inputs() {
    let mut e = engine(WidgetKind::Add);
    assert_eq!(e.scene.point("sum"), Some(Point::new(5.0, 7.0)));
    assert_eq!(readout(&e, "sum"), "(5.0, 7.0)");

    move_point(&mut e, "b", 1.0, -2.5);
    assert_eq!(e.scene.point("sum"), Some(Point::new(10.0, 0.5)));
    assert_eq!(readout(&e, "b"), "(1.0, -2.5)");
    assert_eq!(readout(&e, "sum"), "(10.0, 0.5)");
}

#[test]
fn subtract_is_b_minus_a() {
    let mut e = engine(WidgetKind::Subtract);
    assert_eq!(e.scene.point("diff"), Some(Point::new(-9.0, 1.0)));

    move_point(&mut e, "a", -4.0, 4.0);
    assert_eq!(e.scene.point("diff"), Some(Point::new(0.0, 0.0)));
    assert_eq!(readout(&e, "diff"), "(0.0, 0.0)");
}

#[test]
fn scale_follows_slider_and_base() {
    let mut e = engine(WidgetKind::Scale);
    assert_eq!(e.slider_value(), Some(1.5));
    assert_eq!(e.scene.point("scaled"), Some(Point::new(4.5, 4.5)));

    let redraws = e.set_slider(-2.0);
    assert_eq!(redraws.last(), Some(&Redraw::Slider));
    assert_eq!(e.scene.point("scaled"), Some(Point::new(-6.0, -6.0)));
    assert_eq!(readout(&e, "scaled"), "(-6.0, -6.0)");

    move_point(&mut e, "base", 1.0, 2.0);
    assert_eq!(e.scene.point("scaled"), Some(Point::new(-2.0, -4.0)));

    e.set_slider(7.0);
    assert_eq!(e.slider_value(), Some(2.0));
}

#[test]
fn magnitude_drops_foot_to_axis() {
    let mut e = engine(WidgetKind::Magnitude);
    assert_eq!(readout(&e, "length"), "7.1");

    move_point(&mut e, "v", 3.0, 4.0);
    assert_eq!(e.scene.point("foot"), Some(Point::new(3.0, 0.0)));
    assert_eq!(readout(&e, "length"), "5.0");
    assert_eq!(readout(&e, "a"), "(3.0, 4.0)");
}

#[test]
fn dot_projects_b_onto_a() {
    let mut e = engine(WidgetKind::Dot);
    assert_eq!(readout(&e, "dot"), "12.0");
    assert!(close(e.scene.point("proj").unwrap(), 2.0, 0.0));

    move_point(&mut e, "a", 0.0, 0.0);
    assert_eq!(e.scene.point("proj"), Some(Point::ZERO));
    assert_eq!(readout(&e, "dot"), "0.0");
}

#[test]
fn cross_reads_logical_coordinates() {
    let e = engine(WidgetKind::Cross);
    assert_eq!(readout(&e, "a"), "(0.0, 6.0)");
    assert_eq!(readout(&e, "b"), "(6.0, 0.0)");
    assert_eq!(readout(&e, "cross"), "36.0");

    // -(-36) × 0.2 up the z-axis, which is -y on screen.
    let cross = e.scene.point("cross").unwrap();
    assert!(close(cross, 0.0, -7.2));

    let a = e.scene.point("a").unwrap();
    let b = e.scene.point("b").unwrap();
    assert!(close(e.scene.point("tip").unwrap(), a.x + b.x, a.y + b.y));
}

#[test]
fn reflect_mirrors_v_across_the_surface() {
    let mut e = engine(WidgetKind::Reflect);
    let v = e.scene.point("v").unwrap();
    let n = e.scene.point("n").unwrap();
    let r = e.scene.point("r").unwrap();
    let lhs = r.x * n.x + r.y * n.y;
    let rhs = -((0.0 - v.x) * n.x + (0.0 - v.y) * n.y);
    assert!((lhs - rhs).abs() < 1e-9);
    assert_eq!(readout(&e, "r"), "(4.0, 4.0)");

    e.set_slider(45.0);
    assert!(close(e.scene.point("r").unwrap(), -4.0, 4.0));
    assert!(close(e.scene.point("m1").unwrap(), 6.0 / 2f64.sqrt(), 6.0 / 2f64.sqrt()));
    assert_eq!(readout(&e, "r"), "(-4.0, 4.0)");
}

#[test]
fn reflect_slider_is_absolute_not_cumulative() {
    let mut e = engine(WidgetKind::Reflect);
    e.set_slider(20.0);
    e.set_slider(20.0);
    let m0 = e.scene.point("m0").unwrap();
    let expected = (-20f64).to_radians();
    assert!((m0.y.atan2(-m0.x) - expected).abs() < 1e-9);
}

// ─── Surface round trip ─────────────────────────────────────────────────

#[test]
fn pointer_drag_patches_surface() {
    let mut e = engine(WidgetKind::Add);
    let mut doc = SvgDocument::for_scene(&e.scene);
    e.mount(&mut doc);
    assert_eq!(doc.text_of("readout-sum-value"), Some("(5.0, 7.0)"));

    // 640px over 20 units: A(9, 3) sits at (608, 160) on screen.
    e.dispatch(&InputEvent::from_pointer_down(608.0, 160.0), &mut doc);
    assert!(e.is_dragging(HandleId(0)));
    assert_eq!(doc.attribute("handle-0", "style"), Some("cursor: grabbing"));

    e.dispatch(&InputEvent::from_pointer_move(384.0, 192.0), &mut doc);
    assert_eq!(e.scene.point("a"), Some(Point::new(2.0, 2.0)));
    assert_eq!(doc.attribute("handle-0", "cx"), Some("2"));
    assert_eq!(doc.text_of("readout-a-value"), Some("(2.0, 2.0)"));
    assert_eq!(doc.text_of("readout-sum-value"), Some("(-2.0, 6.0)"));
    assert_eq!(doc.attribute("shape-4-label", "transform"), Some("scale(1 -1)"));

    e.dispatch(&InputEvent::from_pointer_up(0.0, 0.0), &mut doc);
    assert!(!e.is_dragging(HandleId(0)));
    assert_eq!(doc.attribute("handle-0", "style"), Some("cursor: grab"));

    // Moves after release change nothing.
    e.dispatch(&InputEvent::from_pointer_move(0.0, 0.0), &mut doc);
    assert_eq!(e.scene.point("a"), Some(Point::new(2.0, 2.0)));
}

#[test]
fn non_finite_drag_leaves_point_alone() {
    let mut e = engine(WidgetKind::Add);
    let mut doc = SvgDocument::for_scene(&e.scene);
    e.mount(&mut doc);
    e.dispatch(&InputEvent::from_pointer_down(608.0, 160.0), &mut doc);
    assert!(e.is_dragging(HandleId(0)));

    e.dispatch(&InputEvent::from_pointer_move(f64::NAN, 100.0), &mut doc);
    assert_eq!(e.scene.point("a"), Some(Point::new(9.0, 3.0)));
    assert_eq!(doc.text_of("readout-a-value"), Some("(9.0, 3.0)"));

    let redraws = e.apply(WidgetMutation::DragHandle {
        handle: HandleId(0),
        x: f64::INFINITY,
        y: 0.0,
    });
    assert!(redraws.is_empty());
    assert_eq!(e.scene.point("a"), Some(Point::new(9.0, 3.0)));
    assert!(move_point(&mut e, "b", f64::NAN, 1.0).is_empty());
    assert_eq!(e.scene.point("b"), Some(Point::new(-4.0, 4.0)));
}

#[test]
fn moving_a_derived_point_refreshes_its_readout() {
    let mut e = engine(WidgetKind::Add);
    let mut doc = SvgDocument::for_scene(&e.scene);
    e.mount(&mut doc);

    let redraws = move_point(&mut e, "sum", 1.0, 1.0);
    assert_eq!(redraws.last(), Some(&Redraw::Readouts));
    e.flush(&mut doc, &redraws);
    assert_eq!(doc.text_of("readout-sum-value"), Some("(1.0, 1.0)"));
}

#[test]
fn pointer_down_on_empty_space_does_not_drag() {
    let mut e = engine(WidgetKind::Dot);
    let mut doc = SvgDocument::for_scene(&e.scene);
    e.mount(&mut doc);
    e.dispatch(&InputEvent::from_pointer_down(10.0, 10.0), &mut doc);
    e.dispatch(&InputEvent::from_pointer_move(300.0, 300.0), &mut doc);
    assert_eq!(e.scene.point("a"), Some(Point::new(6.0, 0.0)));
}

#[test]
fn slider_patches_panel() {
    let mut e = engine(WidgetKind::Reflect);
    let mut doc = SvgDocument::for_scene(&e.scene);
    e.mount(&mut doc);
    assert_eq!(doc.text_of("slider-value"), Some("0.0°"));
    assert_eq!(doc.attribute("slider", "min"), Some("-45"));

    let redraws = e.set_slider(-12.5);
    e.flush(&mut doc, &redraws);
    assert_eq!(doc.text_of("slider-value"), Some("-12.5°"));
    assert_eq!(doc.attribute("slider", "value"), Some("-12.5"));
}

#[test]
fn theme_switch_recolors_only() {
    let mut e = engine(WidgetKind::Add);
    let mut doc = SvgDocument::for_scene(&e.scene);
    e.mount(&mut doc);
    let content_before = doc.count(Layer::Content);
    let shaft_before = doc.attribute("shape-0-shaft", "x2").map(str::to_string);

    let redraws = e.set_theme(true);
    e.flush(&mut doc, &redraws);

    let dark = Theme::dark();
    assert_eq!(doc.attribute("background", "fill"), Some(dark.background.to_hex().as_str()));
    assert_eq!(doc.attribute("shape-4", "color"), Some(dark.blue.to_hex().as_str()));
    assert!(doc.attribute("readout-a", "style").unwrap().contains(&dark.red.to_hex()));
    assert_eq!(doc.count(Layer::Content), content_before);
    assert_eq!(doc.attribute("shape-0-shaft", "x2").map(str::to_string), shaft_before);
    assert_eq!(e.scene.point("a"), Some(Point::new(9.0, 3.0)));
}

#[test]
fn configured_bounds_override_defaults() {
    let config = WidgetConfig::from_attributes([("bounds", "-5 -5 10 10")]).unwrap();
    let mut e = WidgetEngine::new(WidgetKind::Add, config);
    assert_eq!(e.scene.bounds.width, 10.0);
    e.apply(WidgetMutation::DragHandle {
        handle: HandleId(1),
        x: -9.0,
        y: 9.0,
    });
    assert_eq!(e.scene.point("b"), Some(Point::new(-5.0, 5.0)));
}
