//! Integration tests: scene assembly → point writes → subscriber lists.
//!
//! Exercises `vw-core` end to end without an engine: points are written
//! directly and the returned subscriber lists are checked for order.

use pretty_assertions::assert_eq;
use vw_core::geometry::{isometric_inverse, isometric_project, reflect, vector_dot};
use vw_core::{Bounds, GridKind, Handle, Point, RuleId, Scene, Subscriber, Tone, VectorShape};
use vw_core::{HandleId, ShapeId};

fn close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

// ─── Notification ────────────────────────────────────────────────────────

#[test]
fn subscribers_come_back_in_insertion_order() {
    let mut scene = Scene::new(Bounds::new(-10.0, -10.0, 20.0, 20.0), GridKind::Cartesian, true);
    let o = scene.add_point("origin", 0.0, 0.0);
    let a = scene.add_point("a", 3.0, 4.0);
    let sum = scene.add_point("sum", 3.0, 4.0);

    let va = scene.add_shape(VectorShape::new("vectorA", o, a, Tone::Red));
    let h = scene.add_handle(Handle::new(a));
    scene.add_rule(RuleId(0), &[a], &[sum]);
    scene.add_shape(VectorShape::new("vectorSum", o, sum, Tone::Blue));

    let subs = scene.points.set(a, 1.0, 1.0);
    assert_eq!(
        subs.as_slice(),
        &[Subscriber::Shape(va), Subscriber::Handle(h), Subscriber::Rule(RuleId(0))]
    );
    assert_eq!(va, ShapeId(0));
    assert_eq!(h, HandleId(0));
    assert_eq!(scene.point("a"), Some(Point::new(1.0, 1.0)));
}

#[test]
fn unchanged_write_still_notifies() {
    let mut scene = Scene::new(Bounds::new(-5.0, -5.0, 10.0, 10.0), GridKind::Cartesian, true);
    let o = scene.add_point("origin", 0.0, 0.0);
    let v = scene.add_point("v", 2.0, 2.0);
    scene.add_shape(VectorShape::new("vector", o, v, Tone::Green));

    assert_eq!(scene.points.set(v, 2.0, 2.0).len(), 1);
    assert_eq!(scene.points.set(v, 2.0, 2.0).len(), 1);
}

#[test]
fn duplicate_subscription_is_ignored() {
    let mut scene = Scene::new(Bounds::new(-5.0, -5.0, 10.0, 10.0), GridKind::Cartesian, true);
    let a = scene.add_point("a", 1.0, 0.0);
    assert!(scene.points.on_change(a, Subscriber::Rule(RuleId(3))));
    assert!(!scene.points.on_change(a, Subscriber::Rule(RuleId(3))));
    assert_eq!(scene.points.subscribers(a).len(), 1);
}

// ─── Geometry ────────────────────────────────────────────────────────────

#[test]
fn vector_geometry_follows_its_points() {
    let mut scene = Scene::new(Bounds::new(-10.0, -10.0, 20.0, 20.0), GridKind::Cartesian, true);
    let o = scene.add_point("origin", 0.0, 0.0);
    let a = scene.add_point("a", 4.0, 0.0);
    let id = scene.add_shape(VectorShape::new("vectorA", o, a, Tone::Red));

    let shape = scene.shape(id).unwrap().clone();
    let vw_core::Shape::Vector(vector) = shape else {
        panic!("expected a vector");
    };
    let g = vector.geometry(&scene.points).unwrap();
    assert_eq!(g.shaft.p0, Point::ZERO);
    // The shaft stops short so the marker tip lands on the endpoint.
    let back = std::f64::consts::PI * vector.stroke.width;
    assert!(close(g.shaft.p1, Point::new(4.0 - back, 0.0)));
    assert!(close(g.head.unwrap()[1], Point::new(4.0, 0.0)));

    scene.points.set(a, 0.0, 0.0);
    let g = vector.geometry(&scene.points).unwrap();
    assert!(g.head.is_none());
}

#[test]
fn isometric_round_trip_on_ground_plane() {
    for &(x, y) in &[(0.0, 0.0), (6.0, 0.0), (-3.5, 2.25), (1.0, -7.0)] {
        let p = isometric_project(x, y, 0.0);
        assert!(close(isometric_inverse(p.x, p.y), Point::new(x, y)), "({x}, {y})");
    }
}

#[test]
fn reflection_preserves_length_and_flips_normal_component() {
    let v = Point::new(3.0, -1.0);
    let n = Point::new(0.0, 2.0);
    let r = reflect(v, n);
    assert!(close(r, Point::new(3.0, 1.0)));
    assert!((vector_dot(r, n) + vector_dot(v, n)).abs() < 1e-9);
}
