//! Pure vector math shared by primitives and widget rules.
//!
//! Everything here is stateless and operates on `kurbo` points, which the
//! widgets use both as positions and as position vectors from the origin.
//! Degenerate inputs (zero-length segments or normals) follow IEEE float
//! semantics and may return NaN; callers that render decide how to cope.

use crate::model::{ArrowMarker, Bounds};
use kurbo::{Affine, Point, Vec2};

// ─── Vector arithmetic ───────────────────────────────────────────────────

#[must_use]
pub fn vector_add(a: Point, b: Point) -> Point {
    Point::new(a.x + b.x, a.y + b.y)
}

/// `a − b`.
#[must_use]
pub fn vector_subtract(a: Point, b: Point) -> Point {
    Point::new(a.x - b.x, a.y - b.y)
}

#[must_use]
pub fn vector_scale(a: Point, s: f64) -> Point {
    Point::new(a.x * s, a.y * s)
}

#[must_use]
pub fn vector_dot(a: Point, b: Point) -> f64 {
    a.x * b.x + a.y * b.y
}

/// Scalar z-component of the 3D cross product of two planar vectors.
#[must_use]
pub fn vector_cross(a: Point, b: Point) -> f64 {
    a.x * b.y - a.y * b.x
}

#[must_use]
pub fn vector_magnitude(p: Point) -> f64 {
    (p.x * p.x + p.y * p.y).sqrt()
}

/// Reflect `v` across the line whose normal is `n`.
///
/// `n` is normalized first, so any non-zero length works. A zero normal
/// yields NaN components.
#[must_use]
pub fn reflect(v: Point, n: Point) -> Point {
    let len = vector_magnitude(n);
    let unit = Point::new(n.x / len, n.y / len);
    let d = 2.0 * vector_dot(v, unit);
    Point::new(v.x - d * unit.x, v.y - d * unit.y)
}

/// Left-hand normal of the segment `p0 → p1`, same length as the segment.
#[must_use]
pub fn normal_of(p0: Point, p1: Point) -> Point {
    let d = p1 - p0;
    Point::new(-d.y, d.x)
}

// ─── Labels and arrowheads ───────────────────────────────────────────────

/// Midpoint of the segment pushed sideways by `offset` units.
///
/// The displacement direction is the segment angle minus a quarter turn,
/// so positive offsets land on the right-hand side in a y-up frame.
#[must_use]
pub fn label_position(x1: f64, y1: f64, x2: f64, y2: f64, offset: f64) -> Point {
    let mid_x = (x1 + x2) / 2.0;
    let mid_y = (y1 + y2) / 2.0;
    let angle = (y2 - y1).atan2(x2 - x1) - std::f64::consts::FRAC_PI_2;
    Point::new(mid_x + offset * angle.cos(), mid_y + offset * angle.sin())
}

/// Where a marked shaft must stop so the marker tip lands on `end`.
///
/// The shaft is pulled back toward `start` by
/// `(marker_width − marker_ref_x) × stroke_width`. NaN when `start == end`.
#[must_use]
pub fn shaft_end(
    start: Point,
    end: Point,
    marker_width: f64,
    marker_ref_x: f64,
    stroke_width: f64,
) -> Point {
    let d = end - start;
    let back = (marker_width - marker_ref_x) * stroke_width;
    end - d * (back / d.hypot())
}

/// Triangle corners of `marker` placed at `shaft_end` and pointing along
/// `direction` (unit length). Order: left corner, tip, right corner.
#[must_use]
pub fn arrowhead(
    shaft_end: Point,
    direction: Vec2,
    marker: &ArrowMarker,
    stroke_width: f64,
) -> [Point; 3] {
    let perp = Vec2::new(-direction.y, direction.x);
    let back = direction * (-marker.ref_x * stroke_width);
    let half = perp * (marker.height * 0.5 * stroke_width);
    [
        shaft_end + back + half,
        shaft_end + direction * ((marker.width - marker.ref_x) * stroke_width),
        shaft_end + back - half,
    ]
}

// ─── Isometric projection ────────────────────────────────────────────────

/// `(cos θ, sin θ)` for the 2:1 isometric angle θ = atan(0.5).
fn iso_basis() -> (f64, f64) {
    let theta = 0.5_f64.atan();
    (theta.cos(), theta.sin())
}

/// Project a logical 3D point onto the isometric drawing plane.
#[must_use]
pub fn isometric_project(x: f64, y: f64, z: f64) -> Point {
    let (cos, sin) = iso_basis();
    Point::new((x - y) * cos, (x + y) * sin - z)
}

/// Recover logical `(x, y)` from a projected point, assuming `z = 0`.
#[must_use]
pub fn isometric_inverse(sx: f64, sy: f64) -> Point {
    let (cos, sin) = iso_basis();
    let a = sx / cos;
    let b = sy / sin;
    Point::new((a + b) / 2.0, (b - a) / 2.0)
}

/// Logical extent that keeps an isometric grid covering `bounds` after
/// projection: expanded by the diagonal on every side, floored to integers.
#[must_use]
pub fn iso_grid_bounds(bounds: &Bounds) -> Bounds {
    let diagonal = bounds.width.hypot(bounds.height);
    Bounds::new(
        (bounds.x - diagonal).floor(),
        (bounds.y - diagonal).floor(),
        (bounds.width + 2.0 * diagonal).floor(),
        (bounds.height + 2.0 * diagonal).floor(),
    )
}

// ─── Rotation ────────────────────────────────────────────────────────────

/// Rotate the segment `p0 → p1` rigidly about its midpoint.
#[must_use]
pub fn rotate_segment(p0: Point, p1: Point, degrees: f64) -> (Point, Point) {
    let rotation = Affine::rotate_about(degrees.to_radians(), p0.midpoint(p1));
    (rotation * p0, rotation * p1)
}
