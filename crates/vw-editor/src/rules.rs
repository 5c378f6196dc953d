//! Derived-value rules.
//!
//! A rule reads its input points (and the slider value, for slider-driven
//! rules) and produces new positions for its outputs. The engine writes
//! those outputs back through `PointGraph::set`, which is what cascades a
//! second wave of primitive updates.

use kurbo::{Line, Point};
use petgraph::graph::NodeIndex;
use smallvec::{SmallVec, smallvec};
use vw_core::PointGraph;
use vw_core::geometry::{
    isometric_inverse, isometric_project, normal_of, reflect, rotate_segment, vector_add,
    vector_cross, vector_dot, vector_magnitude, vector_scale, vector_subtract,
};

/// Scale applied to the cross product when drawing it along the z-axis.
pub const CROSS_DISPLAY_SCALE: f64 = 0.2;

/// Length factor of the mirror normal relative to the mirror segment.
pub const NORMAL_DISPLAY_SCALE: f64 = 0.25;

pub type Outputs = SmallVec<[(NodeIndex, Point); 3]>;

#[derive(Debug, Clone, PartialEq)]
pub enum DerivedRule {
    /// `out = a + b`
    Sum { a: NodeIndex, b: NodeIndex, out: NodeIndex },
    /// `out = b − a`
    Difference { a: NodeIndex, b: NodeIndex, out: NodeIndex },
    /// `out = base × slider`
    Scale { base: NodeIndex, out: NodeIndex },
    /// `foot = (v.x, 0)`
    AxisFoot { v: NodeIndex, foot: NodeIndex },
    /// `out = a × (a·b / a·a)`, or the origin when `a` is zero.
    Projection { a: NodeIndex, b: NodeIndex, out: NodeIndex },
    /// Parallelogram tip `a + b` and the cross vector drawn along the
    /// isometric z-axis. `a` and `b` are projected positions.
    Cross {
        a: NodeIndex,
        b: NodeIndex,
        tip: NodeIndex,
        cross: NodeIndex,
    },
    /// Mirror segment `rest` rotated by the slider angle (degrees) about
    /// its midpoint, plus its scaled normal.
    Mirror {
        m0: NodeIndex,
        m1: NodeIndex,
        normal: NodeIndex,
        rest: Line,
    },
    /// `out = reflect(origin − tail, normal)`
    Reflect {
        tail: NodeIndex,
        normal: NodeIndex,
        out: NodeIndex,
    },
}

impl DerivedRule {
    /// Points whose change re-runs this rule.
    pub fn inputs(&self) -> SmallVec<[NodeIndex; 2]> {
        match *self {
            Self::Sum { a, b, .. }
            | Self::Difference { a, b, .. }
            | Self::Projection { a, b, .. }
            | Self::Cross { a, b, .. } => smallvec![a, b],
            Self::Scale { base, .. } => smallvec![base],
            Self::AxisFoot { v, .. } => smallvec![v],
            Self::Mirror { .. } => SmallVec::new(),
            Self::Reflect { tail, normal, .. } => smallvec![tail, normal],
        }
    }

    /// Points this rule writes, in write order.
    pub fn outputs(&self) -> SmallVec<[NodeIndex; 3]> {
        match *self {
            Self::Sum { out, .. }
            | Self::Difference { out, .. }
            | Self::Scale { out, .. }
            | Self::Projection { out, .. }
            | Self::Reflect { out, .. } => smallvec![out],
            Self::AxisFoot { foot, .. } => smallvec![foot],
            Self::Cross { tip, cross, .. } => smallvec![tip, cross],
            Self::Mirror { m0, m1, normal, .. } => smallvec![m0, m1, normal],
        }
    }

    /// Compute new output positions from the current point values.
    ///
    /// Returns nothing if an input is missing or the result would be
    /// undefined.
    pub fn evaluate(&self, points: &PointGraph, slider: f64) -> Outputs {
        let pos = |idx: NodeIndex| points.position(idx);
        let computed: Option<Outputs> = match *self {
            Self::Sum { a, b, out } => {
                pos(a).zip(pos(b)).map(|(a, b)| smallvec![(out, vector_add(a, b))])
            }
            Self::Difference { a, b, out } => pos(a)
                .zip(pos(b))
                .map(|(a, b)| smallvec![(out, vector_subtract(b, a))]),
            Self::Scale { base, out } => {
                pos(base).map(|base| smallvec![(out, vector_scale(base, slider))])
            }
            Self::AxisFoot { v, foot } => pos(v).map(|v| smallvec![(foot, Point::new(v.x, 0.0))]),
            Self::Projection { a, b, out } => {
                pos(a).zip(pos(b)).map(|(a, b)| smallvec![(out, projection(a, b))])
            }
            Self::Cross { a, b, tip, cross } => pos(a).zip(pos(b)).map(|(a, b)| {
                let c = iso_cross(a, b);
                smallvec![
                    (tip, vector_add(a, b)),
                    (cross, isometric_project(0.0, 0.0, -c * CROSS_DISPLAY_SCALE)),
                ]
            }),
            Self::Mirror {
                m0,
                m1,
                normal,
                rest,
            } => {
                let (p0, p1) = rotate_segment(rest.p0, rest.p1, slider);
                let n = vector_scale(normal_of(p0, p1), NORMAL_DISPLAY_SCALE);
                Some(smallvec![(m0, p0), (m1, p1), (normal, n)])
            }
            Self::Reflect { tail, normal, out } => {
                pos(tail).zip(pos(normal)).and_then(|(tail, n)| {
                    if vector_magnitude(n) == 0.0 {
                        log::warn!("mirror normal has zero length; reflection skipped");
                        return None;
                    }
                    Some(smallvec![(out, reflect(vector_subtract(Point::ZERO, tail), n))])
                })
            }
        };
        computed.unwrap_or_default()
    }
}

/// Projection of `b` onto `a`; the origin when `a` has zero length.
pub fn projection(a: Point, b: Point) -> Point {
    let len_sq = vector_dot(a, a);
    if len_sq == 0.0 {
        return Point::ZERO;
    }
    vector_scale(a, vector_dot(a, b) / len_sq)
}

/// Cross product of two projected points, taken on their logical
/// (un-projected) coordinates.
pub fn iso_cross(a: Point, b: Point) -> f64 {
    vector_cross(isometric_inverse(a.x, a.y), isometric_inverse(b.x, b.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vw_core::PointId;

    fn close(p: Point, x: f64, y: f64) -> bool {
        (p.x - x).abs() < 1e-9 && (p.y - y).abs() < 1e-9
    }

    fn graph(points: &[(&str, f64, f64)]) -> (PointGraph, Vec<NodeIndex>) {
        let mut g = PointGraph::new();
        let idx = points
            .iter()
            .map(|&(id, x, y)| g.add_point(PointId::intern(id), Point::new(x, y)))
            .collect();
        (g, idx)
    }

    #[test]
    fn sum_and_difference() {
        let (g, p) = graph(&[("ra", 9.0, 3.0), ("rb", -4.0, 4.0), ("rout", 0.0, 0.0)]);
        let sum = DerivedRule::Sum { a: p[0], b: p[1], out: p[2] }.evaluate(&g, 0.0);
        assert!(close(sum[0].1, 5.0, 7.0));
        let diff = DerivedRule::Difference { a: p[0], b: p[1], out: p[2] }.evaluate(&g, 0.0);
        assert!(close(diff[0].1, -13.0, 1.0));
    }

    #[test]
    fn scale_uses_slider() {
        let (g, p) = graph(&[("rbase", 3.0, 3.0), ("rscaled", 0.0, 0.0)]);
        let rule = DerivedRule::Scale { base: p[0], out: p[1] };
        assert!(close(rule.evaluate(&g, 1.5)[0].1, 4.5, 4.5));
        assert!(close(rule.evaluate(&g, -2.0)[0].1, -6.0, -6.0));
    }

    #[test]
    fn projection_of_zero_vector_is_origin() {
        assert_eq!(projection(Point::ZERO, Point::new(2.0, 5.0)), Point::ZERO);
        assert!(close(projection(Point::new(6.0, 0.0), Point::new(2.0, 5.0)), 2.0, 0.0));
    }

    #[test]
    fn cross_on_logical_coordinates() {
        let a = isometric_project(0.0, 6.0, 0.0);
        let b = isometric_project(6.0, 0.0, 0.0);
        assert!((iso_cross(a, b) + 36.0).abs() < 1e-9);
    }

    #[test]
    fn mirror_at_zero_degrees() {
        let (g, p) = graph(&[("rm0", 0.0, 0.0), ("rm1", 0.0, 0.0), ("rn", 0.0, 0.0)]);
        let rule = DerivedRule::Mirror {
            m0: p[0],
            m1: p[1],
            normal: p[2],
            rest: Line::new((-6.0, 0.0), (6.0, 0.0)),
        };
        let out = rule.evaluate(&g, 0.0);
        assert!(close(out[0].1, -6.0, 0.0));
        assert!(close(out[1].1, 6.0, 0.0));
        assert!(close(out[2].1, 0.0, 3.0));
        assert!(rule.inputs().is_empty());
        assert_eq!(rule.outputs().len(), 3);
    }

    #[test]
    fn reflect_skips_zero_normal() {
        let (g, p) = graph(&[("rtail", -4.0, 4.0), ("rzero", 0.0, 0.0), ("rr", 0.0, 0.0)]);
        let rule = DerivedRule::Reflect { tail: p[0], normal: p[1], out: p[2] };
        assert!(rule.evaluate(&g, 0.0).is_empty());
    }
}
