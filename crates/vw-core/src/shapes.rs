//! Drawing primitives: vectors, polygons, and drag handles.
//!
//! A primitive only stores which points it references and how it is
//! styled. Its geometry is recomputed from the current point positions
//! whenever one of those points notifies it, so the render layer always
//! patches from a fresh `*Geometry` value.

use crate::geometry::{arrowhead, label_position, shaft_end};
use crate::model::{ArrowMarker, Label, Stroke, Tone};
use crate::points::PointGraph;
use kurbo::{Line, Point};
use petgraph::graph::NodeIndex;
use smallvec::SmallVec;

// ─── Labels ──────────────────────────────────────────────────────────────

/// Where a label goes, in the frame of the primitive that owns it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelGeometry {
    pub anchor: Point,
    /// The text sits under a `scale(1 -1)` transform (anchor y negated)
    /// so it reads upright inside a y-up layer.
    pub mirrored: bool,
}

impl LabelGeometry {
    fn place(pos: Point, label: &Label) -> Self {
        if label.flip_y {
            Self {
                anchor: pos,
                mirrored: false,
            }
        } else {
            Self {
                anchor: Point::new(pos.x, -pos.y),
                mirrored: true,
            }
        }
    }
}

// ─── Vector ──────────────────────────────────────────────────────────────

/// An arrow from `start` to `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorShape {
    /// Stable name used for element ids and styling hooks.
    pub key: String,
    pub start: NodeIndex,
    pub end: NodeIndex,
    pub tone: Tone,
    pub stroke: Stroke,
    pub label: Option<Label>,
    pub marker: Option<ArrowMarker>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VectorGeometry {
    pub shaft: Line,
    /// Arrowhead corners (left, tip, right).
    pub head: Option<[Point; 3]>,
    pub label: Option<LabelGeometry>,
}

impl VectorShape {
    pub fn new(key: impl Into<String>, start: NodeIndex, end: NodeIndex, tone: Tone) -> Self {
        Self {
            key: key.into(),
            start,
            end,
            tone,
            stroke: Stroke::default(),
            label: None,
            marker: Some(ArrowMarker::default()),
        }
    }

    #[must_use]
    pub fn label(mut self, text: impl Into<String>, offset: f64) -> Self {
        self.label = Some(Label::new(text, offset));
        self
    }

    /// Mark the label as living in a y-down frame.
    #[must_use]
    pub fn flip_label(mut self) -> Self {
        if let Some(label) = self.label.take() {
            self.label = Some(label.flipped());
        }
        self
    }

    #[must_use]
    pub fn stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = stroke;
        self
    }

    #[must_use]
    pub fn without_marker(mut self) -> Self {
        self.marker = None;
        self
    }

    /// Compute the drawn shaft, arrowhead and label position.
    ///
    /// Returns `None` if either endpoint is missing from `points`. A
    /// zero-length vector draws a zero-length shaft and no arrowhead.
    pub fn geometry(&self, points: &PointGraph) -> Option<VectorGeometry> {
        let start = points.position(self.start)?;
        let end = points.position(self.end)?;

        let (shaft_to, head) = match &self.marker {
            Some(marker) if start != end => {
                let sw = self.stroke.width;
                let base = shaft_end(start, end, marker.width, marker.ref_x, sw);
                let dir = (end - start).normalize();
                (base, Some(arrowhead(base, dir, marker, sw)))
            }
            Some(_) => {
                log::trace!("vector {} has zero length; arrowhead hidden", self.key);
                (end, None)
            }
            None => (end, None),
        };

        let label = self.label.as_ref().map(|label| {
            let pos = label_position(start.x, start.y, end.x, end.y, label.offset);
            LabelGeometry::place(pos, label)
        });

        Some(VectorGeometry {
            shaft: Line::new(start, shaft_to),
            head,
            label,
        })
    }
}

// ─── Polygon ─────────────────────────────────────────────────────────────

/// A closed, filled outline through three or more points.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonShape {
    pub key: String,
    pub vertices: SmallVec<[NodeIndex; 4]>,
    pub tone: Tone,
    pub stroke: Stroke,
    pub fill_opacity: f32,
    pub stroke_opacity: f32,
    /// Drawn at the vertex centroid; the offset is unused.
    pub label: Option<Label>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonGeometry {
    pub points: SmallVec<[Point; 4]>,
    pub label: Option<LabelGeometry>,
}

impl PolygonShape {
    pub fn new(key: impl Into<String>, vertices: &[NodeIndex], tone: Tone) -> Self {
        Self {
            key: key.into(),
            vertices: vertices.iter().copied().collect(),
            tone,
            stroke: Stroke::solid(0.1),
            fill_opacity: 0.1,
            stroke_opacity: 0.4,
            label: None,
        }
    }

    #[must_use]
    pub fn label(mut self, label: Label) -> Self {
        self.label = Some(label);
        self
    }

    #[must_use]
    pub fn stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = stroke;
        self
    }

    /// Current vertex positions and centroid label.
    pub fn geometry(&self, points: &PointGraph) -> Option<PolygonGeometry> {
        let pts = self
            .vertices
            .iter()
            .map(|&v| points.position(v))
            .collect::<Option<SmallVec<[Point; 4]>>>()?;
        if pts.is_empty() {
            return None;
        }

        let label = self.label.as_ref().map(|label| {
            let n = pts.len() as f64;
            let (sx, sy) = pts.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
            LabelGeometry::place(Point::new(sx / n, sy / n), label)
        });

        Some(PolygonGeometry { points: pts, label })
    }
}

// ─── Shape ───────────────────────────────────────────────────────────────

/// Any drawing primitive that subscribes to points.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Vector(VectorShape),
    Polygon(PolygonShape),
}

impl Shape {
    pub fn key(&self) -> &str {
        match self {
            Shape::Vector(v) => &v.key,
            Shape::Polygon(p) => &p.key,
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Shape::Vector(v) => v.tone,
            Shape::Polygon(p) => p.tone,
        }
    }

    /// Referenced points, in subscription order, without duplicates.
    pub fn points(&self) -> SmallVec<[NodeIndex; 4]> {
        let mut out: SmallVec<[NodeIndex; 4]> = SmallVec::new();
        let all: SmallVec<[NodeIndex; 4]> = match self {
            Shape::Vector(v) => [v.start, v.end].into_iter().collect(),
            Shape::Polygon(p) => p.vertices.clone(),
        };
        for idx in all {
            if !out.contains(&idx) {
                out.push(idx);
            }
        }
        out
    }
}

impl From<VectorShape> for Shape {
    fn from(v: VectorShape) -> Self {
        Shape::Vector(v)
    }
}

impl From<PolygonShape> for Shape {
    fn from(p: PolygonShape) -> Self {
        Shape::Polygon(p)
    }
}

// ─── Handle ──────────────────────────────────────────────────────────────

/// Invisible circular hit target that follows one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub point: NodeIndex,
    pub radius: f64,
    pub interactive: bool,
}

impl Handle {
    pub const DEFAULT_RADIUS: f64 = 0.3;

    pub fn new(point: NodeIndex) -> Self {
        Self {
            point,
            radius: Self::DEFAULT_RADIUS,
            interactive: true,
        }
    }

    pub fn center(&self, points: &PointGraph) -> Option<Point> {
        points.position(self.point)
    }

    /// Whether `p` (in the handle's frame) falls inside the hit circle.
    pub fn contains(&self, points: &PointGraph, p: Point) -> bool {
        self.center(points)
            .is_some_and(|c| c.distance(p) <= self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::PointId;
    use pretty_assertions::assert_eq;

    fn graph_with(points: &[(&str, f64, f64)]) -> (PointGraph, Vec<NodeIndex>) {
        let mut g = PointGraph::new();
        let idx = points
            .iter()
            .map(|&(id, x, y)| g.add_point(PointId::intern(id), Point::new(x, y)))
            .collect();
        (g, idx)
    }

    #[test]
    fn vector_shaft_stops_before_tip() {
        let (g, p) = graph_with(&[("o", 0.0, 0.0), ("a", 10.0, 0.0)]);
        let v = VectorShape::new("a", p[0], p[1], Tone::Red);
        let geo = v.geometry(&g).unwrap();
        let head_len = std::f64::consts::PI * 0.15;
        assert!((geo.shaft.p1.x - (10.0 - head_len)).abs() < 1e-9);
        let [_, tip, _] = geo.head.unwrap();
        assert!((tip.x - 10.0).abs() < 1e-9 && tip.y.abs() < 1e-9);
    }

    #[test]
    fn unmarked_vector_reaches_end() {
        let (g, p) = graph_with(&[("o", 0.0, 0.0), ("a", 5.0, 5.0)]);
        let v = VectorShape::new("leg", p[0], p[1], Tone::Green).without_marker();
        let geo = v.geometry(&g).unwrap();
        assert_eq!(geo.shaft.p1, Point::new(5.0, 5.0));
        assert!(geo.head.is_none());
    }

    #[test]
    fn degenerate_vector_has_no_head() {
        let (g, p) = graph_with(&[("o", 1.0, 1.0), ("a", 1.0, 1.0)]);
        let geo = VectorShape::new("z", p[0], p[1], Tone::Red)
            .geometry(&g)
            .unwrap();
        assert!(geo.head.is_none());
        assert!(geo.shaft.p1.x.is_finite());
    }

    #[test]
    fn label_negated_unless_flipped() {
        let (g, p) = graph_with(&[("o", 0.0, 0.0), ("a", 4.0, 0.0)]);
        let v = VectorShape::new("a", p[0], p[1], Tone::Red).label("A", 1.0);
        let label = v.geometry(&g).unwrap().label.unwrap();
        assert!(label.mirrored);
        assert!((label.anchor.y - 1.0).abs() < 1e-9);

        let flipped = v.clone().flip_label();
        let label = flipped.geometry(&g).unwrap().label.unwrap();
        assert!(!label.mirrored);
        assert!((label.anchor.y + 1.0).abs() < 1e-9);
    }

    #[test]
    fn polygon_label_at_centroid() {
        let (g, p) = graph_with(&[
            ("q0", 0.0, 0.0),
            ("q1", 4.0, 0.0),
            ("q2", 4.0, 2.0),
            ("q3", 0.0, 2.0),
        ]);
        let poly = PolygonShape::new("par", &p, Tone::Yellow).label(Label::new("|AxB|", 0.0).flipped());
        let geo = poly.geometry(&g).unwrap();
        assert_eq!(geo.points.len(), 4);
        assert_eq!(geo.label.unwrap().anchor, Point::new(2.0, 1.0));
    }

    #[test]
    fn shape_points_deduplicated() {
        let (_, p) = graph_with(&[("o", 0.0, 0.0)]);
        let v = Shape::Vector(VectorShape::new("self", p[0], p[0], Tone::Grey));
        assert_eq!(v.points().len(), 1);
    }

    #[test]
    fn handle_hit_circle() {
        let (g, p) = graph_with(&[("h", 2.0, 2.0)]);
        let mut h = Handle::new(p[0]);
        h.radius = 1.2;
        assert!(h.contains(&g, Point::new(3.0, 2.5)));
        assert!(!h.contains(&g, Point::new(4.0, 4.0)));
    }
}
