//! A widget's assembled scene: points, primitives, handles, and frame.

use crate::geometry::iso_grid_bounds;
use crate::id::PointId;
use crate::model::Bounds;
use crate::points::{HandleId, PointGraph, RuleId, ShapeId, Subscriber};
use crate::shapes::{Handle, Shape};
use kurbo::Point;
use petgraph::graph::NodeIndex;

/// Background grid style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridKind {
    /// Unit squares plus x/y axes.
    Cartesian,
    /// Projected unit squares plus x/y/z axes.
    Isometric,
}

/// Everything a widget draws, plus the point graph that drives it.
///
/// Primitives and handles subscribe to their points as they are added, so
/// insertion order is notification order.
#[derive(Debug, Clone)]
pub struct Scene {
    pub points: PointGraph,
    pub shapes: Vec<Shape>,
    pub handles: Vec<Handle>,
    /// Visible user-space rectangle (the `viewBox`).
    pub bounds: Bounds,
    pub grid: GridKind,
    /// Content is drawn inside `scale(1 -1)` so y grows upward.
    pub flip_y: bool,
}

impl Scene {
    #[must_use]
    pub fn new(bounds: Bounds, grid: GridKind, flip_y: bool) -> Self {
        Self {
            points: PointGraph::new(),
            shapes: Vec::new(),
            handles: Vec::new(),
            bounds,
            grid,
            flip_y,
        }
    }

    pub fn add_point(&mut self, id: &str, x: f64, y: f64) -> NodeIndex {
        self.points.add_point(PointId::intern(id), Point::new(x, y))
    }

    /// Add a vector or polygon and subscribe it to every point it uses.
    pub fn add_shape(&mut self, shape: impl Into<Shape>) -> ShapeId {
        let shape = shape.into();
        let id = ShapeId(self.shapes.len());
        for idx in shape.points() {
            self.points.on_change(idx, Subscriber::Shape(id));
        }
        self.shapes.push(shape);
        id
    }

    /// Add a handle and subscribe it to its point.
    pub fn add_handle(&mut self, handle: Handle) -> HandleId {
        let id = HandleId(self.handles.len());
        self.points.on_change(handle.point, Subscriber::Handle(id));
        self.handles.push(handle);
        id
    }

    /// Subscribe `rule` to its inputs and record the derivation edges.
    pub fn add_rule(&mut self, rule: RuleId, inputs: &[NodeIndex], outputs: &[NodeIndex]) {
        for &input in inputs {
            self.points.on_change(input, Subscriber::Rule(rule));
            for &output in outputs {
                self.points.derive(input, output, rule);
            }
        }
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id.0)
    }

    pub fn handle(&self, id: HandleId) -> Option<&Handle> {
        self.handles.get(id.0)
    }

    pub fn shape_by_key(&self, key: &str) -> Option<(ShapeId, &Shape)> {
        self.shapes
            .iter()
            .enumerate()
            .find(|(_, s)| s.key() == key)
            .map(|(i, s)| (ShapeId(i), s))
    }

    /// Position of a point by its id string.
    pub fn point(&self, id: &str) -> Option<Point> {
        PointId::lookup(id).and_then(|id| self.points.position_of(id))
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        PointId::lookup(id).and_then(|id| self.points.index_of(id))
    }

    /// The rectangle handles live in, in their own coordinate frame.
    pub fn local_bounds(&self) -> Bounds {
        if self.flip_y {
            self.bounds.flipped_y()
        } else {
            self.bounds
        }
    }

    /// Logical extent of the background grid.
    pub fn grid_extent(&self) -> Bounds {
        match self.grid {
            GridKind::Cartesian => self.bounds,
            GridKind::Isometric => iso_grid_bounds(&self.bounds),
        }
    }
}
