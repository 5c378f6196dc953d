//! Static background decoration: unit grid and axes.
//!
//! Decoration lines live in the unflipped surface frame and never depend on
//! point positions, so they are only rebuilt on mount and on theme change.

use crate::geometry::isometric_project;
use crate::scene::{GridKind, Scene};
use kurbo::{Line, Point};

/// Stroke width of grid and axis lines, in user units.
pub const DECORATION_STROKE_WIDTH: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    Grid,
    Axis,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub line: Line,
    pub role: LineRole,
}

impl GridLine {
    fn grid(p0: Point, p1: Point) -> Self {
        Self {
            line: Line::new(p0, p1),
            role: LineRole::Grid,
        }
    }

    fn axis(p0: Point, p1: Point) -> Self {
        Self {
            line: Line::new(p0, p1),
            role: LineRole::Axis,
        }
    }
}

/// All decoration lines for a scene, grid first so axes paint on top.
pub fn grid_lines(scene: &Scene) -> Vec<GridLine> {
    match scene.grid {
        GridKind::Cartesian => cartesian(scene),
        GridKind::Isometric => isometric(scene),
    }
}

fn cartesian(scene: &Scene) -> Vec<GridLine> {
    let b = scene.bounds;
    let (right, bottom) = (b.x + b.width, b.y + b.height);
    let mut out = Vec::new();

    let mut y = b.y.floor() + 1.0;
    while y < bottom {
        out.push(GridLine::grid(Point::new(b.x, y), Point::new(right, y)));
        y += 1.0;
    }
    let mut x = b.x.floor() + 1.0;
    while x < right {
        out.push(GridLine::grid(Point::new(x, b.y), Point::new(x, bottom)));
        x += 1.0;
    }

    out.push(GridLine::axis(Point::new(0.0, b.y), Point::new(0.0, bottom)));
    out.push(GridLine::axis(Point::new(b.x, 0.0), Point::new(right, 0.0)));
    out
}

fn isometric(scene: &Scene) -> Vec<GridLine> {
    let iso = scene.grid_extent();
    let (x_end, y_end) = (iso.x + iso.width, iso.y + iso.height);
    let mut out = Vec::new();

    let mut i = iso.y;
    while i < y_end {
        out.push(GridLine::grid(
            isometric_project(iso.x, i, 0.0),
            isometric_project(x_end, i, 0.0),
        ));
        i += 1.0;
    }
    let mut i = iso.x;
    while i < x_end {
        out.push(GridLine::grid(
            isometric_project(i, iso.y, 0.0),
            isometric_project(i, y_end, 0.0),
        ));
        i += 1.0;
    }

    out.push(GridLine::axis(
        isometric_project(0.0, iso.y, 0.0),
        isometric_project(0.0, y_end, 0.0),
    ));
    out.push(GridLine::axis(
        isometric_project(iso.x, 0.0, 0.0),
        isometric_project(x_end, 0.0, 0.0),
    ));
    // The z axis projects straight up the screen.
    let b = scene.bounds;
    out.push(GridLine::axis(
        Point::new(0.0, b.y),
        Point::new(0.0, b.y + b.height),
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Bounds;

    #[test]
    fn cartesian_grid_skips_border_lines() {
        let scene = Scene::new(Bounds::new(-10.0, -8.0, 20.0, 16.0), GridKind::Cartesian, true);
        let lines = grid_lines(&scene);
        let grid = lines.iter().filter(|l| l.role == LineRole::Grid).count();
        let axes = lines.iter().filter(|l| l.role == LineRole::Axis).count();
        // 15 horizontal (y = -7..=7) + 19 vertical (x = -9..=9)
        assert_eq!(grid, 34);
        assert_eq!(axes, 2);
        assert_eq!(lines.last().map(|l| l.role), Some(LineRole::Axis));
    }

    #[test]
    fn isometric_grid_has_three_axes() {
        let scene = Scene::new(Bounds::new(-10.0, -10.0, 20.0, 20.0), GridKind::Isometric, false);
        let lines = grid_lines(&scene);
        let axes: Vec<_> = lines.iter().filter(|l| l.role == LineRole::Axis).collect();
        assert_eq!(axes.len(), 3);
        // 76 lines each way over the expanded logical extent.
        assert_eq!(lines.len() - axes.len(), 152);
        let z = axes[2].line;
        assert_eq!(z.p0.x, 0.0);
        assert_eq!(z.p1.y, 10.0);
    }
}
