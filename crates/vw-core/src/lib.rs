pub mod geometry;
pub mod grid;
pub mod id;
pub mod model;
pub mod parser;
pub mod points;
pub mod readout;
pub mod scene;
pub mod shapes;

pub use id::PointId;
pub use model::*;
pub use parser::{parse_bounds, parse_flag};
pub use points::{HandleId, PointGraph, RuleId, ShapeId, Subscriber};
pub use scene::{GridKind, Scene};
pub use shapes::{Handle, PolygonShape, Shape, VectorShape};

// Re-export petgraph/kurbo types so downstream crates share one version
pub use kurbo::Point;
pub use petgraph::graph::NodeIndex;
