//! The seven widget topologies.
//!
//! Each `WidgetKind` builds a fixed scene: points, primitives in paint
//! order, handles, derived rules, readouts and (for Scale and Reflect) a
//! slider. Construction order is subscription order, so within every
//! point the vectors hear about a change first, then the handle, then the
//! rule.
//!
//! | Tag | Inputs | Derived |
//! |-----|--------|---------|
//! | `vector-add` | A, B | A + B |
//! | `vector-sub` | A, B | B − A |
//! | `vector-scale` | Base, slider | Base × s |
//! | `vector-mag` | A | ‖A‖, x-axis foot |
//! | `vector-dot` | A, B | A·B, projection |
//! | `vector-cross` | A, B (isometric) | A×B, parallelogram |
//! | `vector-reflect` | V, mirror angle | R |

use crate::rules::{DerivedRule, iso_cross};
use kurbo::{Line, Point};
use petgraph::graph::NodeIndex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use vw_core::geometry::{isometric_inverse, isometric_project, vector_dot, vector_magnitude};
use vw_core::readout::{format_degrees, format_factor, format_pair, format_scalar};
use vw_core::{
    Bounds, GridKind, Handle, Label, PolygonShape, RuleId, Scene, Stroke, Tone, VectorShape,
};

/// Hit radius of every widget handle.
pub const HANDLE_RADIUS: f64 = 1.2;

/// Dash pattern of auxiliary vectors.
const AUX_DASH: (f64, f64) = (0.3, 0.1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Add,
    Subtract,
    Scale,
    Magnitude,
    Dot,
    Cross,
    Reflect,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 7] = [
        WidgetKind::Add,
        WidgetKind::Subtract,
        WidgetKind::Scale,
        WidgetKind::Magnitude,
        WidgetKind::Dot,
        WidgetKind::Cross,
        WidgetKind::Reflect,
    ];

    /// Custom-element tag the widget is embedded under.
    pub fn tag(self) -> &'static str {
        match self {
            WidgetKind::Add => "vector-add",
            WidgetKind::Subtract => "vector-sub",
            WidgetKind::Scale => "vector-scale",
            WidgetKind::Magnitude => "vector-mag",
            WidgetKind::Dot => "vector-dot",
            WidgetKind::Cross => "vector-cross",
            WidgetKind::Reflect => "vector-reflect",
        }
    }

    /// Default visible rectangle.
    pub fn default_bounds(self) -> Bounds {
        match self {
            WidgetKind::Cross => Bounds::new(-10.0, -10.0, 20.0, 20.0),
            _ => Bounds::new(-10.0, -8.0, 20.0, 16.0),
        }
    }

    /// Build the widget's default configuration inside `bounds`.
    pub fn build(self, bounds: Bounds) -> Widget {
        let widget = match self {
            WidgetKind::Add => build_add(bounds),
            WidgetKind::Subtract => build_subtract(bounds),
            WidgetKind::Scale => build_scale(bounds),
            WidgetKind::Magnitude => build_magnitude(bounds),
            WidgetKind::Dot => build_dot(bounds),
            WidgetKind::Cross => build_cross(bounds),
            WidgetKind::Reflect => build_reflect(bounds),
        };
        log::debug!(
            "built {}: {} points, {} shapes, {} handles, {} rules",
            self.tag(),
            widget.scene.points.len(),
            widget.scene.shapes.len(),
            widget.scene.handles.len(),
            widget.rules.len()
        );
        widget
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for WidgetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        WidgetKind::ALL
            .into_iter()
            .find(|k| k.tag() == wanted)
            .ok_or_else(|| {
                let tags: Vec<&str> = WidgetKind::ALL.iter().map(|k| k.tag()).collect();
                format!("Unknown widget tag {s:?}; expected one of {}", tags.join(", "))
            })
    }
}

// ─── Readouts & slider ───────────────────────────────────────────────────

/// What a readout displays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReadoutValue {
    /// A point's coordinates.
    Pair(NodeIndex),
    /// A projected point's logical coordinates.
    LogicalPair(NodeIndex),
    /// A point's distance from the origin.
    Magnitude(NodeIndex),
    /// Dot product of two points.
    Dot(NodeIndex, NodeIndex),
    /// Negated cross product of two projected points.
    NegatedCross(NodeIndex, NodeIndex),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadoutSpec {
    /// Element-id suffix and styling class.
    pub key: &'static str,
    pub label: &'static str,
    pub tone: Tone,
    pub value: ReadoutValue,
}

/// One formatted info-panel value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Readout {
    pub key: String,
    pub label: String,
    pub text: String,
    pub tone: Tone,
}

impl ReadoutSpec {
    fn new(key: &'static str, label: &'static str, tone: Tone, value: ReadoutValue) -> Self {
        Self {
            key,
            label,
            tone,
            value,
        }
    }

    /// Whether this readout depends on point `idx`.
    pub fn reads(&self, idx: NodeIndex) -> bool {
        match self.value {
            ReadoutValue::Pair(p) | ReadoutValue::LogicalPair(p) | ReadoutValue::Magnitude(p) => {
                p == idx
            }
            ReadoutValue::Dot(a, b) | ReadoutValue::NegatedCross(a, b) => a == idx || b == idx,
        }
    }

    /// Format the current value from `scene`.
    pub fn read(&self, scene: &Scene) -> Readout {
        let pos = |idx| scene.points.position(idx).unwrap_or(Point::ZERO);
        let text = match self.value {
            ReadoutValue::Pair(p) => format_pair(pos(p)),
            ReadoutValue::LogicalPair(p) => {
                let p = pos(p);
                format_pair(isometric_inverse(p.x, p.y))
            }
            ReadoutValue::Magnitude(p) => format_scalar(vector_magnitude(pos(p))),
            ReadoutValue::Dot(a, b) => format_scalar(vector_dot(pos(a), pos(b))),
            ReadoutValue::NegatedCross(a, b) => format_scalar(-iso_cross(pos(a), pos(b))),
        };
        Readout {
            key: self.key.to_string(),
            label: self.label.to_string(),
            text,
            tone: self.tone,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderUnit {
    /// `1.5x`
    Factor,
    /// `12.5°`
    Degrees,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SliderSpec {
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub initial: f64,
    pub unit: SliderUnit,
    /// Rule re-run on every value change.
    pub drives: RuleId,
}

impl SliderSpec {
    /// Clamp an incoming value into range. Non-finite input falls back to
    /// the initial value.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_finite() {
            value.clamp(self.min, self.max)
        } else {
            self.initial
        }
    }

    pub fn format(&self, value: f64) -> String {
        match self.unit {
            SliderUnit::Factor => format_factor(value),
            SliderUnit::Degrees => format_degrees(value),
        }
    }
}

// ─── Widget ──────────────────────────────────────────────────────────────

/// A built widget, ready to hand to the engine.
#[derive(Debug, Clone)]
pub struct Widget {
    pub kind: WidgetKind,
    pub scene: Scene,
    /// Indexed by `RuleId`.
    pub rules: Vec<DerivedRule>,
    pub readouts: Vec<ReadoutSpec>,
    pub slider: Option<SliderSpec>,
}

impl Widget {
    fn new(kind: WidgetKind, scene: Scene) -> Self {
        Self {
            kind,
            scene,
            rules: Vec::new(),
            readouts: Vec::new(),
            slider: None,
        }
    }

    /// Register a rule: subscribe it to its inputs and record its outputs.
    fn rule(&mut self, rule: DerivedRule) -> RuleId {
        let id = RuleId(self.rules.len());
        self.scene.add_rule(id, &rule.inputs(), &rule.outputs());
        self.rules.push(rule);
        id
    }

    fn handle(&mut self, point: NodeIndex) {
        let mut handle = Handle::new(point);
        handle.radius = HANDLE_RADIUS;
        self.scene.add_handle(handle);
    }

    fn readout(&mut self, key: &'static str, label: &'static str, tone: Tone, value: ReadoutValue) {
        self.readouts.push(ReadoutSpec::new(key, label, tone, value));
    }
}

fn aux_stroke() -> Stroke {
    Stroke::dashed(0.15, AUX_DASH.0, AUX_DASH.1)
}

fn leg_stroke() -> Stroke {
    Stroke::dashed(0.1, AUX_DASH.0, AUX_DASH.1)
}

fn cartesian(bounds: Bounds) -> Scene {
    Scene::new(bounds, GridKind::Cartesian, true)
}

// ─── Topologies ──────────────────────────────────────────────────────────

fn build_add(bounds: Bounds) -> Widget {
    let mut w = Widget::new(WidgetKind::Add, cartesian(bounds));
    let s = &mut w.scene;
    let o = s.add_point("origin", 0.0, 0.0);
    let a = s.add_point("a", 9.0, 3.0);
    let b = s.add_point("b", -4.0, 4.0);
    let sum = s.add_point("sum", 5.0, 7.0);

    s.add_shape(VectorShape::new("vectorA", o, a, Tone::Red).label("A", 0.5));
    s.add_shape(VectorShape::new("vectorB", o, b, Tone::Green).label("B", -0.5));
    s.add_shape(
        VectorShape::new("vectorAuxB", a, sum, Tone::Grey)
            .label("B", 0.5)
            .stroke(aux_stroke()),
    );
    s.add_shape(
        VectorShape::new("vectorAuxA", b, sum, Tone::Grey)
            .label("A", -0.5)
            .stroke(aux_stroke()),
    );
    s.add_shape(VectorShape::new("vectorSum", o, sum, Tone::Blue).label("A+B", 0.8));

    w.handle(a);
    w.handle(b);
    w.rule(DerivedRule::Sum { a, b, out: sum });

    w.readout("a", "A", Tone::Red, ReadoutValue::Pair(a));
    w.readout("b", "B", Tone::Green, ReadoutValue::Pair(b));
    w.readout("sum", "A+B", Tone::Blue, ReadoutValue::Pair(sum));
    w
}

fn build_subtract(bounds: Bounds) -> Widget {
    let mut w = Widget::new(WidgetKind::Subtract, cartesian(bounds));
    let s = &mut w.scene;
    let o = s.add_point("origin", 0.0, 0.0);
    let a = s.add_point("a", 5.0, 3.0);
    let b = s.add_point("b", -4.0, 4.0);
    let diff = s.add_point("diff", -9.0, 1.0);

    s.add_shape(VectorShape::new("vectorA", o, a, Tone::Red).label("A", 0.5));
    s.add_shape(
        VectorShape::new("vectorAux", a, b, Tone::Grey)
            .label("B-A", 0.5)
            .stroke(aux_stroke()),
    );
    s.add_shape(VectorShape::new("vectorB", o, b, Tone::Green).label("B", 0.5));
    s.add_shape(VectorShape::new("vectorDiff", o, diff, Tone::Blue).label("B-A", 0.8));

    w.handle(a);
    w.handle(b);
    w.rule(DerivedRule::Difference { a, b, out: diff });

    w.readout("a", "A", Tone::Red, ReadoutValue::Pair(a));
    w.readout("b", "B", Tone::Green, ReadoutValue::Pair(b));
    w.readout("diff", "B-A", Tone::Blue, ReadoutValue::Pair(diff));
    w
}

fn build_scale(bounds: Bounds) -> Widget {
    let mut w = Widget::new(WidgetKind::Scale, cartesian(bounds));
    let s = &mut w.scene;
    let o = s.add_point("origin", 0.0, 0.0);
    let base = s.add_point("base", 3.0, 3.0);
    let scaled = s.add_point("scaled", 4.5, 4.5);

    s.add_shape(VectorShape::new("vectorScaled", o, scaled, Tone::Green).label("Scaled", -1.2));
    s.add_shape(VectorShape::new("vectorBase", o, base, Tone::Red).label("Base", 1.0));

    w.handle(base);
    let drives = w.rule(DerivedRule::Scale { base, out: scaled });
    w.slider = Some(SliderSpec {
        label: "Scale",
        min: -2.0,
        max: 2.0,
        step: 0.1,
        initial: 1.5,
        unit: SliderUnit::Factor,
        drives,
    });

    w.readout("base", "Base", Tone::Red, ReadoutValue::Pair(base));
    w.readout("scaled", "Scaled", Tone::Green, ReadoutValue::Pair(scaled));
    w
}

fn build_magnitude(bounds: Bounds) -> Widget {
    let mut w = Widget::new(WidgetKind::Magnitude, cartesian(bounds));
    let s = &mut w.scene;
    let o = s.add_point("origin", 0.0, 0.0);
    let v = s.add_point("v", 5.0, 5.0);
    let foot = s.add_point("foot", 5.0, 0.0);

    s.add_shape(
        VectorShape::new("opposite", v, foot, Tone::Green)
            .label("Ay", -0.6)
            .stroke(leg_stroke())
            .without_marker(),
    );
    s.add_shape(
        VectorShape::new("adjacent", o, foot, Tone::Green)
            .label("Ax", 0.6)
            .stroke(leg_stroke())
            .without_marker(),
    );
    s.add_shape(VectorShape::new("vector", o, v, Tone::Red).label("A", -0.5));

    w.handle(v);
    w.rule(DerivedRule::AxisFoot { v, foot });

    w.readout("a", "A", Tone::Red, ReadoutValue::Pair(v));
    w.readout("length", "Length", Tone::Green, ReadoutValue::Magnitude(v));
    w
}

fn build_dot(bounds: Bounds) -> Widget {
    let mut w = Widget::new(WidgetKind::Dot, cartesian(bounds));
    let s = &mut w.scene;
    let o = s.add_point("origin", 0.0, 0.0);
    let a = s.add_point("a", 6.0, 0.0);
    let b = s.add_point("b", 2.0, 5.0);
    let proj = s.add_point("proj", 2.0, 0.0);

    s.add_shape(VectorShape::new("vectorA", o, a, Tone::Red).label("A", 0.6));
    s.add_shape(VectorShape::new("vectorB", o, b, Tone::Green).label("B", -0.6));
    s.add_shape(VectorShape::new("dot", o, proj, Tone::Yellow).without_marker());

    w.handle(a);
    w.handle(b);
    w.rule(DerivedRule::Projection { a, b, out: proj });

    w.readout("a", "A", Tone::Red, ReadoutValue::Pair(a));
    w.readout("b", "B", Tone::Green, ReadoutValue::Pair(b));
    w.readout("dot", "A⋅B", Tone::Yellow, ReadoutValue::Dot(a, b));
    w
}

fn build_cross(bounds: Bounds) -> Widget {
    let mut w = Widget::new(WidgetKind::Cross, Scene::new(bounds, GridKind::Isometric, false));
    let s = &mut w.scene;
    let pa = isometric_project(0.0, 6.0, 0.0);
    let pb = isometric_project(6.0, 0.0, 0.0);
    let tip_at = isometric_project(6.0, 6.0, 0.0);
    let cross_at = isometric_project(0.0, 0.0, -iso_cross(pa, pb) * crate::rules::CROSS_DISPLAY_SCALE);

    let o = s.add_point("origin", 0.0, 0.0);
    let a = s.add_point("a", pa.x, pa.y);
    let b = s.add_point("b", pb.x, pb.y);
    let cross = s.add_point("cross", cross_at.x, cross_at.y);
    let tip = s.add_point("tip", tip_at.x, tip_at.y);

    s.add_shape(
        PolygonShape::new("par", &[o, b, tip, a], Tone::Yellow)
            .label(Label::new("|AxB|", 0.0).flipped())
            .stroke(Stroke::solid(0.05)),
    );
    s.add_shape(
        VectorShape::new("vectorA", o, a, Tone::Red)
            .label("A", -0.6)
            .flip_label(),
    );
    s.add_shape(
        VectorShape::new("vectorB", o, b, Tone::Green)
            .label("B", 0.6)
            .flip_label(),
    );
    s.add_shape(
        VectorShape::new("vectorCross", o, cross, Tone::Blue)
            .label("AxB", 0.8)
            .flip_label(),
    );

    w.handle(a);
    w.handle(b);
    w.rule(DerivedRule::Cross { a, b, tip, cross });

    w.readout("a", "A", Tone::Red, ReadoutValue::LogicalPair(a));
    w.readout("b", "B", Tone::Green, ReadoutValue::LogicalPair(b));
    w.readout("cross", "A x B", Tone::Blue, ReadoutValue::NegatedCross(a, b));
    w
}

fn build_reflect(bounds: Bounds) -> Widget {
    let rest = Line::new((-6.0, 0.0), (6.0, 0.0));
    let mut w = Widget::new(WidgetKind::Reflect, cartesian(bounds));
    let s = &mut w.scene;
    let o = s.add_point("origin", 0.0, 0.0);
    let m0 = s.add_point("m0", rest.p0.x, rest.p0.y);
    let m1 = s.add_point("m1", rest.p1.x, rest.p1.y);
    let n = s.add_point("n", 0.0, 3.0);
    let tail = s.add_point("v", -4.0, 4.0);
    let r = s.add_point("r", 4.0, 4.0);

    s.add_shape(
        VectorShape::new("surface", m0, m1, Tone::Yellow)
            .label("mirror", 0.6)
            .without_marker(),
    );
    s.add_shape(VectorShape::new("normal", o, n, Tone::Yellow).label("N", 0.6));
    s.add_shape(VectorShape::new("V", tail, o, Tone::Red).label("V", 0.6));
    s.add_shape(VectorShape::new("R", o, r, Tone::Green).label("R", 0.6));

    w.handle(tail);
    let drives = w.rule(DerivedRule::Mirror {
        m0,
        m1,
        normal: n,
        rest,
    });
    w.rule(DerivedRule::Reflect {
        tail,
        normal: n,
        out: r,
    });
    w.slider = Some(SliderSpec {
        label: "Mirror angle",
        min: -45.0,
        max: 45.0,
        step: 0.5,
        initial: 0.0,
        unit: SliderUnit::Degrees,
        drives,
    });

    w.readout("v", "V", Tone::Red, ReadoutValue::Pair(tail));
    w.readout("r", "R", Tone::Green, ReadoutValue::Pair(r));
    w
}
