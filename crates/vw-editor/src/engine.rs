//! Widget engine: mutations in, redraws out.
//!
//! The engine owns a widget's scene and is the only thing that writes to
//! its points. Every write goes through `PointGraph::set`; the returned
//! subscribers are dispatched synchronously, in order, before the write
//! returns:
//!
//! - a shape or handle subscriber records a `Redraw` for that primitive,
//! - a rule subscriber evaluates the rule and writes its outputs, which
//!   dispatches their subscribers in turn, then records a readout refresh.
//!
//! The resulting `Redraw` list therefore mirrors notification order, and
//! `flush` replays it against a surface.

use crate::config::WidgetConfig;
use crate::input::InputEvent;
use crate::panel;
use crate::rules::DerivedRule;
use crate::tools::{DragTool, Tool};
use crate::widgets::{Readout, ReadoutSpec, SliderSpec, WidgetKind};
use kurbo::Point;
use petgraph::graph::NodeIndex;
use vw_core::{HandleId, RuleId, Scene, ShapeId, Subscriber, Theme};
use vw_render::{
    RenderSurface, SvgDocument, apply_theme, hit_test, mount_scene, update_handle, update_shape,
};

/// A single change requested by a tool or the host page.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetMutation {
    /// Programmatic point write; not clamped.
    MovePoint { point: NodeIndex, x: f64, y: f64 },
    /// A handle entered the dragging state.
    GrabHandle(HandleId),
    /// Move a dragged handle's point to a local position.
    DragHandle { handle: HandleId, x: f64, y: f64 },
    /// A handle left the dragging state.
    ReleaseHandle(HandleId),
    /// New slider value from the control panel.
    SetSlider(f64),
    /// Switch appearance mode.
    SetTheme { dark: bool },
}

/// Something on the surface that must be patched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    Shape(ShapeId),
    Handle(HandleId),
    Readouts,
    Slider,
    Theme,
}

pub struct WidgetEngine {
    pub kind: WidgetKind,
    pub scene: Scene,
    pub theme: Theme,
    pub config: WidgetConfig,
    rules: Vec<DerivedRule>,
    readouts: Vec<ReadoutSpec>,
    slider: Option<SliderSpec>,
    slider_value: f64,
    drag: DragTool,
    /// Points whose subscribers are being dispatched, innermost last.
    notifying: Vec<NodeIndex>,
}

impl WidgetEngine {
    /// Build `kind` with `config` and compute every derived point once.
    pub fn new(kind: WidgetKind, config: WidgetConfig) -> Self {
        let bounds = config.bounds.unwrap_or_else(|| kind.default_bounds());
        let widget = kind.build(bounds);
        let slider_value = widget.slider.as_ref().map_or(0.0, |s| s.initial);

        let mut engine = Self {
            kind,
            drag: DragTool::new(widget.scene.handles.len()),
            scene: widget.scene,
            theme: Theme::for_mode(config.dark),
            config,
            rules: widget.rules,
            readouts: widget.readouts,
            slider: widget.slider,
            slider_value,
            notifying: Vec::new(),
        };

        let mut initial = Vec::new();
        for i in 0..engine.rules.len() {
            engine.run_rule(RuleId(i), &mut initial);
        }
        log::debug!("{} ready ({} initial updates)", kind.tag(), initial.len());
        engine
    }

    /// Build from a widget tag such as `vector-add`.
    pub fn from_tag(tag: &str, config: WidgetConfig) -> Result<Self, String> {
        Ok(Self::new(tag.parse()?, config))
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Apply one mutation and return the redraws it caused, in order.
    pub fn apply(&mut self, mutation: WidgetMutation) -> Vec<Redraw> {
        let mut redraws = Vec::new();
        match mutation {
            WidgetMutation::MovePoint { point, x, y } => {
                if !(x.is_finite() && y.is_finite()) {
                    log::warn!("ignoring non-finite move to ({x}, {y})");
                    return redraws;
                }
                self.set_point(point, Point::new(x, y), &mut redraws);
            }
            WidgetMutation::GrabHandle(handle) | WidgetMutation::ReleaseHandle(handle) => {
                redraws.push(Redraw::Handle(handle));
            }
            WidgetMutation::DragHandle { handle, x, y } => {
                let Some(point) = self.scene.handle(handle).map(|h| h.point) else {
                    log::warn!("drag on unknown handle {}", handle.0);
                    return redraws;
                };
                if !(x.is_finite() && y.is_finite()) {
                    log::warn!("ignoring non-finite drag of handle {} to ({x}, {y})", handle.0);
                    return redraws;
                }
                let (x, y) = if self.config.clamp_drag {
                    self.scene.local_bounds().clamp(x, y)
                } else {
                    (x, y)
                };
                self.set_point(point, Point::new(x, y), &mut redraws);
            }
            WidgetMutation::SetSlider(value) => {
                let Some(spec) = &self.slider else {
                    log::warn!("{} has no slider", self.kind.tag());
                    return redraws;
                };
                let drives = spec.drives;
                self.slider_value = spec.clamp(value);
                log::trace!("slider = {}", self.slider_value);
                self.run_rule(drives, &mut redraws);
                redraws.push(Redraw::Slider);
            }
            WidgetMutation::SetTheme { dark } => {
                self.theme = Theme::for_mode(dark);
                redraws.push(Redraw::Theme);
            }
        }
        redraws
    }

    /// Write a point and dispatch its subscribers.
    fn set_point(&mut self, idx: NodeIndex, p: Point, redraws: &mut Vec<Redraw>) {
        debug_assert!(
            !self.notifying.contains(&idx),
            "point set while notifying its own subscribers"
        );
        let subscribers = self.scene.points.set(idx, p.x, p.y);
        self.notifying.push(idx);
        for subscriber in subscribers {
            match subscriber {
                Subscriber::Shape(id) => redraws.push(Redraw::Shape(id)),
                Subscriber::Handle(id) => redraws.push(Redraw::Handle(id)),
                Subscriber::Rule(rule) => self.run_rule(rule, redraws),
            }
        }
        if self.readouts.iter().any(|r| r.reads(idx)) {
            queue_readouts(redraws);
        }
        self.notifying.pop();
    }

    fn run_rule(&mut self, rule: RuleId, redraws: &mut Vec<Redraw>) {
        let Some(r) = self.rules.get(rule.0) else {
            log::warn!("unknown rule {}", rule.0);
            return;
        };
        let outputs = r.evaluate(&self.scene.points, self.slider_value);
        log::trace!("rule {} → {} outputs", rule.0, outputs.len());
        for (idx, p) in outputs {
            self.set_point(idx, p, redraws);
        }
        queue_readouts(redraws);
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Route a pointer event through the drag tool.
    ///
    /// The screen position is mapped into the content layer with the
    /// inverse of the surface's current screen transform.
    pub fn handle_input(&mut self, event: &InputEvent, surface: &dyn RenderSurface) -> Vec<Redraw> {
        let (sx, sy) = event.position();
        let local = surface.screen_to_local(sx, sy);
        let hit = match event {
            InputEvent::PointerDown { .. } => local.and_then(|p| hit_test(&self.scene, p)),
            _ => None,
        };
        let mutations = self.drag.handle(event, local, hit);
        let mut redraws = Vec::new();
        for mutation in mutations {
            redraws.extend(self.apply(mutation));
        }
        redraws
    }

    /// Handle an event and patch `surface` in one step.
    pub fn dispatch(&mut self, event: &InputEvent, surface: &mut dyn RenderSurface) {
        let redraws = self.handle_input(event, &*surface);
        self.flush(surface, &redraws);
    }

    pub fn set_slider(&mut self, value: f64) -> Vec<Redraw> {
        self.apply(WidgetMutation::SetSlider(value))
    }

    pub fn set_theme(&mut self, dark: bool) -> Vec<Redraw> {
        self.apply(WidgetMutation::SetTheme { dark })
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// Current info-panel values, in display order.
    pub fn readouts(&self) -> Vec<Readout> {
        self.readouts.iter().map(|r| r.read(&self.scene)).collect()
    }

    pub fn slider(&self) -> Option<&SliderSpec> {
        self.slider.as_ref()
    }

    /// Current slider value, if the widget has a slider.
    pub fn slider_value(&self) -> Option<f64> {
        self.slider.as_ref().map(|_| self.slider_value)
    }

    pub fn is_dragging(&self, handle: HandleId) -> bool {
        self.drag.is_dragging(handle)
    }

    pub fn any_dragging(&self) -> bool {
        self.drag.any_dragging()
    }

    // ─── Surface ─────────────────────────────────────────────────────────

    /// Insert the full drawing and panel into `surface`.
    pub fn mount(&self, surface: &mut dyn RenderSurface) {
        mount_scene(surface, &self.scene, &self.theme);
        let slider = self.slider.as_ref().map(|s| (s, self.slider_value));
        panel::mount_panel(surface, &self.theme, &self.readouts(), slider);
    }

    /// Mount into a fresh in-memory document and serialize it.
    pub fn render_svg(&self) -> String {
        let mut doc = SvgDocument::for_scene(&self.scene);
        self.mount(&mut doc);
        doc.to_svg_string()
    }

    /// Patch `surface` for each redraw, in order.
    pub fn flush(&self, surface: &mut dyn RenderSurface, redraws: &[Redraw]) {
        for redraw in redraws {
            match *redraw {
                Redraw::Shape(id) => update_shape(surface, &self.scene, id),
                Redraw::Handle(id) => {
                    update_handle(surface, &self.scene, id, self.drag.is_dragging(id));
                }
                Redraw::Readouts => panel::update_readouts(surface, &self.readouts()),
                Redraw::Slider => {
                    if let Some(spec) = &self.slider {
                        panel::update_slider(surface, spec, self.slider_value);
                    }
                }
                Redraw::Theme => {
                    apply_theme(surface, &self.scene, &self.theme);
                    panel::apply_panel_theme(surface, &self.theme, &self.readouts());
                }
            }
        }
    }
}

/// Queue a readout refresh unless one is already the latest redraw.
fn queue_readouts(redraws: &mut Vec<Redraw>) {
    if redraws.last() != Some(&Redraw::Readouts) {
        redraws.push(Redraw::Readouts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn point(engine: &WidgetEngine, id: &str) -> Point {
        engine.scene.point(id).unwrap()
    }

    #[test]
    fn derived_points_consistent_at_build() {
        let add = WidgetEngine::new(WidgetKind::Add, WidgetConfig::default());
        assert_eq!(point(&add, "sum"), Point::new(5.0, 7.0));

        let scale = WidgetEngine::new(WidgetKind::Scale, WidgetConfig::default());
        assert_eq!(point(&scale, "scaled"), Point::new(4.5, 4.5));
    }

    #[test]
    fn redraws_follow_notification_order() {
        let mut engine = WidgetEngine::new(WidgetKind::Add, WidgetConfig::default());
        let a = engine.scene.index_of("a").unwrap();
        let redraws = engine.apply(WidgetMutation::MovePoint { point: a, x: 1.0, y: 1.0 });
        assert_eq!(
            redraws,
            vec![
                Redraw::Shape(ShapeId(0)),
                Redraw::Shape(ShapeId(2)),
                Redraw::Handle(HandleId(0)),
                Redraw::Shape(ShapeId(2)),
                Redraw::Shape(ShapeId(3)),
                Redraw::Shape(ShapeId(4)),
                Redraw::Readouts,
            ]
        );
        assert_eq!(point(&engine, "sum"), Point::new(-3.0, 5.0));
    }

    #[test]
    fn drag_is_clamped_to_bounds() {
        let mut engine = WidgetEngine::new(WidgetKind::Add, WidgetConfig::default());
        engine.apply(WidgetMutation::DragHandle { handle: HandleId(0), x: 50.0, y: -50.0 });
        assert_eq!(point(&engine, "a"), Point::new(10.0, -8.0));

        let config = WidgetConfig {
            clamp_drag: false,
            ..WidgetConfig::default()
        };
        let mut free = WidgetEngine::new(WidgetKind::Add, config);
        free.apply(WidgetMutation::DragHandle { handle: HandleId(0), x: 50.0, y: -50.0 });
        assert_eq!(point(&free, "a"), Point::new(50.0, -50.0));
    }

    #[test]
    fn slider_without_slider_is_ignored() {
        let mut engine = WidgetEngine::new(WidgetKind::Dot, WidgetConfig::default());
        assert!(engine.set_slider(1.0).is_empty());
        assert_eq!(engine.slider_value(), None);
    }

    #[test]
    fn theme_change_leaves_points_alone() {
        let mut engine = WidgetEngine::new(WidgetKind::Cross, WidgetConfig::default());
        let before = point(&engine, "cross");
        assert_eq!(engine.set_theme(true), vec![Redraw::Theme]);
        assert_eq!(engine.theme, Theme::dark());
        assert_eq!(point(&engine, "cross"), before);
    }

    #[test]
    fn any_dragging_tracks_grab_and_release() {
        let mut engine = WidgetEngine::new(WidgetKind::Magnitude, WidgetConfig::default());
        assert!(!engine.any_dragging());
        engine.drag.handle(
            &InputEvent::from_pointer_down(0.0, 0.0),
            Some(Point::new(5.0, 5.0)),
            Some(HandleId(0)),
        );
        assert!(engine.any_dragging());
        engine.drag.handle(&InputEvent::from_pointer_up(0.0, 0.0), None, None);
        assert!(!engine.any_dragging());
    }

    #[test]
    fn render_svg_serializes_drawing_only() {
        let engine = WidgetEngine::new(WidgetKind::Scale, WidgetConfig::default());
        let svg = engine.render_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("id=\"shape-0-shaft\""));
        assert!(svg.contains("id=\"handle-0\""));
        assert!(!svg.contains("readout-scaled"));
    }

    #[test]
    fn unknown_tag_is_an_error() {
        assert!(WidgetEngine::from_tag("vector-div", WidgetConfig::default()).is_err());
    }
}
