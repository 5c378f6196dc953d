//! Tool system for widget interactions.
//!
//! A tool translates pointer events into `WidgetMutation` commands that
//! the `WidgetEngine` applies. Widgets only ever need one tool: dragging
//! handles.
//!
//! | Event | Over a handle | Elsewhere |
//! |-------|---------------|-----------|
//! | **down** | start dragging that handle | — |
//! | **move** | move every dragging handle's point | same |
//! | **up** | stop all drags | same |

use crate::engine::WidgetMutation;
use crate::input::InputEvent;
use kurbo::Point;
use vw_core::HandleId;

/// Trait for tools that handle input and produce mutations.
pub trait Tool {
    /// Handle an input event, returning zero or more mutations.
    ///
    /// `local` is the event position in the content layer's frame (`None`
    /// when the surface transform is unavailable); `hit` is the topmost
    /// interactive handle under a pointer-down.
    fn handle(
        &mut self,
        event: &InputEvent,
        local: Option<Point>,
        hit: Option<HandleId>,
    ) -> Vec<WidgetMutation>;
}

// ─── Drag Tool ───────────────────────────────────────────────────────────

/// Per-handle drag state. There is no cancel; a release anywhere ends
/// every drag.
#[derive(Debug, Clone, Default)]
pub struct DragTool {
    dragging: Vec<bool>,
}

impl DragTool {
    pub fn new(handle_count: usize) -> Self {
        Self {
            dragging: vec![false; handle_count],
        }
    }

    pub fn is_dragging(&self, handle: HandleId) -> bool {
        self.dragging.get(handle.0).copied().unwrap_or(false)
    }

    pub fn any_dragging(&self) -> bool {
        self.dragging.iter().any(|&d| d)
    }

    fn active(&self) -> impl Iterator<Item = HandleId> + '_ {
        self.dragging
            .iter()
            .enumerate()
            .filter(|(_, d)| **d)
            .map(|(i, _)| HandleId(i))
    }
}

impl Tool for DragTool {
    fn handle(
        &mut self,
        event: &InputEvent,
        local: Option<Point>,
        hit: Option<HandleId>,
    ) -> Vec<WidgetMutation> {
        match event {
            InputEvent::PointerDown { .. } => {
                let Some(handle) = hit else {
                    return vec![];
                };
                match self.dragging.get_mut(handle.0) {
                    Some(flag) if !*flag => {
                        *flag = true;
                        log::debug!("drag start on handle {}", handle.0);
                        vec![WidgetMutation::GrabHandle(handle)]
                    }
                    Some(_) => vec![],
                    None => {
                        log::warn!("pointer-down on unknown handle {}", handle.0);
                        vec![]
                    }
                }
            }
            InputEvent::PointerMove { .. } => {
                let Some(p) = local else {
                    if self.any_dragging() {
                        log::trace!("drag move without a screen transform; ignored");
                    }
                    return vec![];
                };
                self.active()
                    .map(|handle| WidgetMutation::DragHandle {
                        handle,
                        x: p.x,
                        y: p.y,
                    })
                    .collect()
            }
            InputEvent::PointerUp { .. } => {
                let released: Vec<HandleId> = self.active().collect();
                for handle in &released {
                    self.dragging[handle.0] = false;
                    log::debug!("drag end on handle {}", handle.0);
                }
                released
                    .into_iter()
                    .map(WidgetMutation::ReleaseHandle)
                    .collect()
            }
        }
    }
}
