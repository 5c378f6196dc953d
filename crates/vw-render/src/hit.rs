//! Hit testing: local point → handle lookup.
//!
//! Handles are tested last-added first, matching paint order, so the
//! topmost hit circle wins where two overlap.

use kurbo::Point;
use vw_core::{HandleId, Scene};

/// Find the topmost interactive handle containing `p`.
///
/// `p` is in the content layer's local frame (after the y-flip, if any).
pub fn hit_test(scene: &Scene, p: Point) -> Option<HandleId> {
    scene
        .handles
        .iter()
        .enumerate()
        .rev()
        .find(|(_, h)| h.interactive && h.contains(&scene.points, p))
        .map(|(i, _)| HandleId(i))
}
