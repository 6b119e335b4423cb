//! Synthetic stroke construction.
//!
//! The gesture sink accepts exactly one unit of pointer input: a timed
//! path from one point to another. Everything the engine wants to show
//! on the target surface (clicks, drag progress, scrolling) is expressed
//! as a [`DispatchRequest`] built here.

use uuid::Uuid;

use crate::domain::geometry::{Point, SurfaceGeometry};
use crate::domain::policy::StrokeTuning;

/// Identifier for one dispatched stroke, issued by the sink and echoed
/// back in its completion/cancellation report.
pub type DispatchHandle = Uuid;

/// Returns a fresh stroke handle.
pub fn new_dispatch_handle() -> DispatchHandle {
    Uuid::new_v4()
}

/// A candidate synthetic stroke: a timed path on the target surface.
/// Transient; built per dispatch and never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchRequest {
    pub from: Point,
    pub to: Point,
    pub duration_ms: u64,
}

impl DispatchRequest {
    /// A zero-length press at `at`: the sink renders it as a click.
    pub fn tap(at: Point, tuning: &StrokeTuning) -> Self {
        Self {
            from: at,
            to: at,
            duration_ms: tuning.tap_duration_ms,
        }
    }

    /// A short stroke advancing the virtual cursor toward a drag target.
    pub fn nudge(from: Point, to: Point, tuning: &StrokeTuning) -> Self {
        Self {
            from,
            to,
            duration_ms: tuning.nudge_duration_ms,
        }
    }

    /// The final stroke of a drag, settling the cursor at the lift point.
    pub fn settle(from: Point, to: Point, tuning: &StrokeTuning) -> Self {
        Self {
            from,
            to,
            duration_ms: tuning.settle_duration_ms,
        }
    }

    /// A vertical swipe through the center of the target surface moving
    /// by `delta_y` (damped by [`StrokeTuning::scroll_damping`]).
    pub fn scroll(delta_y: f64, target: &SurfaceGeometry, tuning: &StrokeTuning) -> Self {
        let start = target.center();
        let end = Point::new(start.x, start.y + delta_y * tuning.scroll_damping);
        Self {
            from: start,
            to: end,
            duration_ms: tuning.scroll_duration_ms,
        }
    }

    /// Clamps both endpoints into the target surface's addressable range.
    pub fn clamped_to(self, target: &SurfaceGeometry) -> Self {
        Self {
            from: target.clamp(self.from),
            to: target.clamp(self.to),
            ..self
        }
    }

    /// The stroke as the ordered point sequence the sink consumes.
    pub fn path(&self) -> [Point; 2] {
        [self.from, self.to]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
