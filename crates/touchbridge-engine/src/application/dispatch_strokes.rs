//! Stroke dispatch use case: feeds gesture events to the injection
//! back-end while enforcing the serialization rules the back-end needs.
//!
//! The gesture sink can render only one synthetic stroke at a time, and
//! it reports completion (or cancellation) asynchronously. This module
//! owns the bookkeeping around that constraint:
//!
//! - **At most one stroke in flight.** A new request while the sink is
//!   busy is staged in a single pending slot instead of being dispatched.
//! - **Latest request wins.** A second request while one is already
//!   staged replaces it; intermediate drag positions are skipped, not
//!   queued up.
//! - **Replay on completion.** When the in-flight stroke completes, the
//!   staged request (if any) is dispatched immediately.
//! - **Discard on cancellation.** When the sink cancels a stroke, the
//!   staged request is dropped along with it; nothing is retried.
//! - **Virtual cursor.** Drag strokes are relative to wherever the last
//!   stroke ended, so the dispatcher tracks that endpoint across strokes.
//!
//! All methods are called with the engine lock held, so the fields need
//! no synchronization of their own.

use thiserror::Error;
use tracing::{debug, trace, warn};

use touchbridge_core::{
    DispatchHandle, DispatchRequest, GestureEvent, Point, StrokeTuning, SurfaceGeometry,
};

// ── Sink port ─────────────────────────────────────────────────────────────────

/// Error type for stroke dispatch operations.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The injection back-end is not able to accept strokes right now.
    #[error("gesture sink unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Trait abstracting the synthetic stroke back-end.
///
/// Implementations must return quickly and must not call back into the
/// engine from inside `dispatch`; completion and cancellation are
/// reported afterwards through the engine's stroke report methods.
pub trait GestureSink: Send + Sync {
    /// Starts rendering `request` and returns a handle identifying it.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Unavailable`] when the back-end cannot accept
    /// a stroke. The caller drops the request without retrying.
    fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchHandle, SinkError>;
}

// ── Pending slot ──────────────────────────────────────────────────────────────

/// A gesture waiting for the sink to free up.
///
/// The kind is preserved so a tap staged behind a busy sink is still
/// performed as a tap, never degraded into a movement stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PendingDispatch {
    /// Click at `at`.
    Tap { at: Point },
    /// Advance the virtual cursor toward `target`.
    MoveTo { target: Point },
    /// Settle the virtual cursor at the drag lift point.
    Settle { at: Point },
    /// Swipe vertically by `delta_y` through the surface center.
    Scroll { delta_y: f64 },
}

// ── Dispatcher ────────────────────────────────────────────────────────────────

/// Serializes gesture dispatch onto a one-stroke-at-a-time sink.
///
/// Owned by the translation engine and operated under its lock; see the
/// module docs for the rules it enforces.
#[derive(Debug)]
pub struct StrokeDispatcher {
    /// Handle of the stroke the sink is currently rendering, if any.
    in_flight: Option<DispatchHandle>,
    /// Single staged request, replayed when the in-flight stroke completes.
    pending: Option<PendingDispatch>,
    /// Endpoint of the last dispatched non-scroll stroke, target space.
    cursor: Point,
    /// Mapped position the current drag wants the cursor to reach.
    drag_target: Option<Point>,
}

impl StrokeDispatcher {
    /// Creates an idle dispatcher with the virtual cursor at the center
    /// of the target surface.
    pub fn new(target: &SurfaceGeometry) -> Self {
        Self {
            in_flight: None,
            pending: None,
            cursor: target.center(),
            drag_target: None,
        }
    }

    /// Current virtual cursor position, target space.
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Handle of the stroke currently being rendered, if any.
    pub fn in_flight(&self) -> Option<DispatchHandle> {
        self.in_flight
    }

    /// The staged request, if any.
    pub fn pending(&self) -> Option<PendingDispatch> {
        self.pending
    }

    /// Translates one classified gesture event into a dispatch (or a
    /// staged request when the sink is busy).
    pub fn handle_event(
        &mut self,
        event: GestureEvent,
        target: &SurfaceGeometry,
        tuning: &StrokeTuning,
        sink: &dyn GestureSink,
    ) {
        match event {
            GestureEvent::Tap { at } => {
                self.submit(PendingDispatch::Tap { at }, target, tuning, sink);
            }
            GestureEvent::DragUpdate { target: goal } => {
                self.drag_target = Some(goal);
                self.submit(PendingDispatch::MoveTo { target: goal }, target, tuning, sink);
            }
            GestureEvent::DragEnd { at } => {
                self.drag_target = None;
                self.submit(PendingDispatch::Settle { at }, target, tuning, sink);
            }
            GestureEvent::ScrollDelta { delta_y } => {
                self.submit(PendingDispatch::Scroll { delta_y }, target, tuning, sink);
            }
        }
    }

    /// Reports that the sink finished rendering `handle`.
    ///
    /// Frees the in-flight slot and immediately dispatches the staged
    /// request, if any. Reports for a handle other than the current one
    /// are ignored; the sink may emit them after a stroke was superseded.
    pub fn on_completed(
        &mut self,
        handle: DispatchHandle,
        target: &SurfaceGeometry,
        tuning: &StrokeTuning,
        sink: &dyn GestureSink,
    ) {
        match self.in_flight {
            Some(current) if current == handle => {
                self.in_flight = None;
                if let Some(next) = self.pending.take() {
                    trace!(%handle, ?next, "stroke completed; replaying staged request");
                    self.dispatch_now(next, target, tuning, sink);
                } else {
                    trace!(%handle, "stroke completed");
                }
            }
            _ => debug!(%handle, "completion report for unknown stroke ignored"),
        }
    }

    /// Reports that the sink abandoned `handle` before it finished.
    ///
    /// Frees the in-flight slot and discards the staged request; nothing
    /// is retried. The nudge driver or the next touch sample will resume
    /// a still-live drag from wherever the cursor actually stopped.
    pub fn on_cancelled(&mut self, handle: DispatchHandle) {
        match self.in_flight {
            Some(current) if current == handle => {
                self.in_flight = None;
                if self.pending.take().is_some() {
                    debug!(%handle, "stroke cancelled; staged request discarded");
                } else {
                    debug!(%handle, "stroke cancelled");
                }
            }
            _ => debug!(%handle, "cancellation report for unknown stroke ignored"),
        }
    }

    /// Periodic drag liveness tick.
    ///
    /// Dispatches one nudge toward the drag target when the sink is idle
    /// and the cursor has not reached it yet. The caller verifies that a
    /// drag is actually live before invoking this.
    pub fn nudge_tick(
        &mut self,
        target: &SurfaceGeometry,
        tuning: &StrokeTuning,
        sink: &dyn GestureSink,
    ) {
        if self.in_flight.is_some() {
            return;
        }
        let Some(goal) = self.drag_target else {
            return;
        };
        if target.clamp(goal) == self.cursor {
            return;
        }
        trace!(?goal, cursor = ?self.cursor, "nudge tick advancing drag");
        self.dispatch_now(PendingDispatch::MoveTo { target: goal }, target, tuning, sink);
    }

    /// Re-clamps the virtual cursor after the target surface changed.
    pub fn retarget(&mut self, target: &SurfaceGeometry) {
        self.cursor = target.clamp(self.cursor);
    }

    /// Drops the drag target and any staged request.
    ///
    /// Used when translation is disabled mid-interaction; an in-flight
    /// stroke is left to finish on its own.
    pub fn abort_interaction(&mut self) {
        self.drag_target = None;
        self.pending = None;
    }

    /// Dispatches `next` if the sink is idle, otherwise stages it
    /// (replacing whatever was staged before).
    fn submit(
        &mut self,
        next: PendingDispatch,
        target: &SurfaceGeometry,
        tuning: &StrokeTuning,
        sink: &dyn GestureSink,
    ) {
        if self.in_flight.is_some() {
            if let Some(prev) = self.pending.replace(next) {
                trace!(?prev, ?next, "sink busy; staged request replaced");
            } else {
                trace!(?next, "sink busy; request staged");
            }
            return;
        }
        self.dispatch_now(next, target, tuning, sink);
    }

    fn dispatch_now(
        &mut self,
        next: PendingDispatch,
        target: &SurfaceGeometry,
        tuning: &StrokeTuning,
        sink: &dyn GestureSink,
    ) {
        let request = self.build_request(&next, target, tuning);
        match sink.dispatch(&request) {
            Ok(handle) => {
                self.in_flight = Some(handle);
                // Scroll swipes pan content without relocating the pointer,
                // so only the other stroke kinds advance the cursor.
                if !matches!(next, PendingDispatch::Scroll { .. }) {
                    self.cursor = request.to;
                }
                trace!(
                    %handle,
                    from = ?request.from,
                    to = ?request.to,
                    duration_ms = request.duration_ms,
                    "stroke dispatched"
                );
            }
            Err(SinkError::Unavailable { reason }) => {
                warn!(%reason, ?next, "gesture sink unavailable; stroke dropped");
            }
        }
    }

    fn build_request(
        &self,
        next: &PendingDispatch,
        target: &SurfaceGeometry,
        tuning: &StrokeTuning,
    ) -> DispatchRequest {
        let request = match *next {
            PendingDispatch::Tap { at } => DispatchRequest::tap(at, tuning),
            PendingDispatch::MoveTo { target: goal } => {
                DispatchRequest::nudge(self.cursor, goal, tuning)
            }
            PendingDispatch::Settle { at } => DispatchRequest::settle(self.cursor, at, tuning),
            PendingDispatch::Scroll { delta_y } => {
                DispatchRequest::scroll(delta_y, target, tuning)
            }
        };
        request.clamped_to(target)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use touchbridge_core::new_dispatch_handle;

    use super::*;

    /// Recording sink double: captures every dispatched request and hands
    /// out fresh handles, with an optional failure switch.
    struct RecordingSink {
        requests: Mutex<Vec<DispatchRequest>>,
        handles: Mutex<Vec<DispatchHandle>>,
        should_fail: Mutex<bool>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                handles: Mutex::new(Vec::new()),
                should_fail: Mutex::new(false),
            }
        }

        fn requests(&self) -> Vec<DispatchRequest> {
            self.requests.lock().unwrap().clone()
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        fn last_handle(&self) -> DispatchHandle {
            *self
                .handles
                .lock()
                .unwrap()
                .last()
                .expect("no stroke was dispatched")
        }

        fn set_should_fail(&self, fail: bool) {
            *self.should_fail.lock().unwrap() = fail;
        }
    }

    impl GestureSink for RecordingSink {
        fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchHandle, SinkError> {
            if *self.should_fail.lock().unwrap() {
                return Err(SinkError::Unavailable {
                    reason: "injection service disconnected".to_string(),
                });
            }
            self.requests.lock().unwrap().push(*request);
            let handle = new_dispatch_handle();
            self.handles.lock().unwrap().push(handle);
            Ok(handle)
        }
    }

    fn target() -> SurfaceGeometry {
        SurfaceGeometry::new(1080.0, 2640.0)
    }

    fn tuning() -> StrokeTuning {
        StrokeTuning::default()
    }

    #[test]
    fn test_dispatcher_starts_with_cursor_at_target_center() {
        // Arrange / Act
        let dispatcher = StrokeDispatcher::new(&target());

        // Assert
        assert_eq!(dispatcher.cursor(), Point::new(540.0, 1320.0));
        assert_eq!(dispatcher.in_flight(), None);
        assert_eq!(dispatcher.pending(), None);
    }

    #[test]
    fn test_tap_event_dispatches_zero_length_stroke() {
        // Arrange
        let sink = RecordingSink::new();
        let mut dispatcher = StrokeDispatcher::new(&target());

        // Act
        dispatcher.handle_event(
            GestureEvent::Tap { at: Point::new(200.0, 400.0) },
            &target(),
            &tuning(),
            &sink,
        );

        // Assert
        let requests = sink.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].from, Point::new(200.0, 400.0));
        assert_eq!(requests[0].to, Point::new(200.0, 400.0));
        assert_eq!(requests[0].duration_ms, 100);
        assert_eq!(dispatcher.in_flight(), Some(sink.last_handle()));
    }

    #[test]
    fn test_second_event_while_busy_is_staged_not_dispatched() {
        // Arrange
        let sink = RecordingSink::new();
        let mut dispatcher = StrokeDispatcher::new(&target());
        dispatcher.handle_event(
            GestureEvent::DragUpdate { target: Point::new(100.0, 100.0) },
            &target(),
            &tuning(),
            &sink,
        );

        // Act – the first stroke has not completed yet
        dispatcher.handle_event(
            GestureEvent::DragUpdate { target: Point::new(150.0, 150.0) },
            &target(),
            &tuning(),
            &sink,
        );

        // Assert – only one stroke reached the sink
        assert_eq!(sink.request_count(), 1);
        assert_eq!(
            dispatcher.pending(),
            Some(PendingDispatch::MoveTo { target: Point::new(150.0, 150.0) })
        );
    }

    #[test]
    fn test_staged_request_replaced_by_latest_event() {
        // Arrange
        let sink = RecordingSink::new();
        let mut dispatcher = StrokeDispatcher::new(&target());
        dispatcher.handle_event(
            GestureEvent::DragUpdate { target: Point::new(100.0, 100.0) },
            &target(),
            &tuning(),
            &sink,
        );

        // Act – three updates arrive while the sink is busy
        for x in [110.0, 120.0, 130.0] {
            dispatcher.handle_event(
                GestureEvent::DragUpdate { target: Point::new(x, 100.0) },
                &target(),
                &tuning(),
                &sink,
            );
        }

        // Assert – only the newest survives
        assert_eq!(
            dispatcher.pending(),
            Some(PendingDispatch::MoveTo { target: Point::new(130.0, 100.0) })
        );
        assert_eq!(sink.request_count(), 1);
    }

    #[test]
    fn test_completion_replays_staged_request() {
        // Arrange
        let sink = RecordingSink::new();
        let mut dispatcher = StrokeDispatcher::new(&target());
        dispatcher.handle_event(
            GestureEvent::DragUpdate { target: Point::new(100.0, 100.0) },
            &target(),
            &tuning(),
            &sink,
        );
        let first = sink.last_handle();
        dispatcher.handle_event(
            GestureEvent::DragUpdate { target: Point::new(200.0, 200.0) },
            &target(),
            &tuning(),
            &sink,
        );

        // Act
        dispatcher.on_completed(first, &target(), &tuning(), &sink);

        // Assert – the staged move went out immediately
        let requests = sink.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].from, Point::new(100.0, 100.0));
        assert_eq!(requests[1].to, Point::new(200.0, 200.0));
        assert_eq!(dispatcher.pending(), None);
        assert_eq!(dispatcher.in_flight(), Some(sink.last_handle()));
    }

    #[test]
    fn test_completion_without_staged_request_leaves_sink_idle() {
        // Arrange
        let sink = RecordingSink::new();
        let mut dispatcher = StrokeDispatcher::new(&target());
        dispatcher.handle_event(
            GestureEvent::Tap { at: Point::new(50.0, 50.0) },
            &target(),
            &tuning(),
            &sink,
        );
        let handle = sink.last_handle();

        // Act
        dispatcher.on_completed(handle, &target(), &tuning(), &sink);

        // Assert
        assert_eq!(dispatcher.in_flight(), None);
        assert_eq!(sink.request_count(), 1);
    }

    #[test]
    fn test_cancellation_discards_staged_request() {
        // Arrange
        let sink = RecordingSink::new();
        let mut dispatcher = StrokeDispatcher::new(&target());
        dispatcher.handle_event(
            GestureEvent::DragUpdate { target: Point::new(100.0, 100.0) },
            &target(),
            &tuning(),
            &sink,
        );
        let handle = sink.last_handle();
        dispatcher.handle_event(
            GestureEvent::DragUpdate { target: Point::new(200.0, 200.0) },
            &target(),
            &tuning(),
            &sink,
        );

        // Act
        dispatcher.on_cancelled(handle);

        // Assert – nothing replayed, nothing retried
        assert_eq!(dispatcher.in_flight(), None);
        assert_eq!(dispatcher.pending(), None);
        assert_eq!(sink.request_count(), 1);
    }

    #[test]
    fn test_stale_completion_handle_is_ignored() {
        // Arrange
        let sink = RecordingSink::new();
        let mut dispatcher = StrokeDispatcher::new(&target());
        dispatcher.handle_event(
            GestureEvent::Tap { at: Point::new(50.0, 50.0) },
            &target(),
            &tuning(),
            &sink,
        );
        let current = dispatcher.in_flight();

        // Act – a handle the dispatcher never issued
        dispatcher.on_completed(new_dispatch_handle(), &target(), &tuning(), &sink);

        // Assert – the real stroke is still in flight
        assert_eq!(dispatcher.in_flight(), current);
    }

    #[test]
    fn test_stale_cancellation_handle_is_ignored() {
        // Arrange
        let sink = RecordingSink::new();
        let mut dispatcher = StrokeDispatcher::new(&target());
        dispatcher.handle_event(
            GestureEvent::DragUpdate { target: Point::new(100.0, 100.0) },
            &target(),
            &tuning(),
            &sink,
        );
        dispatcher.handle_event(
            GestureEvent::DragUpdate { target: Point::new(200.0, 200.0) },
            &target(),
            &tuning(),
            &sink,
        );

        // Act
        dispatcher.on_cancelled(new_dispatch_handle());

        // Assert – in-flight and staged request both survive
        assert!(dispatcher.in_flight().is_some());
        assert!(dispatcher.pending().is_some());
    }

    #[test]
    fn test_drag_update_moves_cursor_to_target() {
        // Arrange
        let sink = RecordingSink::new();
        let mut dispatcher = StrokeDispatcher::new(&target());

        // Act
        dispatcher.handle_event(
            GestureEvent::DragUpdate { target: Point::new(300.0, 700.0) },
            &target(),
            &tuning(),
            &sink,
        );

        // Assert – the stroke ran from the center to the target
        let requests = sink.requests();
        assert_eq!(requests[0].from, Point::new(540.0, 1320.0));
        assert_eq!(requests[0].to, Point::new(300.0, 700.0));
        assert_eq!(requests[0].duration_ms, 40);
        assert_eq!(dispatcher.cursor(), Point::new(300.0, 700.0));
    }

    #[test]
    fn test_consecutive_drag_strokes_chain_from_previous_endpoint() {
        // Arrange
        let sink = RecordingSink::new();
        let mut dispatcher = StrokeDispatcher::new(&target());
        dispatcher.handle_event(
            GestureEvent::DragUpdate { target: Point::new(300.0, 700.0) },
            &target(),
            &tuning(),
            &sink,
        );
        dispatcher.on_completed(sink.last_handle(), &target(), &tuning(), &sink);

        // Act
        dispatcher.handle_event(
            GestureEvent::DragUpdate { target: Point::new(400.0, 800.0) },
            &target(),
            &tuning(),
            &sink,
        );

        // Assert
        let requests = sink.requests();
        assert_eq!(requests[1].from, Point::new(300.0, 700.0));
        assert_eq!(requests[1].to, Point::new(400.0, 800.0));
    }

    #[test]
    fn test_scroll_stroke_leaves_cursor_unchanged() {
        // Arrange
        let sink = RecordingSink::new();
        let mut dispatcher = StrokeDispatcher::new(&target());
        let before = dispatcher.cursor();

        // Act
        dispatcher.handle_event(
            GestureEvent::ScrollDelta { delta_y: 200.0 },
            &target(),
            &tuning(),
            &sink,
        );

        // Assert – swipe runs through the center, cursor stays put
        let requests = sink.requests();
        assert_eq!(requests[0].from, Point::new(540.0, 1320.0));
        assert_eq!(requests[0].to, Point::new(540.0, 1320.0 + 200.0 * 0.6));
        assert_eq!(dispatcher.cursor(), before);
    }

    #[test]
    fn test_drag_end_clears_drag_target_and_settles() {
        // Arrange
        let sink = RecordingSink::new();
        let mut dispatcher = StrokeDispatcher::new(&target());
        dispatcher.handle_event(
            GestureEvent::DragUpdate { target: Point::new(300.0, 700.0) },
            &target(),
            &tuning(),
            &sink,
        );
        dispatcher.on_completed(sink.last_handle(), &target(), &tuning(), &sink);

        // Act
        dispatcher.handle_event(
            GestureEvent::DragEnd { at: Point::new(320.0, 710.0) },
            &target(),
            &tuning(),
            &sink,
        );
        dispatcher.on_completed(sink.last_handle(), &target(), &tuning(), &sink);

        // Assert – settle stroke dispatched, nudge ticks now do nothing
        let requests = sink.requests();
        assert_eq!(requests[1].to, Point::new(320.0, 710.0));
        assert_eq!(requests[1].duration_ms, 40);
        dispatcher.nudge_tick(&target(), &tuning(), &sink);
        assert_eq!(sink.request_count(), 2);
    }

    #[test]
    fn test_tap_staged_while_busy_is_performed_as_tap() {
        // Arrange – a drag settle is still rendering when the tap arrives
        let sink = RecordingSink::new();
        let mut dispatcher = StrokeDispatcher::new(&target());
        dispatcher.handle_event(
            GestureEvent::DragEnd { at: Point::new(100.0, 100.0) },
            &target(),
            &tuning(),
            &sink,
        );
        let settle = sink.last_handle();
        dispatcher.handle_event(
            GestureEvent::Tap { at: Point::new(500.0, 600.0) },
            &target(),
            &tuning(),
            &sink,
        );
        assert_eq!(
            dispatcher.pending(),
            Some(PendingDispatch::Tap { at: Point::new(500.0, 600.0) })
        );

        // Act
        dispatcher.on_completed(settle, &target(), &tuning(), &sink);

        // Assert – replayed as a zero-length click, not a movement stroke
        let requests = sink.requests();
        assert_eq!(requests[1].from, Point::new(500.0, 600.0));
        assert_eq!(requests[1].to, Point::new(500.0, 600.0));
        assert_eq!(requests[1].duration_ms, 100);
    }

    #[test]
    fn test_nudge_tick_advances_toward_unreached_drag_target() {
        // Arrange – the staged move is lost to a cancellation, leaving the
        // cursor short of the drag target with an idle sink
        let sink = RecordingSink::new();
        let mut dispatcher = StrokeDispatcher::new(&target());
        dispatcher.handle_event(
            GestureEvent::DragUpdate { target: Point::new(100.0, 100.0) },
            &target(),
            &tuning(),
            &sink,
        );
        let first = sink.last_handle();
        dispatcher.handle_event(
            GestureEvent::DragUpdate { target: Point::new(700.0, 900.0) },
            &target(),
            &tuning(),
            &sink,
        );
        dispatcher.on_cancelled(first);

        // Act
        dispatcher.nudge_tick(&target(), &tuning(), &sink);

        // Assert – one nudge from the stalled cursor to the drag target
        let requests = sink.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].from, Point::new(100.0, 100.0));
        assert_eq!(requests[1].to, Point::new(700.0, 900.0));
    }

    #[test]
    fn test_nudge_tick_without_drag_target_does_nothing() {
        // Arrange
        let sink = RecordingSink::new();
        let mut dispatcher = StrokeDispatcher::new(&target());

        // Act
        dispatcher.nudge_tick(&target(), &tuning(), &sink);

        // Assert
        assert_eq!(sink.request_count(), 0);
    }

    #[test]
    fn test_nudge_tick_skips_while_stroke_in_flight() {
        // Arrange
        let sink = RecordingSink::new();
        let mut dispatcher = StrokeDispatcher::new(&target());
        dispatcher.handle_event(
            GestureEvent::DragUpdate { target: Point::new(100.0, 100.0) },
            &target(),
            &tuning(),
            &sink,
        );

        // Act
        dispatcher.nudge_tick(&target(), &tuning(), &sink);

        // Assert – no extra stroke while one is rendering
        assert_eq!(sink.request_count(), 1);
    }

    #[test]
    fn test_nudge_tick_skips_when_cursor_already_at_target() {
        // Arrange
        let sink = RecordingSink::new();
        let mut dispatcher = StrokeDispatcher::new(&target());
        dispatcher.handle_event(
            GestureEvent::DragUpdate { target: Point::new(100.0, 100.0) },
            &target(),
            &tuning(),
            &sink,
        );
        dispatcher.on_completed(sink.last_handle(), &target(), &tuning(), &sink);

        // Act
        dispatcher.nudge_tick(&target(), &tuning(), &sink);

        // Assert
        assert_eq!(sink.request_count(), 1);
    }

    #[test]
    fn test_sink_unavailable_drops_stroke_without_retry() {
        // Arrange
        let sink = RecordingSink::new();
        sink.set_should_fail(true);
        let mut dispatcher = StrokeDispatcher::new(&target());
        let before = dispatcher.cursor();

        // Act
        dispatcher.handle_event(
            GestureEvent::Tap { at: Point::new(50.0, 50.0) },
            &target(),
            &tuning(),
            &sink,
        );

        // Assert – slot empty, nothing staged, cursor untouched
        assert_eq!(dispatcher.in_flight(), None);
        assert_eq!(dispatcher.pending(), None);
        assert_eq!(dispatcher.cursor(), before);

        // A later event dispatches normally once the sink recovers
        sink.set_should_fail(false);
        dispatcher.handle_event(
            GestureEvent::Tap { at: Point::new(60.0, 60.0) },
            &target(),
            &tuning(),
            &sink,
        );
        assert_eq!(sink.request_count(), 1);
    }

    #[test]
    fn test_stroke_endpoints_clamped_into_target_surface() {
        // Arrange
        let sink = RecordingSink::new();
        let mut dispatcher = StrokeDispatcher::new(&target());

        // Act – drag target far outside the surface
        dispatcher.handle_event(
            GestureEvent::DragUpdate { target: Point::new(-50.0, 9000.0) },
            &target(),
            &tuning(),
            &sink,
        );

        // Assert – endpoint pinned to the addressable range
        let requests = sink.requests();
        assert_eq!(requests[0].to, Point::new(0.0, 2639.0));
        assert_eq!(dispatcher.cursor(), Point::new(0.0, 2639.0));
    }

    #[test]
    fn test_retarget_clamps_cursor_into_new_surface() {
        // Arrange
        let sink = RecordingSink::new();
        let mut dispatcher = StrokeDispatcher::new(&target());
        dispatcher.handle_event(
            GestureEvent::DragUpdate { target: Point::new(900.0, 2500.0) },
            &target(),
            &tuning(),
            &sink,
        );

        // Act – the target surface shrinks
        let smaller = SurfaceGeometry::new(480.0, 640.0);
        dispatcher.retarget(&smaller);

        // Assert
        assert_eq!(dispatcher.cursor(), Point::new(479.0, 639.0));
    }

    #[test]
    fn test_abort_interaction_discards_drag_state_and_staged_request() {
        // Arrange
        let sink = RecordingSink::new();
        let mut dispatcher = StrokeDispatcher::new(&target());
        dispatcher.handle_event(
            GestureEvent::DragUpdate { target: Point::new(100.0, 100.0) },
            &target(),
            &tuning(),
            &sink,
        );
        dispatcher.handle_event(
            GestureEvent::DragUpdate { target: Point::new(200.0, 200.0) },
            &target(),
            &tuning(),
            &sink,
        );

        // Act
        dispatcher.abort_interaction();

        // Assert – staged request gone, nudge ticks inert, in-flight left alone
        assert_eq!(dispatcher.pending(), None);
        assert!(dispatcher.in_flight().is_some());
        dispatcher.on_completed(sink.last_handle(), &target(), &tuning(), &sink);
        dispatcher.nudge_tick(&target(), &tuning(), &sink);
        assert_eq!(sink.request_count(), 1);
    }
}
