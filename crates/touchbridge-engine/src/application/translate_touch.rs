//! TranslateTouchUseCase: turns raw touch samples into synthetic strokes.
//!
//! This use case is the heart of the engine. It receives touch samples
//! from the capture side, maps them onto the target surface, runs them
//! through the [`GestureClassifier`], and hands the resulting gesture
//! events to the [`StrokeDispatcher`].
//!
//! # Concurrency
//!
//! Samples, stroke completion reports, settings changes, and the nudge
//! driver all converge on one engine. A single mutex guards the whole
//! mutable state (classifier, surface mapping, thresholds, dispatcher),
//! so every observer sees classification and dispatch bookkeeping move
//! together; there is no window where a gesture event exists but its
//! dispatch decision does not.
//!
//! The gesture sink is called while that lock is held, which is why
//! [`GestureSink`] implementations must hand off quickly and report
//! completion from outside the call.
//!
//! # Nudge driver
//!
//! A drag can outrun the sink: updates arriving while a stroke renders
//! collapse into the single staged slot, and a cancellation may discard
//! even that. A dedicated thread ticks at the policy's nudge interval
//! and re-dispatches toward the drag target whenever a drag is live,
//! the sink is idle, and the virtual cursor has fallen behind. The
//! liveness check happens under the engine lock, so a drag that ended
//! a microsecond earlier can never be nudged.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, info, trace, warn};

use touchbridge_core::{
    DispatchHandle, GestureClassifier, InteractionState, Point, PolicyError, StrokeTuning,
    SurfaceGeometry, SurfaceMapping, ThresholdPolicy, TouchSample,
};

use crate::application::dispatch_strokes::{GestureSink, StrokeDispatcher};

// ── Engine state ──────────────────────────────────────────────────────────────

/// Everything the engine lock protects.
struct EngineState {
    classifier: GestureClassifier,
    mapping: SurfaceMapping,
    /// Thresholds in force for the interaction currently being classified.
    active_policy: ThresholdPolicy,
    /// Thresholds applied at the start of the next interaction.
    staged_policy: ThresholdPolicy,
    tuning: StrokeTuning,
    enabled: bool,
    dispatcher: StrokeDispatcher,
}

/// Shared core handed to the nudge driver thread.
struct EngineInner {
    state: Mutex<EngineState>,
    sink: Arc<dyn GestureSink>,
    running: AtomicBool,
}

/// The translation engine facade.
///
/// All methods take `&self`; the engine can be shared freely behind an
/// [`Arc`] between the touch source, the settings surface, and the
/// sink's completion reporting.
pub struct TranslateTouchUseCase {
    inner: Arc<EngineInner>,
    driver: Mutex<Option<JoinHandle<()>>>,
}

impl TranslateTouchUseCase {
    /// Creates an engine mapping `source` onto `target` and starts its
    /// nudge driver thread.
    ///
    /// The virtual cursor starts at the center of the target surface.
    pub fn new(
        source: SurfaceGeometry,
        target: SurfaceGeometry,
        policy: ThresholdPolicy,
        tuning: StrokeTuning,
        sink: Arc<dyn GestureSink>,
    ) -> Self {
        let inner = Arc::new(EngineInner {
            state: Mutex::new(EngineState {
                classifier: GestureClassifier::new(),
                mapping: SurfaceMapping::new(source, target),
                active_policy: policy,
                staged_policy: policy,
                tuning,
                enabled: true,
                dispatcher: StrokeDispatcher::new(&target),
            }),
            sink,
            running: AtomicBool::new(true),
        });

        let driver = spawn_nudge_driver(Arc::clone(&inner));

        Self {
            inner,
            driver: Mutex::new(Some(driver)),
        }
    }

    /// Feeds one touch sample through classification and dispatch.
    ///
    /// `source` is the geometry of the surface the sample's coordinates
    /// are expressed in; passing it per sample keeps the mapping pair in
    /// step with rotation or sensor changes on the capture side.
    ///
    /// Bad input never escapes: samples with invalid geometry, rewound
    /// timestamps, or missing pointers are logged and dropped.
    pub fn submit_sample(&self, sample: TouchSample, source: SurfaceGeometry) {
        let mut state = self.inner.state.lock().expect("engine lock poisoned");

        if !state.enabled {
            trace!(timestamp_ms = sample.timestamp_ms, "translation disabled; sample dropped");
            return;
        }

        // An unusable capture geometry must not reach engine state.
        if let Err(err) = source.validate() {
            debug!(%err, timestamp_ms = sample.timestamp_ms, "sample dropped");
            return;
        }

        // Settings changes take effect on interaction boundaries.
        if matches!(state.classifier.state(), InteractionState::Idle) {
            state.active_policy = state.staged_policy;
        }

        state.mapping.source = source;

        let mapped = match sample.primary() {
            Some(primary) => {
                match state.mapping.map(Point::new(primary.x, primary.y)) {
                    Ok(p) => Some(p),
                    Err(err) => {
                        debug!(%err, timestamp_ms = sample.timestamp_ms, "sample dropped");
                        return;
                    }
                }
            }
            None => None,
        };

        let scroll_scale = state.mapping.scroll_scale();
        let policy = state.active_policy;
        let events = match state.classifier.advance(&sample, mapped, scroll_scale, &policy) {
            Ok(events) => events,
            Err(err) => {
                debug!(%err, "sample dropped");
                return;
            }
        };

        let target = state.mapping.target;
        let tuning = state.tuning;
        for event in events {
            trace!(?event, "gesture classified");
            state
                .dispatcher
                .handle_event(event, &target, &tuning, self.inner.sink.as_ref());
        }
    }

    /// Reports that the sink finished rendering `handle`.
    ///
    /// A staged request, if any, is dispatched before this returns.
    pub fn on_stroke_completed(&self, handle: DispatchHandle) {
        let mut state = self.inner.state.lock().expect("engine lock poisoned");
        let target = state.mapping.target;
        let tuning = state.tuning;
        state
            .dispatcher
            .on_completed(handle, &target, &tuning, self.inner.sink.as_ref());
    }

    /// Reports that the sink abandoned `handle`; the staged request is
    /// discarded along with it.
    pub fn on_stroke_cancelled(&self, handle: DispatchHandle) {
        let mut state = self.inner.state.lock().expect("engine lock poisoned");
        state.dispatcher.on_cancelled(handle);
    }

    /// Replaces the target surface geometry.
    ///
    /// Takes effect for the very next sample; the virtual cursor is
    /// clamped into the new surface.
    pub fn set_target_geometry(&self, target: SurfaceGeometry) {
        let mut state = self.inner.state.lock().expect("engine lock poisoned");
        state.mapping.target = target;
        state.dispatcher.retarget(&target);
        info!(
            width_px = target.width_px,
            height_px = target.height_px,
            "target surface updated"
        );
    }

    /// Current target surface geometry.
    pub fn target_geometry(&self) -> SurfaceGeometry {
        self.inner.state.lock().expect("engine lock poisoned").mapping.target
    }

    /// Stages a new threshold policy, applied when the next interaction
    /// begins. The interaction in progress keeps the thresholds it
    /// started with.
    ///
    /// # Errors
    ///
    /// Returns the [`PolicyError`] from validation; an invalid policy is
    /// not staged.
    pub fn set_policy(&self, policy: ThresholdPolicy) -> Result<(), PolicyError> {
        policy.validate()?;
        let mut state = self.inner.state.lock().expect("engine lock poisoned");
        state.staged_policy = policy;
        info!(
            movement_scale = policy.movement_scale,
            tap_max_duration_ms = policy.tap_max_duration_ms,
            "threshold policy staged"
        );
        Ok(())
    }

    /// The most recently staged threshold policy.
    pub fn policy(&self) -> ThresholdPolicy {
        self.inner.state.lock().expect("engine lock poisoned").staged_policy
    }

    /// Turns translation on or off.
    ///
    /// Disabling mid-interaction resets classification and discards the
    /// drag target and any staged stroke; an in-flight stroke finishes
    /// on its own. Samples arriving while disabled are dropped.
    pub fn set_enabled(&self, enabled: bool) {
        let mut state = self.inner.state.lock().expect("engine lock poisoned");
        if state.enabled == enabled {
            return;
        }
        state.enabled = enabled;
        if !enabled {
            state.classifier.reset();
            state.dispatcher.abort_interaction();
        }
        info!(enabled, "translation gate changed");
    }

    /// Whether translation is currently enabled.
    pub fn is_enabled(&self) -> bool {
        self.inner.state.lock().expect("engine lock poisoned").enabled
    }

    /// Current classification state (for diagnostics).
    pub fn interaction_state(&self) -> InteractionState {
        self.inner
            .state
            .lock()
            .expect("engine lock poisoned")
            .classifier
            .state()
            .clone()
    }

    /// Current virtual cursor position on the target surface.
    pub fn virtual_cursor(&self) -> Point {
        self.inner.state.lock().expect("engine lock poisoned").dispatcher.cursor()
    }

    /// Handle of the stroke currently rendering, if any.
    pub fn in_flight_stroke(&self) -> Option<DispatchHandle> {
        self.inner.state.lock().expect("engine lock poisoned").dispatcher.in_flight()
    }

    /// Stops the nudge driver thread and waits for it to exit.
    pub fn shutdown(&self) {
        self.stop_driver();
        info!("translation engine stopped");
    }

    fn stop_driver(&self) {
        self.inner.running.store(false, Ordering::Relaxed);
        if let Ok(mut guard) = self.driver.lock() {
            if let Some(handle) = guard.take() {
                if handle.join().is_err() {
                    warn!("nudge driver thread panicked");
                }
            }
        }
    }
}

impl Drop for TranslateTouchUseCase {
    fn drop(&mut self) {
        self.stop_driver();
    }
}

// ── Nudge driver thread ───────────────────────────────────────────────────────

fn spawn_nudge_driver(inner: Arc<EngineInner>) -> JoinHandle<()> {
    std::thread::Builder::new()
        .name("nudge-driver".to_string())
        .spawn(move || nudge_loop(inner))
        .expect("failed to spawn nudge driver thread")
}

/// Periodic loop re-dispatching drag movement the staged slot lost.
///
/// Each pass takes the engine lock once: the drag liveness check and
/// the tick itself happen under the same guard. The sleep interval is
/// re-read every pass so policy changes take effect without a restart.
fn nudge_loop(inner: Arc<EngineInner>) {
    loop {
        let interval_ms = {
            let mut state = inner.state.lock().expect("engine lock poisoned");
            if state.enabled && state.classifier.is_drag_live() {
                let target = state.mapping.target;
                let tuning = state.tuning;
                state.dispatcher.nudge_tick(&target, &tuning, inner.sink.as_ref());
            }
            state.active_policy.nudge_interval_ms
        };

        std::thread::sleep(Duration::from_millis(interval_ms));
        if !inner.running.load(Ordering::Relaxed) {
            break;
        }
    }
    debug!("nudge driver stopped");
}

// ── Tests ─────────────────────────────────────────────────────────────────────
