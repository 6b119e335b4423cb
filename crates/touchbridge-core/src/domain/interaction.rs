//! Touch interaction classification.
//!
//! A single interaction runs from the first finger down to the last
//! finger up. The classifier is an explicit state machine over one
//! [`InteractionState`]:
//!
//! ```text
//!        Down (1 ptr)              ≥2 pointers
//! Idle ───────────────► SingleActive ───────────► TwoFingerActive
//!   ▲                        │                          │
//!   │     Up/Cancel          │                          │  <2 pointers
//!   └────────────────────────┴──────────────────────────┘
//! ```
//!
//! Transitions are pure: `(state, sample) -> (state, events)`. The
//! [`GestureClassifier`] wrapper adds the monotonic-timestamp guard and
//! owns the current state, which keeps every branch unit-testable
//! without a sink or a timer in sight.
//!
//! Pointer count always beats the nominal phase code: the moment a
//! sample reports two or more pointers it is routed to the two-finger
//! path, and an in-progress single-finger drag is abandoned without a
//! terminating event.

use thiserror::Error;
use tracing::trace;

use crate::domain::geometry::Point;
use crate::domain::policy::ThresholdPolicy;

/// Phase code reported by the touch source for one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    /// First pointer landed.
    Down,
    /// One or more pointers moved.
    Move,
    /// Last pointer lifted.
    Up,
    /// The source aborted the interaction.
    Cancel,
    /// An additional pointer landed.
    PointerDown,
    /// A non-final pointer lifted.
    PointerUp,
}

/// One pointer's position within a sample, in source-surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    /// Source-assigned pointer id, stable for the pointer's lifetime.
    pub id: u32,
    pub x: f64,
    pub y: f64,
}

/// A raw multi-touch sample from the touch source. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchSample {
    /// Active pointers, in source order. The first entry is the primary.
    pub pointers: Vec<PointerSample>,
    pub phase: TouchPhase,
    /// Milliseconds on the source's monotonic clock.
    pub timestamp_ms: u64,
}

impl TouchSample {
    pub fn new(phase: TouchPhase, pointers: Vec<PointerSample>, timestamp_ms: u64) -> Self {
        Self {
            pointers,
            phase,
            timestamp_ms,
        }
    }

    /// The primary pointer, if any pointer is present.
    pub fn primary(&self) -> Option<&PointerSample> {
        self.pointers.first()
    }

    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }
}

/// Semantic events produced by classification, positions in target space.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureEvent {
    /// A short stationary touch ended; click at `at`.
    Tap { at: Point },
    /// The drag target advanced to `target`.
    DragUpdate { target: Point },
    /// The drag ended; settle the pointer at `at`.
    DragEnd { at: Point },
    /// Two-finger vertical pan moved by `delta_y` target pixels
    /// (already scaled by surface ratio and movement scale).
    ScrollDelta { delta_y: f64 },
}

/// Bookkeeping for a single-finger interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleTouch {
    /// Timestamp of the initiating Down sample.
    pub down_time_ms: u64,
    /// Mapped position of the initiating Down sample.
    pub down_pos: Point,
    /// Mapped position of the last emitted drag update (or `down_pos`).
    pub last_pos: Point,
    /// Set once cumulative displacement disqualifies a tap.
    pub moved_beyond_tap: bool,
    /// Set once at least one `DragUpdate` has been emitted.
    pub drag_started: bool,
}

/// Bookkeeping for a two-finger pan.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoFingerPan {
    /// Average y of the first two pointers, source space.
    pub last_avg_y: f64,
}

/// The classifier's per-interaction state. Exactly one exists per engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    SingleActive(SingleTouch),
    TwoFingerActive(TwoFingerPan),
}

impl InteractionState {
    /// Variant name for diagnostics.
    fn label(&self) -> &'static str {
        match self {
            InteractionState::Idle => "Idle",
            InteractionState::SingleActive(_) => "SingleActive",
            InteractionState::TwoFingerActive(_) => "TwoFingerActive",
        }
    }
}

/// Errors for samples the classifier refuses to consume.
///
/// A rejected sample is dropped without mutating any state; bad input
/// never regresses classification.
#[derive(Debug, Error, PartialEq)]
pub enum SampleError {
    /// The sample's timestamp precedes the last accepted one.
    #[error("out-of-order sample: {timestamp_ms}ms precedes last seen {last_seen_ms}ms")]
    OutOfOrderSample {
        timestamp_ms: u64,
        last_seen_ms: u64,
    },

    /// The sample's phase requires pointer data it does not carry.
    #[error("malformed sample: {reason}")]
    MalformedSample { reason: &'static str },
}

/// State machine wrapper: owns the current [`InteractionState`] and the
/// monotonic-clock guard.
#[derive(Debug, Default)]
pub struct GestureClassifier {
    state: InteractionState,
    last_seen_ms: Option<u64>,
}

impl GestureClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// `true` while a single-finger drag has started and not yet ended;
    /// this is the window in which the periodic nudge driver acts.
    pub fn is_drag_live(&self) -> bool {
        matches!(&self.state, InteractionState::SingleActive(s) if s.drag_started)
    }

    /// Forces the state machine back to `Idle` (used when the engine is
    /// disabled mid-interaction). The timestamp guard is kept so stale
    /// samples from before the reset still fail the monotonic check.
    pub fn reset(&mut self) {
        self.state = InteractionState::Idle;
    }

    /// Consumes one sample and returns the semantic events it produced.
    ///
    /// `mapped_primary` is the primary pointer's position mapped into
    /// target space (absent when the sample carries no pointers), and
    /// `scroll_scale` is the vertical surface ratio applied to scroll
    /// deltas. Both are supplied by the engine so classification itself
    /// never touches surface geometry.
    ///
    /// # Errors
    ///
    /// [`SampleError::OutOfOrderSample`] if the timestamp went backwards,
    /// [`SampleError::MalformedSample`] if a Down/Move sample carries no
    /// pointers. State is untouched in both cases.
    pub fn advance(
        &mut self,
        sample: &TouchSample,
        mapped_primary: Option<Point>,
        scroll_scale: f64,
        policy: &ThresholdPolicy,
    ) -> Result<Vec<GestureEvent>, SampleError> {
        if let Some(last_seen_ms) = self.last_seen_ms {
            if sample.timestamp_ms < last_seen_ms {
                return Err(SampleError::OutOfOrderSample {
                    timestamp_ms: sample.timestamp_ms,
                    last_seen_ms,
                });
            }
        }

        let (next, events) = transition(
            self.state.clone(),
            sample,
            mapped_primary,
            scroll_scale,
            policy,
        )?;
        if std::mem::discriminant(&next) != std::mem::discriminant(&self.state) {
            // Also covers the silent two-finger collapse to Idle, which
            // emits no event the engine could log.
            trace!(
                from = self.state.label(),
                to = next.label(),
                timestamp_ms = sample.timestamp_ms,
                "interaction state changed"
            );
        }
        self.state = next;
        self.last_seen_ms = Some(sample.timestamp_ms);
        Ok(events)
    }
}

/// Pure transition function: `(state, sample) -> (state, events)`.
fn transition(
    state: InteractionState,
    sample: &TouchSample,
    mapped_primary: Option<Point>,
    scroll_scale: f64,
    policy: &ThresholdPolicy,
) -> Result<(InteractionState, Vec<GestureEvent>), SampleError> {
    // Pointer count wins over phase: ≥2 pointers is always the
    // two-finger path, whatever the nominal action code says.
    if sample.pointer_count() >= 2 {
        return Ok(two_finger_transition(state, sample, scroll_scale, policy));
    }

    match (state, sample.phase) {
        (InteractionState::Idle, TouchPhase::Down) => {
            let mapped = mapped_primary.ok_or(SampleError::MalformedSample {
                reason: "down sample carries no pointers",
            })?;
            let next = InteractionState::SingleActive(SingleTouch {
                down_time_ms: sample.timestamp_ms,
                down_pos: mapped,
                last_pos: mapped,
                moved_beyond_tap: false,
                drag_started: false,
            });
            Ok((next, Vec::new()))
        }

        // Stray moves/lifts with no tracked interaction are ignored.
        (InteractionState::Idle, _) => Ok((InteractionState::Idle, Vec::new())),

        (InteractionState::SingleActive(mut touch), TouchPhase::Move) => {
            let mapped = mapped_primary.ok_or(SampleError::MalformedSample {
                reason: "move sample carries no pointers",
            })?;

            let mut events = Vec::new();
            if mapped.distance_to(&touch.last_pos) >= policy.move_dispatch_px {
                events.push(GestureEvent::DragUpdate { target: mapped });
                touch.last_pos = mapped;
                touch.drag_started = true;
            }
            if mapped.manhattan_to(&touch.down_pos) > policy.tap_movement_px {
                touch.moved_beyond_tap = true;
            }
            Ok((InteractionState::SingleActive(touch), events))
        }

        (InteractionState::SingleActive(touch), TouchPhase::Up | TouchPhase::Cancel) => {
            let at = mapped_primary.unwrap_or(touch.last_pos);
            let duration_ms = sample.timestamp_ms.saturating_sub(touch.down_time_ms);
            let event = if !touch.moved_beyond_tap && duration_ms < policy.tap_max_duration_ms {
                GestureEvent::Tap { at }
            } else {
                GestureEvent::DragEnd { at }
            };
            Ok((InteractionState::Idle, vec![event]))
        }

        // Secondary-pointer noise while tracking a single finger.
        (state @ InteractionState::SingleActive(_), _) => Ok((state, Vec::new())),

        // Any sample with fewer than two pointers ends a two-finger pan;
        // the pan stops silently, no terminal event.
        (InteractionState::TwoFingerActive(_), _) => Ok((InteractionState::Idle, Vec::new())),
    }
}

/// Two-finger path. Callers guarantee `sample.pointer_count() >= 2`.
fn two_finger_transition(
    state: InteractionState,
    sample: &TouchSample,
    scroll_scale: f64,
    policy: &ThresholdPolicy,
) -> (InteractionState, Vec<GestureEvent>) {
    let avg_y = (sample.pointers[0].y + sample.pointers[1].y) / 2.0;

    match (state, sample.phase) {
        (InteractionState::TwoFingerActive(pan), TouchPhase::Move) => {
            let delta_y = (avg_y - pan.last_avg_y) * scroll_scale * policy.movement_scale;
            (
                InteractionState::TwoFingerActive(TwoFingerPan { last_avg_y: avg_y }),
                vec![GestureEvent::ScrollDelta { delta_y }],
            )
        }

        // Both remaining fingers lifted (or the source aborted) in one
        // sample: the pan is over.
        (_, TouchPhase::Up | TouchPhase::Cancel) => (InteractionState::Idle, Vec::new()),

        // Entering from Idle/SingleActive, or an extra pointer landed
        // mid-pan: (re-)anchor the average without emitting anything.
        // An abandoned single-finger drag is discarded here with no
        // DragEnd for the aborted segment.
        (_, _) => (
            InteractionState::TwoFingerActive(TwoFingerPan { last_avg_y: avg_y }),
            Vec::new(),
        ),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
