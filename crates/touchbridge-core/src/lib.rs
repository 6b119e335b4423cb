//! # touchbridge-core
//!
//! Domain model for TouchBridge: classification of raw multi-touch
//! samples and synthesis of timed pointer strokes.
//!
//! This crate has zero dependencies on OS APIs, async runtimes, or I/O;
//! it is consumed by the engine application crate.
//!
//! # Architecture overview (for beginners)
//!
//! TouchBridge bridges two very different surfaces. On one side sits a
//! small touch surface that emits a continuous stream of raw samples
//! (pointer positions, a phase code, a timestamp). On the other side
//! sits a large display whose only pointer input is a *synthetic
//! stroke*: a timed down→move→up path with an explicit duration. There
//! is no "move the cursor to (x, y)" call on that side at all.
//!
//! This crate defines the model that makes the translation testable:
//!
//! - **`domain::geometry`** – both surfaces' dimensions and the exact
//!   proportional mapping between their pixel spaces.
//!
//! - **`domain::interaction`** – a state machine that watches one
//!   interaction (first finger down → last finger up) and decides
//!   whether it is a tap, a drag, or a two-finger scroll, emitting
//!   semantic events as it goes.
//!
//! - **`domain::policy`** – the tunable thresholds behind those
//!   decisions (tap window, movement tolerance, nudge cadence).
//!
//! - **`domain::stroke`** – constructors for the bounded-duration
//!   strokes that the engine dispatches toward the display.

pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `touchbridge_core::GestureEvent` instead of the full module path.
pub use domain::geometry::{map_point, GeometryError, Point, SurfaceGeometry, SurfaceMapping};
pub use domain::interaction::{
    GestureClassifier, GestureEvent, InteractionState, PointerSample, SampleError, SingleTouch,
    TouchPhase, TouchSample, TwoFingerPan,
};
pub use domain::policy::{
    PolicyError, StrokeTuning, ThresholdPolicy, MOVEMENT_SCALE_MAX, MOVEMENT_SCALE_MIN,
};
pub use domain::stroke::{new_dispatch_handle, DispatchHandle, DispatchRequest};
