//! Gesture sink back-ends.
//!
//! Implementations of the application layer's
//! [`GestureSink`](crate::application::dispatch_strokes::GestureSink)
//! port. The engine only ever sees the trait; which back-end renders
//! the strokes is decided at wiring time in `main`.
//!
//! # Sub-modules
//!
//! - **`logging`** – Renders each stroke as a structured log line and
//!   schedules its completion report after the stroke duration. The
//!   back-end for the headless runner, and a template for wiring a real
//!   injection service: dispatch returns immediately, completion comes
//!   later from outside the engine lock.
//!
//! - **`mock`** – Records every dispatched stroke for assertions in
//!   unit and integration tests.

pub mod logging;
pub mod mock;
