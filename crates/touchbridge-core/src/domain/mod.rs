//! Domain model for TouchBridge.
//!
//! Everything in this module is pure business logic: no OS calls, no
//! timers, no channels, no sinks. It compiles and tests anywhere.
//!
//! # Why the split matters (for beginners)
//!
//! The hard part of touch-to-gesture translation is not talking to a
//! display or a gesture API; it is deciding, sample by sample, what an
//! in-progress interaction *means* (tap? drag? two-finger scroll?) and
//! what stroke should be synthesized for it. Those decisions live here
//! as plain functions over plain data, so they can be unit-tested with
//! nothing but constructed samples. The engine crate wraps this model
//! with the concurrency, configuration, and collaborator plumbing.
//!
//! # Sub-modules
//!
//! - **`geometry`** – surface dimensions and the proportional
//!   source→target point mapping.
//! - **`interaction`** – the per-interaction classifier state machine
//!   that turns raw samples into semantic gesture events.
//! - **`policy`** – runtime-tunable thresholds and stroke timing.
//! - **`stroke`** – construction of the timed synthetic strokes the
//!   gesture sink consumes.

pub mod geometry;
pub mod interaction;
pub mod policy;
pub mod stroke;
