//! Touch sample sources.
//!
//! A touch source feeds the engine from outside the process: it owns a
//! reader thread, turns whatever transport it speaks into
//! [`SourceEvent`]s, and hands them to the runner over an async channel.
//! The `stdin` sub-module implements the line protocol the headless
//! binary speaks; a capture daemon or a device node reader would slot
//! in beside it with the same event vocabulary.

use thiserror::Error;

use touchbridge_core::{SurfaceGeometry, TouchSample};

pub mod stdin;

/// An event produced by a touch source.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEvent {
    /// A raw touch sample, together with the geometry of the surface it
    /// was captured on.
    Sample {
        sample: TouchSample,
        source: SurfaceGeometry,
    },
    /// The user pointed the engine at a different target surface.
    TargetGeometry(SurfaceGeometry),
    /// The user adjusted the movement scale.
    MovementScale(f64),
    /// The user toggled translation on or off.
    Enabled(bool),
    /// The source has no more input; the runner should wind down.
    Shutdown,
}

/// Error type for touch source startup.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The reader thread could not be spawned.
    #[error("failed to spawn touch source thread: {0}")]
    Spawn(#[source] std::io::Error),
}
