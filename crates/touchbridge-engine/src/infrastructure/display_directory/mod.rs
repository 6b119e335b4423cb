//! Display geometry lookup.
//!
//! The engine draws strokes on a surface whose pixel dimensions it does
//! not control; displays fold, rotate, and get reconfigured while the
//! engine runs. The [`DisplayDirectory`] trait abstracts where the
//! current target geometry comes from and how changes are announced.
//!
//! Change notification uses a `tokio::sync::watch` channel: subscribers
//! only ever observe the latest geometry, which is exactly the engine's
//! consumption model (intermediate topologies are worthless once a
//! newer one exists).
//!
//! # Sub-modules
//!
//! - **`fixed`** – Serves a configured geometry and lets the runner push
//!   updates at runtime.
//! - **`mock`**  – Scripts geometry and lookup failures for tests.

use thiserror::Error;
use tokio::sync::watch;

use touchbridge_core::SurfaceGeometry;

/// Error type for display geometry lookups.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// No geometry could be obtained from the underlying source.
    #[error("display geometry unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Trait abstracting target display geometry lookup.
pub trait DisplayDirectory: Send + Sync {
    /// Returns the current target surface geometry.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Unavailable`] when the underlying
    /// source cannot report a geometry.
    fn target_geometry(&self) -> Result<SurfaceGeometry, DirectoryError>;

    /// Returns a receiver that observes every subsequent geometry change.
    fn watch_geometry(&self) -> watch::Receiver<SurfaceGeometry>;
}

pub mod fixed;
pub mod mock;
