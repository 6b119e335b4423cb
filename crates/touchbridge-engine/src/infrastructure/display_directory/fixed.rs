//! Fixed display directory backed by configuration.
//!
//! Serves the geometry it was constructed with and republishes whatever
//! the runner pushes via [`FixedDisplayDirectory::update`] (the stdin
//! protocol's `target W H` command ends up here).

use tokio::sync::watch;
use tracing::debug;

use touchbridge_core::SurfaceGeometry;

use super::{DirectoryError, DisplayDirectory};

/// A [`DisplayDirectory`] whose geometry only changes when told to.
pub struct FixedDisplayDirectory {
    tx: watch::Sender<SurfaceGeometry>,
}

impl FixedDisplayDirectory {
    /// Creates a directory serving `geometry`.
    pub fn new(geometry: SurfaceGeometry) -> Self {
        let (tx, _rx) = watch::channel(geometry);
        Self { tx }
    }

    /// Publishes a new target geometry to every subscriber.
    pub fn update(&self, geometry: SurfaceGeometry) {
        debug!(
            width_px = geometry.width_px,
            height_px = geometry.height_px,
            "publishing target geometry"
        );
        self.tx.send_replace(geometry);
    }
}

impl DisplayDirectory for FixedDisplayDirectory {
    fn target_geometry(&self) -> Result<SurfaceGeometry, DirectoryError> {
        Ok(*self.tx.borrow())
    }

    fn watch_geometry(&self) -> watch::Receiver<SurfaceGeometry> {
        self.tx.subscribe()
    }
}
