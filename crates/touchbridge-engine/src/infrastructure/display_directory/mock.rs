//! Mock display directory for unit testing.
//!
//! Scripts geometry values and lookup failures so tests can exercise
//! wiring that has to survive a directory that cannot answer.

use std::sync::Mutex;

use tokio::sync::watch;

use touchbridge_core::SurfaceGeometry;

use super::{DirectoryError, DisplayDirectory};

/// A mock implementation of [`DisplayDirectory`] with scriptable failures.
pub struct MockDisplayDirectory {
    tx: watch::Sender<SurfaceGeometry>,
    should_fail: Mutex<bool>,
}

impl MockDisplayDirectory {
    /// Creates a mock serving `geometry`.
    pub fn new(geometry: SurfaceGeometry) -> Self {
        let (tx, _rx) = watch::channel(geometry);
        Self {
            tx,
            should_fail: Mutex::new(false),
        }
    }

    /// Replaces the served geometry and notifies watchers.
    pub fn set_geometry(&self, geometry: SurfaceGeometry) {
        self.tx.send_replace(geometry);
    }

    /// Makes subsequent lookups fail with [`DirectoryError::Unavailable`].
    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.lock().expect("lock poisoned") = fail;
    }
}

impl DisplayDirectory for MockDisplayDirectory {
    fn target_geometry(&self) -> Result<SurfaceGeometry, DirectoryError> {
        if *self.should_fail.lock().expect("lock poisoned") {
            return Err(DirectoryError::Unavailable {
                reason: "mock directory set to fail".to_string(),
            });
        }
        Ok(*self.tx.borrow())
    }

    fn watch_geometry(&self) -> watch::Receiver<SurfaceGeometry> {
        self.tx.subscribe()
    }
}
