//! UpdateSettingsUseCase: validates and applies runtime settings changes.
//!
//! The settings surface (a slider, a CLI command, a config reload)
//! talks to this use case rather than to the engine directly. Changes
//! are validated or clamped here, staged into the engine for the next
//! interaction, and handed back to the caller so it can persist them.
//! The interaction the user is in the middle of is never retuned.

use std::sync::Arc;

use tracing::warn;

use touchbridge_core::{PolicyError, ThresholdPolicy};

use crate::application::translate_touch::TranslateTouchUseCase;

/// Applies user-facing settings changes to a live engine.
pub struct UpdateSettingsUseCase {
    engine: Arc<TranslateTouchUseCase>,
}

impl UpdateSettingsUseCase {
    /// Creates a new use case instance.
    pub fn new(engine: Arc<TranslateTouchUseCase>) -> Self {
        Self { engine }
    }

    /// Sets the movement scale, clamping it into the supported range,
    /// and returns the policy as staged (for persistence).
    pub fn set_movement_scale(&self, scale: f64) -> ThresholdPolicy {
        let staged = self.engine.policy().with_movement_scale(scale);
        // The scale was clamped above, so staging only fails if some
        // other threshold was already out of range.
        if let Err(err) = self.engine.set_policy(staged) {
            warn!(%err, scale, "movement scale change rejected");
        }
        self.engine.policy()
    }

    /// Replaces the whole threshold policy.
    ///
    /// # Errors
    ///
    /// Returns the [`PolicyError`] from validation; the engine keeps its
    /// previous policy.
    pub fn apply_thresholds(&self, policy: ThresholdPolicy) -> Result<(), PolicyError> {
        self.engine.set_policy(policy)
    }

    /// Turns translation on or off.
    pub fn set_enabled(&self, enabled: bool) {
        self.engine.set_enabled(enabled);
    }

    /// Whether translation is currently enabled.
    pub fn is_enabled(&self) -> bool {
        self.engine.is_enabled()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
