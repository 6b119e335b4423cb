//! Runtime-tunable classification thresholds and stroke timing.
//!
//! Every value here is configuration, not a hard-coded constant: the
//! engine re-reads the policy at the start of each interaction, so a
//! change applies to the next touch sequence without a restart while an
//! in-progress interaction keeps the snapshot it started with.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lower bound for the user-facing movement scale setting.
pub const MOVEMENT_SCALE_MIN: f64 = 0.5;

/// Upper bound for the user-facing movement scale setting.
pub const MOVEMENT_SCALE_MAX: f64 = 5.0;

/// Errors raised when validating a policy update.
#[derive(Debug, Error, PartialEq)]
pub enum PolicyError {
    /// A threshold that must be strictly positive was zero or negative.
    #[error("threshold `{name}` must be positive (got {value})")]
    NonPositive { name: &'static str, value: f64 },

    /// The movement scale fell outside the supported range.
    #[error(
        "movement scale {value} out of range \
         ({MOVEMENT_SCALE_MIN}..={MOVEMENT_SCALE_MAX})"
    )]
    MovementScaleOutOfRange { value: f64 },
}

/// Thresholds consumed by the gesture classifier and the nudge driver.
///
/// Defaults mirror the behavior of the system this engine re-implements:
/// a sub-250 ms touch that stays within 20 px is a tap, drag updates are
/// suppressed below ~1 px of movement, and the drag nudge loop ticks
/// every 50 ms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdPolicy {
    /// Maximum press duration for a lift to classify as a tap.
    pub tap_max_duration_ms: u64,
    /// Maximum Manhattan displacement (mapped px) for a tap.
    pub tap_movement_px: f64,
    /// Press duration after which a stationary hold counts as a long
    /// press. Carried for configurability; long holds currently settle
    /// through the drag path.
    pub long_press_ms: u64,
    /// Minimum movement (target px) before a drag update is emitted.
    pub move_dispatch_px: f64,
    /// Interval of the periodic drag nudge driver.
    pub nudge_interval_ms: u64,
    /// User-facing sensitivity multiplier, applied to scroll magnitude.
    pub movement_scale: f64,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            tap_max_duration_ms: 250,
            tap_movement_px: 20.0,
            long_press_ms: 600,
            move_dispatch_px: 1.0,
            nudge_interval_ms: 50,
            movement_scale: 2.5,
        }
    }
}

impl ThresholdPolicy {
    /// Validates every field.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::NonPositive`] for a zero/negative threshold
    /// and [`PolicyError::MovementScaleOutOfRange`] when the scale leaves
    /// [`MOVEMENT_SCALE_MIN`]..=[`MOVEMENT_SCALE_MAX`].
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.tap_max_duration_ms == 0 {
            return Err(PolicyError::NonPositive {
                name: "tap_max_duration_ms",
                value: 0.0,
            });
        }
        if self.tap_movement_px <= 0.0 {
            return Err(PolicyError::NonPositive {
                name: "tap_movement_px",
                value: self.tap_movement_px,
            });
        }
        if self.long_press_ms == 0 {
            return Err(PolicyError::NonPositive {
                name: "long_press_ms",
                value: 0.0,
            });
        }
        if self.move_dispatch_px <= 0.0 {
            return Err(PolicyError::NonPositive {
                name: "move_dispatch_px",
                value: self.move_dispatch_px,
            });
        }
        if self.nudge_interval_ms == 0 {
            return Err(PolicyError::NonPositive {
                name: "nudge_interval_ms",
                value: 0.0,
            });
        }
        if !(MOVEMENT_SCALE_MIN..=MOVEMENT_SCALE_MAX).contains(&self.movement_scale) {
            return Err(PolicyError::MovementScaleOutOfRange {
                value: self.movement_scale,
            });
        }
        Ok(())
    }

    /// Returns a copy with the movement scale clamped into range.
    pub fn with_movement_scale(mut self, scale: f64) -> Self {
        self.movement_scale = scale.clamp(MOVEMENT_SCALE_MIN, MOVEMENT_SCALE_MAX);
        self
    }
}

/// Durations and shaping factors for synthesized strokes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeTuning {
    /// Duration of the zero-length tap stroke.
    pub tap_duration_ms: u64,
    /// Duration of one drag nudge stroke.
    pub nudge_duration_ms: u64,
    /// Duration of the final drag settle stroke.
    pub settle_duration_ms: u64,
    /// Duration of one scroll swipe.
    pub scroll_duration_ms: u64,
    /// Factor applied to the scroll swipe length to keep single swipes
    /// reasonable on tall targets.
    pub scroll_damping: f64,
}

impl Default for StrokeTuning {
    fn default() -> Self {
        Self {
            tap_duration_ms: 100,
            nudge_duration_ms: 40,
            settle_duration_ms: 40,
            scroll_duration_ms: 120,
            scroll_damping: 0.6,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
