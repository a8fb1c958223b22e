//! Runtime engine options.
//!
//! Every field has a default so a partial `[engine]` table (or none at all)
//! deserialises cleanly.

use std::time::Duration;

use serde::Deserialize;

use super::layout::FRAME_INTERVAL_MS;
use crate::theme::ThemeId;

/// Smallest accepted display scale factor.
pub const MIN_SCALE: f32 = 1.0;

/// Largest accepted display scale factor.
pub const MAX_SCALE: f32 = 4.0;

/// How the speed needle is drawn.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NeedleStyle {
    /// Straight needle from the arc center.
    Needle,
    /// Beam swung from a pivot below the dial.
    #[default]
    Beam,
}

/// Whether an activated simulation override may be turned off again.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationPolicy {
    /// Once active, stays active for the session.
    #[default]
    Latching,
    /// Operator may release the override and return to live telemetry.
    Releasable,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Theme identifier; unknown names fall back to the default theme.
    pub theme: String,
    /// Display pixel density. Clamped to `MIN_SCALE..=MAX_SCALE`.
    pub scale: f32,
    /// Minimum time between redraws.
    pub frame_interval_ms: u64,
    pub needle: NeedleStyle,
    pub simulation: SimulationPolicy,
}

impl EngineConfig {
    /// Resolved theme identifier.
    pub fn theme_id(&self) -> ThemeId { ThemeId::resolve(Some(&self.theme)) }

    /// Scale factor with non-finite and out-of-range values pulled back in.
    pub fn effective_scale(&self) -> f32 {
        if self.scale.is_finite() {
            self.scale.clamp(MIN_SCALE, MAX_SCALE)
        } else {
            MIN_SCALE
        }
    }

    /// Throttle window. A zero interval would disable throttling, so it is
    /// floored at one millisecond.
    pub fn frame_interval(&self) -> Duration { Duration::from_millis(self.frame_interval_ms.max(1)) }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            theme: String::from(ThemeId::default().name()),
            scale: MIN_SCALE,
            frame_interval_ms: FRAME_INTERVAL_MS,
            needle: NeedleStyle::default(),
            simulation: SimulationPolicy::default(),
        }
    }
}
