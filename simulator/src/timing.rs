//! Loop timing and render-time metrics for the desktop host.
//!
//! The window loop stands in for a display refresh: it wakes every
//! [`FRAME_TIME`], drains telemetry and calls `Engine::tick`. Whether a tick
//! actually draws is up to the engine's scheduler.

use std::time::{Duration, Instant};

/// Refresh period of the window loop (~120 Hz).
pub const FRAME_TIME: Duration = Duration::from_millis(8);

/// How often render statistics are rolled over and logged.
pub const STATS_REFRESH: Duration = Duration::from_secs(1);

/// Redraw rate and render cost, averaged over each [`STATS_REFRESH`] window.
pub struct RenderMetrics {
    window_start: Instant,
    redraws: u32,
    render_time: Duration,
    /// Redraws per second over the last window.
    pub redraw_rate: f32,
    /// Mean render time over the last window, microseconds.
    pub render_us: u32,
}

impl RenderMetrics {
    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            redraws: 0,
            render_time: Duration::ZERO,
            redraw_rate: 0.0,
            render_us: 0,
        }
    }

    /// Count one completed redraw.
    pub fn record_redraw(
        &mut self,
        took: Duration,
    ) {
        self.redraws = self.redraws.saturating_add(1);
        self.render_time += took;
    }

    /// Close the window if it is due. Returns `true` when the published
    /// figures changed.
    pub fn roll(
        &mut self,
        now: Instant,
    ) -> bool {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < STATS_REFRESH {
            return false;
        }
        self.redraw_rate = self.redraws as f32 / elapsed.as_secs_f32();
        self.render_us = if self.redraws == 0 {
            0
        } else {
            (self.render_time.as_micros() / u128::from(self.redraws)) as u32
        };
        self.window_start = now;
        self.redraws = 0;
        self.render_time = Duration::ZERO;
        true
    }
}
