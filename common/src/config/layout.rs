//! Logical canvas and gauge layout constants.
//!
//! Every value here is in logical (unscaled) units of the fixed 1250×390
//! canvas. Pixel positions are derived once from these at setup by
//! [`Layout::new`](crate::geometry::Layout::new) with the display scale
//! factor; nothing is recomputed from window or container size.

use core::f32::consts::PI;

// =============================================================================
// Canvas
// =============================================================================

/// Logical canvas width.
pub const CANVAS_WIDTH: u32 = 1250;

/// Logical canvas height.
pub const CANVAS_HEIGHT: u32 = 390;

// =============================================================================
// Primary Gauge (speed needle + RPM arc)
// =============================================================================

/// Arc center X. Sits slightly right of canvas middle.
pub const GAUGE_CENTER_X: f32 = 640.0;

/// Arc center Y. On the bottom edge; only the upper sweep is visible.
pub const GAUGE_CENTER_Y: f32 = 390.0;

/// Radius of the RPM track.
pub const RADIUS_OUTER: f32 = 320.0;

/// Needle reach and base radius of the speed scale.
pub const RADIUS_INNER: f32 = 250.0;

/// Sweep start angle in radians (clockwise from +X, screen coordinates).
pub const SWEEP_START: f32 = PI * 1.05;

/// Sweep end angle in radians.
pub const SWEEP_END: f32 = PI * 1.95;

/// RPM at full sweep.
pub const MAX_RPM: f32 = 8000.0;

/// Speed at full sweep.
pub const MAX_SPEED: f32 = 255.0;

/// Stroke width of the RPM track and fill arc.
pub const ARC_WIDTH: f32 = 45.0;

/// Extra stroke on each side of the RPM fill for its glow.
pub const ARC_GLOW_SPREAD: f32 = 8.0;

/// Number of segments the RPM fill gradient is split into.
pub const ARC_SEGMENTS: u32 = 48;

/// Distance below the arc center of the beam pivot.
pub const BEAM_PIVOT_OFFSET: f32 = 60.0;

/// Fraction of the pivot-to-tip distance at which the visible beam starts.
pub const BEAM_VISIBLE_FROM: f32 = 0.55;

/// Needle / beam stroke width.
pub const NEEDLE_WIDTH: f32 = 3.0;

/// Vertical offset of the speed readout above the arc center.
pub const READOUT_OFFSET_Y: f32 = 140.0;

/// Gap between the speed readout and its unit label.
pub const READOUT_UNIT_GAP: f32 = 34.0;

// =============================================================================
// Static Scale (ticks + labels)
// =============================================================================

/// RPM scale tick count (labels 0..=8, thousands).
pub const RPM_TICKS: u32 = 9;

/// Speed scale tick count (labels spread evenly over 0..=255).
pub const SPEED_TICKS: u32 = 18;

/// RPM tick runs from `RADIUS_OUTER + 15` to `RADIUS_OUTER + 40`.
pub const RPM_TICK_FROM: f32 = 15.0;
pub const RPM_TICK_TO: f32 = 40.0;

/// RPM labels sit at `RADIUS_OUTER + 50`.
pub const RPM_LABEL_AT: f32 = 50.0;

/// Speed tick runs from `RADIUS_INNER + 55` in to `RADIUS_INNER + 30`.
pub const SPEED_TICK_FROM: f32 = 55.0;
pub const SPEED_TICK_TO: f32 = 30.0;

/// Speed labels sit at `RADIUS_INNER + 11`.
pub const SPEED_LABEL_AT: f32 = 11.0;

/// Tick stroke width.
pub const TICK_WIDTH: f32 = 3.0;

// =============================================================================
// Auxiliary Ring Gauges
// =============================================================================

/// Ring radius for auxiliary channels.
pub const RING_RADIUS: f32 = 42.0;

/// Ring stroke width.
pub const RING_WIDTH: f32 = 8.0;

/// Left column center X (coolant, oil, fuel).
pub const RING_LEFT_X: f32 = 80.0;

/// Right column center X (voltage, boost, oil pressure).
pub const RING_RIGHT_X: f32 = 1170.0;

/// Row centers shared by both columns.
pub const RING_ROWS_Y: [f32; 3] = [62.0, 187.0, 312.0];

// =============================================================================
// Timing
// =============================================================================

/// Minimum time between redraws (~60 Hz).
pub const FRAME_INTERVAL_MS: u64 = 16;

// Compile-time sanity: rings must fit on the canvas and the sweep must advance.
const _: () = assert!(SWEEP_START < SWEEP_END);
const _: () = assert!(RING_LEFT_X - RING_RADIUS > 0.0);
const _: () = assert!(RING_RIGHT_X + RING_RADIUS < CANVAS_WIDTH as f32);
const _: () = assert!(RADIUS_INNER < RADIUS_OUTER);

#[cfg(test)]
#[allow(clippy::assertions_on_constants)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_bounds() {
        assert!((SWEEP_START - PI * 1.05).abs() < 1e-6);
        assert!((SWEEP_END - PI * 1.95).abs() < 1e-6);
    }

    #[test]
    fn test_ring_rows_inside_canvas() {
        for y in RING_ROWS_Y {
            assert!(y - RING_RADIUS >= 0.0, "ring at {y} clips the top edge");
            assert!(y + RING_RADIUS <= CANVAS_HEIGHT as f32, "ring at {y} clips the bottom edge");
        }
    }
}
