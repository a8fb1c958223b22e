//! Gauge geometry.
//!
//! Pure math, no drawing. All angles are radians measured clockwise from the
//! positive X axis in screen coordinates (Y grows downward), which is the
//! convention of both the canvas the layout was designed on and
//! `embedded_graphics` arcs.
//!
//! [`Layout`] turns the logical constants in
//! [`config::layout`](crate::config::layout) into pixel geometry exactly once,
//! for a given display scale factor. Widgets only ever read a `Layout`.

use core::f32::consts::{FRAC_PI_2, TAU};

use embedded_graphics::prelude::{Point, Size};

use crate::channel::Channel;
use crate::config::layout::{
    ARC_GLOW_SPREAD,
    ARC_WIDTH,
    BEAM_PIVOT_OFFSET,
    BEAM_VISIBLE_FROM,
    CANVAS_HEIGHT,
    CANVAS_WIDTH,
    GAUGE_CENTER_X,
    GAUGE_CENTER_Y,
    MAX_RPM,
    MAX_SPEED,
    NEEDLE_WIDTH,
    RADIUS_INNER,
    RADIUS_OUTER,
    READOUT_OFFSET_Y,
    READOUT_UNIT_GAP,
    RING_LEFT_X,
    RING_RADIUS,
    RING_RIGHT_X,
    RING_ROWS_Y,
    RING_WIDTH,
    RPM_LABEL_AT,
    RPM_TICK_FROM,
    RPM_TICK_TO,
    RPM_TICKS,
    SPEED_LABEL_AT,
    SPEED_TICK_FROM,
    SPEED_TICK_TO,
    SPEED_TICKS,
    SWEEP_END,
    SWEEP_START,
    TICK_WIDTH,
};

// =============================================================================
// Fractions
// =============================================================================

/// `clamp(value / max, 0, 1)`. Non-finite input or a non-positive `max`
/// gives `0.0`.
#[inline]
pub fn fraction(
    value: f32,
    max: f32,
) -> f32 {
    range_fraction(value, 0.0, max)
}

/// Position of `value` within `min..=max`, clamped to `0.0..=1.0`.
pub fn range_fraction(
    value: f32,
    min: f32,
    max: f32,
) -> f32 {
    let span = max - min;
    if !value.is_finite() || !span.is_finite() || span <= 0.0 {
        return 0.0;
    }
    ((value - min) / span).clamp(0.0, 1.0)
}

// =============================================================================
// Points
// =============================================================================

/// Sub-pixel point. Rounded to a [`Point`] only when handed to a primitive.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}

impl PointF {
    pub const fn new(
        x: f32,
        y: f32,
    ) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn to_point(self) -> Point { Point::new(self.x.round() as i32, self.y.round() as i32) }

    /// Point on the segment `self -> other` at parameter `t`.
    #[inline]
    pub fn lerp(
        self,
        other: Self,
        t: f32,
    ) -> Self {
        Self::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }

    #[inline]
    fn scaled(
        self,
        scale: f32,
    ) -> Self {
        Self::new(self.x * scale, self.y * scale)
    }
}

/// Point at `radius` from `center` along `angle`.
#[inline]
pub fn polar(
    center: PointF,
    radius: f32,
    angle: f32,
) -> PointF {
    PointF::new(center.x + angle.cos() * radius, center.y + angle.sin() * radius)
}

// =============================================================================
// Primary Gauge
// =============================================================================

/// Arc/needle combo gauge geometry in pixels.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct GaugeGeometry {
    pub center: PointF,
    pub radius_outer: f32,
    pub radius_inner: f32,
    pub start: f32,
    pub end: f32,
    /// Beam pivot, below `center`.
    pub pivot: PointF,
}

/// Needle or beam endpoints for one speed value.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct NeedlePose {
    /// Where the visible stroke begins.
    pub from: PointF,
    /// Tip on the inner radius.
    pub tip: PointF,
    /// Direction of the stroke (from its origin toward the tip).
    pub angle: f32,
}

impl GaugeGeometry {
    #[inline]
    pub fn sweep(&self) -> f32 { self.end - self.start }

    /// Angle for a fill fraction (clamped).
    #[inline]
    pub fn angle_at(
        &self,
        fraction: f32,
    ) -> f32 {
        let f = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { 0.0 };
        self.start + self.sweep() * f
    }

    #[inline]
    pub fn rpm_fraction(rpm: f32) -> f32 { fraction(rpm, MAX_RPM) }

    #[inline]
    pub fn speed_fraction(speed: f32) -> f32 { fraction(speed, MAX_SPEED) }

    /// Classic needle from the arc center to the inner radius.
    pub fn needle(
        &self,
        speed_fraction: f32,
    ) -> NeedlePose {
        let angle = self.angle_at(speed_fraction);
        NeedlePose {
            from: self.center,
            tip: polar(self.center, self.radius_inner, angle),
            angle,
        }
    }

    /// Beam swung from the offset pivot toward the same tip as the needle.
    ///
    /// The tip stays on the dial's inner radius; only the stroke's origin and
    /// therefore its angle differ, so the beam reads as rising from below.
    pub fn beam(
        &self,
        speed_fraction: f32,
    ) -> NeedlePose {
        let tip = polar(self.center, self.radius_inner, self.angle_at(speed_fraction));
        let angle = (tip.y - self.pivot.y).atan2(tip.x - self.pivot.x);
        NeedlePose {
            from: self.pivot.lerp(tip, BEAM_VISIBLE_FROM),
            tip,
            angle,
        }
    }
}

// =============================================================================
// Static Scale
// =============================================================================

/// One tick mark and its label.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Tick {
    pub from: PointF,
    pub to: PointF,
    pub label_at: PointF,
    pub label: u32,
}

// =============================================================================
// Auxiliary Ring
// =============================================================================

/// Circular ring gauge geometry in pixels.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct RingGeometry {
    pub channel: Channel,
    pub center: PointF,
    pub radius: f32,
    pub width: f32,
}

impl RingGeometry {
    /// Fill arc as `(start, sweep)`, starting at 12 o'clock.
    pub fn fill_arc(
        &self,
        fraction: f32,
    ) -> (f32, f32) {
        let f = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { 0.0 };
        (-FRAC_PI_2, TAU * f)
    }
}

// =============================================================================
// Layout
// =============================================================================

/// Pixel geometry for the whole surface at one scale factor.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    pub scale: f32,
    pub size: Size,
    pub gauge: GaugeGeometry,
    pub rings: [RingGeometry; 6],
    pub arc_width: f32,
    pub arc_glow_width: f32,
    pub needle_width: f32,
    pub tick_width: f32,
    /// Speed readout position.
    pub readout: PointF,
    /// Unit label under the speed readout.
    pub readout_unit: PointF,
}

impl Layout {
    /// Derive pixel geometry. `scale` is expected to be already validated
    /// (see [`EngineConfig::effective_scale`](crate::config::EngineConfig::effective_scale)).
    pub fn new(scale: f32) -> Self {
        let s = scale;
        let center = PointF::new(GAUGE_CENTER_X, GAUGE_CENTER_Y).scaled(s);

        let ring = |i: usize, x: f32, y: f32| RingGeometry {
            channel: Channel::AUXILIARY[i],
            center: PointF::new(x, y).scaled(s),
            radius: RING_RADIUS * s,
            width: RING_WIDTH * s,
        };

        Self {
            scale,
            size: Size::new(
                (CANVAS_WIDTH as f32 * s).round() as u32,
                (CANVAS_HEIGHT as f32 * s).round() as u32,
            ),
            gauge: GaugeGeometry {
                center,
                radius_outer: RADIUS_OUTER * s,
                radius_inner: RADIUS_INNER * s,
                start: SWEEP_START,
                end: SWEEP_END,
                pivot: PointF::new(GAUGE_CENTER_X, GAUGE_CENTER_Y + BEAM_PIVOT_OFFSET).scaled(s),
            },
            rings: [
                ring(0, RING_LEFT_X, RING_ROWS_Y[0]),
                ring(1, RING_LEFT_X, RING_ROWS_Y[1]),
                ring(2, RING_LEFT_X, RING_ROWS_Y[2]),
                ring(3, RING_RIGHT_X, RING_ROWS_Y[0]),
                ring(4, RING_RIGHT_X, RING_ROWS_Y[1]),
                ring(5, RING_RIGHT_X, RING_ROWS_Y[2]),
            ],
            arc_width: ARC_WIDTH * s,
            arc_glow_width: (ARC_WIDTH + 2.0 * ARC_GLOW_SPREAD) * s,
            needle_width: NEEDLE_WIDTH * s,
            tick_width: TICK_WIDTH * s,
            readout: PointF::new(GAUGE_CENTER_X, GAUGE_CENTER_Y - READOUT_OFFSET_Y).scaled(s),
            readout_unit: PointF::new(GAUGE_CENTER_X, GAUGE_CENTER_Y - READOUT_OFFSET_Y + READOUT_UNIT_GAP).scaled(s),
        }
    }

    /// RPM scale: `RPM_TICKS` marks outside the track, labelled in thousands.
    pub fn rpm_ticks(&self) -> impl Iterator<Item = Tick> + '_ {
        let g = &self.gauge;
        let s = self.scale;
        let steps = RPM_TICKS - 1;
        (0..RPM_TICKS).map(move |i| {
            let a = g.angle_at(i as f32 / steps as f32);
            Tick {
                from: polar(g.center, g.radius_outer + RPM_TICK_FROM * s, a),
                to: polar(g.center, g.radius_outer + RPM_TICK_TO * s, a),
                label_at: polar(g.center, g.radius_outer + RPM_LABEL_AT * s, a),
                label: i,
            }
        })
    }

    /// Speed scale: `SPEED_TICKS` marks inside the track, labels spread
    /// evenly over `0..=MAX_SPEED`.
    pub fn speed_ticks(&self) -> impl Iterator<Item = Tick> + '_ {
        let g = &self.gauge;
        let s = self.scale;
        let steps = SPEED_TICKS - 1;
        (0..SPEED_TICKS).map(move |i| {
            let p = i as f32 / steps as f32;
            let a = g.angle_at(p);
            Tick {
                from: polar(g.center, g.radius_inner + SPEED_TICK_FROM * s, a),
                to: polar(g.center, g.radius_inner + SPEED_TICK_TO * s, a),
                label_at: polar(g.center, g.radius_inner + SPEED_LABEL_AT * s, a),
                label: (p * MAX_SPEED).round() as u32,
            }
        })
    }

    /// Ring geometry for an auxiliary channel.
    pub fn ring(
        &self,
        channel: Channel,
    ) -> Option<&RingGeometry> {
        self.rings.iter().find(|r| r.channel == channel)
    }
}

#[cfg(test)]
mod tests {
    use core::f32::consts::PI;

    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_fraction_always_in_unit_range() {
        for x in [-1e9, -255.0, -0.1, 0.0, 0.5, 100.0, 255.0, 256.0, 1e9, f32::MAX, f32::MIN] {
            let f = fraction(x, 255.0);
            assert!((0.0..=1.0).contains(&f), "fraction({x}) = {f}");
        }
    }

    #[test]
    fn test_fraction_non_finite_and_bad_max() {
        assert_eq!(fraction(f32::NAN, 10.0), 0.0);
        assert_eq!(fraction(f32::INFINITY, 10.0), 0.0);
        assert_eq!(fraction(5.0, 0.0), 0.0);
        assert_eq!(fraction(5.0, -10.0), 0.0);
    }

    #[test]
    fn test_range_fraction_voltage_window() {
        assert!(range_fraction(11.8, 11.8, 12.3).abs() < EPS);
        assert!((range_fraction(12.3, 11.8, 12.3) - 1.0).abs() < EPS);
        assert!((range_fraction(12.05, 11.8, 12.3) - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_angle_at_endpoints() {
        let layout = Layout::new(1.0);
        assert!((layout.gauge.angle_at(0.0) - PI * 1.05).abs() < EPS);
        assert!((layout.gauge.angle_at(1.0) - PI * 1.95).abs() < EPS);
        assert!((layout.gauge.angle_at(5.0) - PI * 1.95).abs() < EPS, "fractions clamp");
    }

    #[test]
    fn test_rpm_fraction() {
        assert!((GaugeGeometry::rpm_fraction(7000.0) - 0.875).abs() < EPS);
        assert_eq!(GaugeGeometry::rpm_fraction(9000.0), 1.0);
        assert_eq!(GaugeGeometry::rpm_fraction(-50.0), 0.0);
    }

    #[test]
    fn test_needle_tip_on_inner_radius() {
        let layout = Layout::new(1.0);
        let pose = layout.gauge.needle(0.5);
        // Halfway through a symmetric sweep points straight up.
        assert!((pose.tip.x - 640.0).abs() < 1e-2);
        assert!((pose.tip.y - (390.0 - 250.0)).abs() < 1e-2);
        assert_eq!(pose.from, layout.gauge.center);
    }

    #[test]
    fn test_beam_shares_tip_but_not_angle() {
        let layout = Layout::new(1.0);
        let needle = layout.gauge.needle(0.2);
        let beam = layout.gauge.beam(0.2);
        assert!((needle.tip.x - beam.tip.x).abs() < EPS);
        assert!((needle.tip.y - beam.tip.y).abs() < EPS);
        assert!((needle.angle - beam.angle).abs() > 1e-3, "pivot offset should change the angle");
        assert!(beam.from.y > needle.tip.y, "beam rises from below");
    }

    #[test]
    fn test_beam_vertical_at_midpoint() {
        let layout = Layout::new(1.0);
        let beam = layout.gauge.beam(0.5);
        // atan2 of a straight-up vector is -PI/2.
        assert!((beam.angle + FRAC_PI_2).abs() < 1e-3);
    }

    #[test]
    fn test_tick_counts_and_labels() {
        let layout = Layout::new(1.0);
        let rpm: Vec<_> = layout.rpm_ticks().map(|t| t.label).collect();
        assert_eq!(rpm, (0..=8).collect::<Vec<_>>());

        let speed: Vec<_> = layout.speed_ticks().map(|t| t.label).collect();
        assert_eq!(speed.len(), 18);
        assert_eq!(speed[0], 0);
        assert_eq!(speed[1], 15);
        assert_eq!(speed[17], 255);
    }

    #[test]
    fn test_scale_applied_once() {
        let one = Layout::new(1.0);
        let two = Layout::new(2.0);
        assert_eq!(two.size, Size::new(2500, 780));
        assert!((two.gauge.radius_outer - 2.0 * one.gauge.radius_outer).abs() < EPS);
        assert!((two.gauge.center.x - 2.0 * one.gauge.center.x).abs() < EPS);
        assert_eq!(one.gauge.start, two.gauge.start, "angles do not scale");
    }

    #[test]
    fn test_ring_fill_from_twelve_oclock() {
        let layout = Layout::new(1.0);
        let ring = layout.ring(Channel::Fuel).unwrap();
        let (start, sweep) = ring.fill_arc(0.25);
        assert!((start + FRAC_PI_2).abs() < EPS);
        assert!((sweep - FRAC_PI_2).abs() < EPS);
        assert_eq!(ring.fill_arc(f32::NAN).1, 0.0);
    }

    #[test]
    fn test_every_aux_channel_has_a_ring() {
        let layout = Layout::new(1.0);
        for channel in Channel::AUXILIARY {
            assert!(layout.ring(channel).is_some(), "{channel:?} has no ring");
        }
        assert!(layout.ring(Channel::Speed).is_none());
    }
}
