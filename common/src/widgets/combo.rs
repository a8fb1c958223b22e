//! Primary arc/needle combo gauge.
//!
//! The RPM value fills a gradient arc over the track; speed drives a needle
//! (or the offset-pivot beam) and the numeric readout in the middle.

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

use super::primitives::{draw_arc, draw_glow_line, draw_glow_text, draw_gradient_arc, draw_line, draw_text};
use crate::channel::Channel;
use crate::config::NeedleStyle;
use crate::config::layout::ARC_SEGMENTS;
use crate::geometry::{GaugeGeometry, Layout, NeedlePose};
use crate::presenter::unit;
use crate::styles::{CENTERED, READOUT_FONT, SCALE_FONT};
use crate::theme::ThemePalette;

/// Background track across the full sweep.
pub fn draw_track<D>(
    display: &mut D,
    layout: &Layout,
    palette: &ThemePalette,
) where
    D: DrawTarget<Color = Rgb888>,
{
    let g = &layout.gauge;
    draw_arc(display, g.center, g.radius_outer, g.start, g.sweep(), palette.track, layout.arc_width);
}

/// RPM fill with its glow. Returns the fill fraction drawn.
pub fn draw_rpm_arc<D>(
    display: &mut D,
    layout: &Layout,
    palette: &ThemePalette,
    rpm: i32,
) -> f32
where
    D: DrawTarget<Color = Rgb888>,
{
    let g = &layout.gauge;
    let fraction = GaugeGeometry::rpm_fraction(rpm as f32);

    draw_arc(
        display,
        g.center,
        g.radius_outer,
        g.start,
        g.sweep() * fraction,
        palette.glow_soft,
        layout.arc_glow_width,
    );
    draw_gradient_arc(
        display,
        g.center,
        g.radius_outer,
        g.start,
        g.sweep(),
        fraction,
        [palette.accent, palette.accent_soft, palette.accent_deep],
        layout.arc_width,
        ARC_SEGMENTS,
    );

    fraction
}

/// Needle or beam for the current speed. Returns the fraction and pose.
pub fn draw_needle<D>(
    display: &mut D,
    layout: &Layout,
    palette: &ThemePalette,
    speed: i32,
    style: NeedleStyle,
) -> (f32, NeedlePose)
where
    D: DrawTarget<Color = Rgb888>,
{
    let g = &layout.gauge;
    let fraction = GaugeGeometry::speed_fraction(speed as f32);

    let pose = match style {
        NeedleStyle::Needle => {
            let pose = g.needle(fraction);
            draw_line(display, pose.from, pose.tip, palette.needle, layout.needle_width);
            pose
        }
        NeedleStyle::Beam => {
            let pose = g.beam(fraction);
            draw_glow_line(display, pose.from, pose.tip, palette.needle, palette.glow, layout.needle_width);
            pose
        }
    };

    (fraction, pose)
}

/// Integer speed readout with its unit underneath.
pub fn draw_speed_readout<D>(
    display: &mut D,
    layout: &Layout,
    palette: &ThemePalette,
    speed: i32,
) where
    D: DrawTarget<Color = Rgb888>,
{
    let mut text: heapless::String<12> = heapless::String::new();
    let _ = write!(text, "{speed}");

    draw_glow_text(
        display,
        &text,
        layout.readout.to_point(),
        READOUT_FONT,
        palette.text,
        palette.glow_soft,
        CENTERED,
    );
    draw_text(
        display,
        unit(Channel::Speed),
        layout.readout_unit.to_point(),
        SCALE_FONT,
        palette.text_muted,
        CENTERED,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::PixelLayer;
    use crate::theme::NEON;

    #[test]
    fn test_rpm_arc_fraction() {
        let layout = Layout::new(1.0);
        let mut layer = PixelLayer::new(layout.size);
        assert_eq!(draw_rpm_arc(&mut layer, &layout, &NEON, 0), 0.0);
        assert_eq!(layer.opaque_len(), 0, "zero rpm draws no fill");
        assert!((draw_rpm_arc(&mut layer, &layout, &NEON, 7000) - 0.875).abs() < 1e-6);
        assert!(layer.opaque_len() > 0);
        assert_eq!(draw_rpm_arc(&mut layer, &layout, &NEON, 12_000), 1.0);
    }

    #[test]
    fn test_needle_reaches_inner_radius() {
        let layout = Layout::new(1.0);
        let mut layer = PixelLayer::new(layout.size);
        let (fraction, pose) = draw_needle(&mut layer, &layout, &NEON, 0, NeedleStyle::Needle);
        assert_eq!(fraction, 0.0);
        assert_eq!(layer.pixel(pose.tip.to_point()), Some(NEON.needle));
    }

    #[test]
    fn test_beam_draws_glow_and_core() {
        let layout = Layout::new(1.0);
        let mut layer = PixelLayer::new(layout.size);
        let (fraction, pose) = draw_needle(&mut layer, &layout, &NEON, 300, NeedleStyle::Beam);
        assert_eq!(fraction, 1.0, "speed clamps at full scale");
        assert_eq!(layer.pixel(pose.from.lerp(pose.tip, 0.5).to_point()), Some(NEON.needle));
        assert!(layer.count(NEON.glow) > 0);
    }

    #[test]
    fn test_speed_readout_in_text_color() {
        let layout = Layout::new(1.0);
        let mut layer = PixelLayer::new(layout.size);
        draw_speed_readout(&mut layer, &layout, &NEON, 88);
        assert!(layer.count(NEON.text) > 0);
        assert!(layer.count(NEON.text_muted) > 0);
    }
}
