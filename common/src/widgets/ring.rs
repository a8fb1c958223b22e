//! Auxiliary ring gauge: circular track, fill from 12 o'clock, value and
//! label in the middle.

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

use super::primitives::{draw_arc, draw_ring, draw_text};
use crate::geometry::RingGeometry;
use crate::presenter::Readout;
use crate::styles::{CENTERED, LABEL_FONT, VALUE_FONT};
use crate::theme::ThemePalette;

/// Value text sits this far above the ring center, the label this far below.
const VALUE_RISE: f32 = 5.0;
const LABEL_DROP: f32 = 14.0;

/// Draw one ring. Returns the fill fraction used.
pub fn draw_ring_gauge<D>(
    display: &mut D,
    ring: &RingGeometry,
    palette: &ThemePalette,
    readout: &Readout,
    scale: f32,
) -> f32
where
    D: DrawTarget<Color = Rgb888>,
{
    let fraction = readout.fraction();
    draw_ring(display, ring.center, ring.radius, palette.track, ring.width);

    let (start, sweep) = ring.fill_arc(fraction);
    draw_arc(display, ring.center, ring.radius, start, sweep, palette.accent, ring.width);

    let c = ring.center;
    draw_text(
        display,
        &readout.text,
        Point::new(c.x.round() as i32, (c.y - VALUE_RISE * scale).round() as i32),
        VALUE_FONT,
        palette.text,
        CENTERED,
    );
    draw_text(
        display,
        ring.channel.label(),
        Point::new(c.x.round() as i32, (c.y + LABEL_DROP * scale).round() as i32),
        LABEL_FONT,
        palette.text_muted,
        CENTERED,
    );

    fraction
}
