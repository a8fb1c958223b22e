//! Static scale: RPM and speed tick marks with their labels.
//!
//! Drawn into the cached layer once per theme, never per frame.

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

use super::primitives::{draw_line, draw_text};
use crate::geometry::{Layout, Tick};
use crate::styles::{CENTERED, SCALE_FONT};
use crate::theme::ThemePalette;

/// Draw both scales. Returns the number of ticks drawn.
pub fn draw_scale<D>(
    display: &mut D,
    layout: &Layout,
    palette: &ThemePalette,
) -> usize
where
    D: DrawTarget<Color = Rgb888>,
{
    let mut drawn = 0;
    for tick in layout.rpm_ticks().chain(layout.speed_ticks()) {
        draw_tick(display, &tick, layout.tick_width, palette);
        drawn += 1;
    }
    drawn
}

fn draw_tick<D>(
    display: &mut D,
    tick: &Tick,
    width: f32,
    palette: &ThemePalette,
) where
    D: DrawTarget<Color = Rgb888>,
{
    draw_line(display, tick.from, tick.to, palette.tick, width);

    let mut label: heapless::String<4> = heapless::String::new();
    let _ = write!(label, "{}", tick.label);
    draw_text(
        display,
        &label,
        tick.label_at.to_point(),
        SCALE_FONT,
        palette.tick_label,
        CENTERED,
    );
}
