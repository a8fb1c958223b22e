//! Low-level drawing primitives shared across widgets.
//!
//! Geometry arrives as [`PointF`] and radians; conversion to integer pixels
//! and [`Angle`] happens here and nowhere else.

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Arc, Circle, Line, PrimitiveStyle};
use embedded_graphics::text::{Text, TextStyle};

use crate::colors::gradient3;
use crate::geometry::PointF;

/// Arc segments overlap by this much so gradient seams do not show gaps.
const SEGMENT_OVERLAP: f32 = 0.004;

/// Offsets for the text glow, two pixels out in eight directions.
const GLOW_OFFSETS: [(i32, i32); 8] = [
    (-2, -2),
    (0, -2),
    (2, -2), // top row
    (-2, 0),
    (2, 0), // middle row (skip center)
    (-2, 2),
    (0, 2),
    (2, 2), // bottom row
];

/// Round a logical stroke width to whole pixels, never below one.
#[inline]
pub fn stroke_width(width: f32) -> u32 { width.round().max(1.0) as u32 }

#[inline]
fn diameter(radius: f32) -> u32 { (radius * 2.0).round().max(1.0) as u32 }

/// Straight stroke between two sub-pixel points.
pub fn draw_line<D>(
    display: &mut D,
    from: PointF,
    to: PointF,
    color: Rgb888,
    width: f32,
) where
    D: DrawTarget<Color = Rgb888>,
{
    Line::new(from.to_point(), to.to_point())
        .into_styled(PrimitiveStyle::with_stroke(color, stroke_width(width)))
        .draw(display)
        .ok();
}

/// Line with a wider halo underneath.
pub fn draw_glow_line<D>(
    display: &mut D,
    from: PointF,
    to: PointF,
    core: Rgb888,
    glow: Rgb888,
    width: f32,
) where
    D: DrawTarget<Color = Rgb888>,
{
    draw_line(display, from, to, glow, width * 3.0);
    draw_line(display, from, to, core, width);
}

/// Solid arc stroke centered on `radius`. Nothing is drawn for an empty sweep.
pub fn draw_arc<D>(
    display: &mut D,
    center: PointF,
    radius: f32,
    start: f32,
    sweep: f32,
    color: Rgb888,
    width: f32,
) where
    D: DrawTarget<Color = Rgb888>,
{
    if sweep.is_nan() || sweep <= 0.0 {
        return;
    }
    Arc::with_center(center.to_point(), diameter(radius), Angle::from_radians(start), Angle::from_radians(sweep))
        .into_styled(PrimitiveStyle::with_stroke(color, stroke_width(width)))
        .draw(display)
        .ok();
}

/// Full circle outline.
pub fn draw_ring<D>(
    display: &mut D,
    center: PointF,
    radius: f32,
    color: Rgb888,
    width: f32,
) where
    D: DrawTarget<Color = Rgb888>,
{
    Circle::with_center(center.to_point(), diameter(radius))
        .into_styled(PrimitiveStyle::with_stroke(color, stroke_width(width)))
        .draw(display)
        .ok();
}

/// Arc filled from `start` to `fraction` of `full_sweep`, colored by a
/// three-stop gradient laid out along the full sweep.
///
/// The gradient is fixed to the scale, not to the filled length, so a given
/// angle always has the same color. `segments` is the count for a full sweep.
#[allow(clippy::too_many_arguments)]
pub fn draw_gradient_arc<D>(
    display: &mut D,
    center: PointF,
    radius: f32,
    start: f32,
    full_sweep: f32,
    fraction: f32,
    stops: [Rgb888; 3],
    width: f32,
    segments: u32,
) where
    D: DrawTarget<Color = Rgb888>,
{
    let fraction = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { 0.0 };
    if fraction <= 0.0 || segments == 0 {
        return;
    }

    let step = 1.0 / segments as f32;
    let mut from = 0.0;
    while from < fraction {
        let to = (from + step).min(fraction);
        let color = gradient3(stops[0], stops[1], stops[2], (from + to) * 0.5);
        let overlap = if to < fraction { SEGMENT_OVERLAP } else { 0.0 };
        draw_arc(
            display,
            center,
            radius,
            start + full_sweep * from,
            full_sweep * (to - from) + overlap,
            color,
            width,
        );
        from = to;
    }
}

/// Text with a soft halo, for readouts sitting on the dark surface.
pub fn draw_glow_text<D>(
    display: &mut D,
    text: &str,
    position: Point,
    font: &MonoFont<'_>,
    color: Rgb888,
    glow: Rgb888,
    text_style: TextStyle,
) where
    D: DrawTarget<Color = Rgb888>,
{
    let glow_style = MonoTextStyle::new(font, glow);
    for (dx, dy) in GLOW_OFFSETS {
        let offset_pos = Point::new(position.x + dx, position.y + dy);
        Text::with_text_style(text, offset_pos, glow_style, text_style)
            .draw(display)
            .ok();
    }

    Text::with_text_style(text, position, MonoTextStyle::new(font, color), text_style)
        .draw(display)
        .ok();
}

/// Plain text in one color.
pub fn draw_text<D>(
    display: &mut D,
    text: &str,
    position: Point,
    font: &MonoFont<'_>,
    color: Rgb888,
    text_style: TextStyle,
) where
    D: DrawTarget<Color = Rgb888>,
{
    Text::with_text_style(text, position, MonoTextStyle::new(font, color), text_style)
        .draw(display)
        .ok();
}
