//! Color helpers for the cluster surface.
//!
//! The cluster renders in `Rgb888` so theme tokens written as hex triplets map
//! onto the surface without quantisation. Theme palettes live in
//! [`theme`](crate::theme); this module only holds the handful of fixed colors
//! every theme shares plus the interpolation used for arc gradients.

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

// =============================================================================
// Shared Colors
// =============================================================================

/// Pure black. Surface background for every theme.
pub const BLACK: Rgb888 = Rgb888::BLACK;

/// Pure white. Needle core and primary label text.
pub const WHITE: Rgb888 = Rgb888::WHITE;

/// Shift-down arrow color.
pub const SHIFT_DOWN: Rgb888 = Rgb888::RED;

/// Shift-up arrow color.
pub const SHIFT_UP: Rgb888 = Rgb888::new(0, 255, 0);

/// Build a color from a `0xRRGGBB` literal.
#[inline]
pub const fn hex(rgb: u32) -> Rgb888 { Rgb888::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8) }

// =============================================================================
// Interpolation
// =============================================================================

/// Linear interpolation between two colors, `t` clamped to `0.0..=1.0`.
///
/// Uses 8.8 fixed point per channel, same approach as the cell background
/// fades on the small dashboard.
pub fn lerp(
    from: Rgb888,
    to: Rgb888,
    t: f32,
) -> Rgb888 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let t_fixed = (t * 256.0) as i32;

    let mix = |a: u8, b: u8| -> u8 {
        let a = i32::from(a);
        let b = i32::from(b);
        (a + (((b - a) * t_fixed) >> 8)).clamp(0, 255) as u8
    };

    Rgb888::new(mix(from.r(), to.r()), mix(from.g(), to.g()), mix(from.b(), to.b()))
}

/// Three-stop gradient `start -> mid -> end` sampled at `t`.
pub fn gradient3(
    start: Rgb888,
    mid: Rgb888,
    end: Rgb888,
    t: f32,
) -> Rgb888 {
    if t < 0.5 { lerp(start, mid, t * 2.0) } else { lerp(mid, end, (t - 0.5) * 2.0) }
}

/// Scale a color toward black by `factor` (`1.0` = unchanged).
///
/// Canvas alpha has no `DrawTarget` equivalent, so translucent strokes are
/// pre-multiplied against the black background instead.
#[inline]
pub fn dim(
    color: Rgb888,
    factor: f32,
) -> Rgb888 {
    lerp(BLACK, color, factor)
}
