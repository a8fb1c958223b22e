//! Shared text styles and font references.
//!
//! Gauge text colors come from the active theme, so character styles are
//! built as `MonoTextStyle::new(FONT, palette.role)` at the call site. Only
//! the alignment styles and font references are `const`.
//!
//! | Font | Used for |
//! |------|----------|
//! | `PROFONT_24_POINT` | Speed readout |
//! | `FONT_10X20` | Ring values |
//! | `FONT_9X15` (ISO 8859-1) | Tick labels, unit strings containing `°` |
//! | `FONT_6X10` | Ring and chrome labels |

use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_10X20};
use embedded_graphics::mono_font::iso_8859_1::FONT_9X15;
use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::text::{Alignment, Baseline, TextStyle, TextStyleBuilder};
use profont::PROFONT_24_POINT;

// =============================================================================
// Alignment
// =============================================================================

/// Centered both ways on the anchor point. Used for every gauge label so a
/// polar label position is the visual center of the text.
pub const CENTERED: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Center)
    .baseline(Baseline::Middle)
    .build();

/// Left aligned, vertically centered. Chrome readouts.
pub const LEFT_MIDDLE: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Left)
    .baseline(Baseline::Middle)
    .build();

/// Right aligned, vertically centered. Chrome clock.
pub const RIGHT_MIDDLE: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Right)
    .baseline(Baseline::Middle)
    .build();

// =============================================================================
// Fonts
// =============================================================================

/// Speed readout.
pub const READOUT_FONT: &MonoFont = &PROFONT_24_POINT;

/// Ring gauge value.
pub const VALUE_FONT: &MonoFont = &FONT_10X20;

/// Tick labels and unit strings. Latin-1 so `°` renders.
pub const SCALE_FONT: &MonoFont = &FONT_9X15;

/// Small labels.
pub const LABEL_FONT: &MonoFont = &FONT_6X10;
