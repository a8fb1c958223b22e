//! Gauge widgets.
//!
//! All widgets are generic over `DrawTarget<Color = Rgb888>` and take their
//! colors from a [`ThemePalette`](crate::theme::ThemePalette). Draw errors are
//! ignored per primitive; a failed primitive never aborts a frame.

mod combo;
mod primitives;
mod ring;
mod scale;

pub use combo::{draw_needle, draw_rpm_arc, draw_speed_readout, draw_track};
pub use primitives::draw_text;
pub use ring::draw_ring_gauge;
pub use scale::draw_scale;
