//! Window chrome below the gauge surface.
//!
//! Receives the presenter's change-only pushes through [`IndicatorSink`],
//! keeps the latest values and repaints its strip only when something moved.
//!
//! ```text
//! ┌──────┬───────┬───────┬───────┬───────┬───────┬───────┬──────┬──────────┐
//! │  ▼   │COOLANT│OIL    │FUEL   │BATTERY│BOOST  │OIL PR.│  ▲   │ ● LINK   │
//! │      │ 85°C  │ 92°C  │ 73%   │ 12.1V │1.1 bar│0.3 bar│      │   12:34  │
//! │      │ ▆▆▆▁▁ │ ▆▆▆▆▁ │ ▆▆▆▁▁ │ ▆▆▁▁▁ │ ▆▆▆▁▁ │ ▆▁▁▁▁ │      │          │
//! └──────┴───────┴───────┴───────┴───────┴───────┴───────┴──────┴──────────┘
//! ```

use cluster_common::channel::Channel;
use cluster_common::colors::{SHIFT_DOWN, SHIFT_UP, dim, hex};
use cluster_common::presenter::{IndicatorSink, Readout, ShiftIndicators};
use cluster_common::styles::{CENTERED, LABEL_FONT, LEFT_MIDDLE, RIGHT_MIDDLE, SCALE_FONT};
use cluster_common::theme::{ThemeId, ThemePalette};
use cluster_common::widgets::draw_text;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle, Triangle};

/// Strip height in logical pixels.
pub const CHROME_HEIGHT: u32 = 56;

const ARROW_SLOT: u32 = 60;
const STATUS_SLOT: u32 = 150;
const BAR_HEIGHT: u32 = 6;
const BAR_INSET: u32 = 12;

/// Unlit arrows are drawn at this brightness.
const ARROW_OFF: f32 = 0.18;

/// Link dot colors.
const LINK_UP: Rgb888 = hex(0x22c55e);
const LINK_DOWN: Rgb888 = hex(0x6b7280);

pub struct Chrome {
    area: Rectangle,
    scale: f32,
    palette: &'static ThemePalette,
    readouts: [Option<Readout>; 6],
    shift: ShiftIndicators,
    connected: bool,
    clock: String,
    dirty: bool,
}

impl Chrome {
    /// Strip starting at `top`, `width` pixels wide.
    pub fn new(
        top: i32,
        width: u32,
        scale: f32,
        theme: ThemeId,
    ) -> Self {
        Self {
            area: Rectangle::new(Point::new(0, top), Size::new(width, Self::height(scale))),
            scale,
            palette: theme.palette(),
            readouts: Default::default(),
            shift: ShiftIndicators::default(),
            connected: false,
            clock: String::new(),
            dirty: true,
        }
    }

    /// Strip height in pixels at `scale`.
    pub fn height(scale: f32) -> u32 { (CHROME_HEIGHT as f32 * scale).round() as u32 }

    #[cfg(test)]
    pub fn is_connected(&self) -> bool { self.connected }

    pub fn set_theme(
        &mut self,
        theme: ThemeId,
    ) {
        self.palette = theme.palette();
        self.dirty = true;
    }

    /// Repaint the strip if anything changed. Returns `true` if drawn.
    pub fn draw<D>(
        &mut self,
        display: &mut D,
    ) -> bool
    where
        D: DrawTarget<Color = Rgb888>,
    {
        if !self.dirty {
            return false;
        }
        let p = self.palette;
        display.fill_solid(&self.area, p.background).ok();

        let arrow = self.px(ARROW_SLOT);
        let status = self.px(STATUS_SLOT);
        let bars_width = self.area.size.width.saturating_sub(2 * arrow + status);
        let slot = bars_width / 6;

        self.draw_arrow(display, 0, arrow, false, self.shift.down);
        for (i, readout) in self.readouts.iter().enumerate() {
            if let Some(readout) = readout {
                let x = arrow + slot * i as u32;
                self.draw_bar(display, x, slot, Channel::AUXILIARY[i], readout);
            }
        }
        self.draw_arrow(display, arrow + slot * 6, arrow, true, self.shift.up);
        self.draw_status(display, self.area.size.width.saturating_sub(status), status);

        self.dirty = false;
        true
    }

    #[inline]
    fn px(
        &self,
        logical: u32,
    ) -> u32 {
        (logical as f32 * self.scale).round() as u32
    }

    #[inline]
    fn top(&self) -> i32 { self.area.top_left.y }

    fn draw_arrow<D>(
        &self,
        display: &mut D,
        x: u32,
        width: u32,
        up: bool,
        lit: bool,
    ) where
        D: DrawTarget<Color = Rgb888>,
    {
        let base = if up { SHIFT_UP } else { SHIFT_DOWN };
        let color = if lit { base } else { dim(base, ARROW_OFF) };

        let cx = (x + width / 2) as i32;
        let cy = self.top() + (self.area.size.height / 2) as i32;
        let half = (self.px(14)) as i32;
        let (tip, base_y) = if up { (cy - half, cy + half) } else { (cy + half, cy - half) };

        Triangle::new(Point::new(cx, tip), Point::new(cx - half, base_y), Point::new(cx + half, base_y))
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(display)
            .ok();
    }

    fn draw_bar<D>(
        &self,
        display: &mut D,
        x: u32,
        width: u32,
        channel: Channel,
        readout: &Readout,
    ) where
        D: DrawTarget<Color = Rgb888>,
    {
        let p = self.palette;
        let cx = (x + width / 2) as i32;
        let top = self.top();

        draw_text(display, channel.label(), Point::new(cx, top + self.px(9) as i32), LABEL_FONT, p.text_muted, CENTERED);
        draw_text(display, &readout.joined(), Point::new(cx, top + self.px(27) as i32), SCALE_FONT, p.text, CENTERED);

        let inset = self.px(BAR_INSET);
        let bar_width = width.saturating_sub(2 * inset);
        let bar = Rectangle::new(
            Point::new((x + inset) as i32, top + self.px(44) as i32),
            Size::new(bar_width, self.px(BAR_HEIGHT).max(1)),
        );
        display.fill_solid(&bar, p.track).ok();

        let filled = (bar_width as f32 * readout.fraction()).round() as u32;
        if filled > 0 {
            display.fill_solid(&Rectangle::new(bar.top_left, Size::new(filled, bar.size.height)), p.accent).ok();
        }
    }

    fn draw_status<D>(
        &self,
        display: &mut D,
        x: u32,
        width: u32,
    ) where
        D: DrawTarget<Color = Rgb888>,
    {
        let p = self.palette;
        let top = self.top();
        let pad = self.px(12) as i32;
        let dot = self.px(10);

        let (color, label) = if self.connected { (LINK_UP, "LINK") } else { (LINK_DOWN, "NO LINK") };
        let row = top + self.px(17) as i32;
        Circle::with_center(Point::new(x as i32 + pad + (dot / 2) as i32, row), dot)
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(display)
            .ok();
        draw_text(display, label, Point::new(x as i32 + pad * 2 + dot as i32, row), LABEL_FONT, p.text_muted, LEFT_MIDDLE);

        if !self.clock.is_empty() {
            let right = (x + width) as i32 - pad;
            draw_text(display, &self.clock, Point::new(right, top + self.px(38) as i32), SCALE_FONT, p.text, RIGHT_MIDDLE);
        }
    }
}

impl IndicatorSink for Chrome {
    fn readout(
        &mut self,
        channel: Channel,
        readout: &Readout,
    ) {
        if let Some(idx) = Channel::AUXILIARY.iter().position(|c| *c == channel) {
            self.readouts[idx] = Some(readout.clone());
            self.dirty = true;
        }
    }

    fn shift(
        &mut self,
        indicators: ShiftIndicators,
    ) {
        self.shift = indicators;
        self.dirty = true;
    }

    fn connectivity(
        &mut self,
        connected: bool,
    ) {
        self.connected = connected;
        self.dirty = true;
    }

    fn clock(
        &mut self,
        time: &str,
    ) {
        time.clone_into(&mut self.clock);
        self.dirty = true;
    }
}
