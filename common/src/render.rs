//! Gauge surface renderer.
//!
//! [`GaugeRenderer`] owns the pixel [`Layout`], the active theme and the
//! cached static layer. It draws one complete frame from a [`VehicleState`]
//! snapshot; deciding *when* to draw is the
//! [`RedrawScheduler`](crate::scheduler::RedrawScheduler)'s job.
//!
//! # Draw Order
//!
//! | Step | Element | Cached |
//! |------|---------|--------|
//! | 1 | Clear to theme background | - |
//! | 2 | Track arc, RPM gradient fill | - |
//! | 3 | Tick marks and labels | Yes, per theme |
//! | 4 | Needle or beam | - |
//! | 5 | Speed readout | - |
//! | 6 | Auxiliary rings | - |
//!
//! The static layer is composited over the RPM arc so tick labels stay
//! readable where they overlap the fill.

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use tracing::{debug, info};

use crate::config::{EngineConfig, NeedleStyle};
use crate::geometry::Layout;
use crate::layer::PixelLayer;
use crate::presenter::Readout;
use crate::theme::{ThemeId, ThemePalette};
use crate::vehicle::VehicleState;
use crate::widgets::{draw_needle, draw_ring_gauge, draw_rpm_arc, draw_scale, draw_speed_readout, draw_track};

/// What one rendered frame showed.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct FrameReport {
    pub theme: ThemeId,
    pub speed: i32,
    pub rpm: i32,
    /// RPM arc fill, `0.0..=1.0`.
    pub rpm_fraction: f32,
    /// Needle position, `0.0..=1.0`.
    pub speed_fraction: f32,
    /// Needle or beam direction in radians.
    pub needle_angle: f32,
    /// The static layer was rebuilt for this frame.
    pub static_rebuilt: bool,
}

pub struct GaugeRenderer {
    layout: Layout,
    theme: ThemeId,
    needle: NeedleStyle,
    cache: Option<PixelLayer>,
    cache_builds: u32,
}

impl GaugeRenderer {
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_layout(Layout::new(config.effective_scale()), config.theme_id(), config.needle)
    }

    pub fn with_layout(
        layout: Layout,
        theme: ThemeId,
        needle: NeedleStyle,
    ) -> Self {
        Self {
            layout,
            theme,
            needle,
            cache: None,
            cache_builds: 0,
        }
    }

    #[inline]
    pub fn layout(&self) -> &Layout { &self.layout }

    #[inline]
    pub fn size(&self) -> Size { self.layout.size }

    #[inline]
    pub fn theme(&self) -> ThemeId { self.theme }

    #[inline]
    pub fn palette(&self) -> &'static ThemePalette { self.theme.palette() }

    #[inline]
    pub fn needle_style(&self) -> NeedleStyle { self.needle }

    /// Times the static layer has been built.
    #[inline]
    pub fn cache_builds(&self) -> u32 { self.cache_builds }

    /// Switch theme. Drops the cached static layer when the theme changes.
    /// Returns `true` if it changed.
    pub fn set_theme(
        &mut self,
        theme: ThemeId,
    ) -> bool {
        if theme == self.theme {
            return false;
        }
        info!(from = self.theme.name(), to = theme.name(), "theme changed");
        self.theme = theme;
        self.cache = None;
        true
    }

    /// Draw a full frame.
    pub fn render<D>(
        &mut self,
        display: &mut D,
        state: &VehicleState,
    ) -> FrameReport
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let palette = self.theme.palette();
        let static_rebuilt = self.ensure_static_layer();

        display.clear(palette.background).ok();

        draw_track(display, &self.layout, palette);
        let rpm_fraction = draw_rpm_arc(display, &self.layout, palette, state.rpm);

        if let Some(cache) = &self.cache {
            cache.blit(display).ok();
        }

        let (speed_fraction, pose) = draw_needle(display, &self.layout, palette, state.speed, self.needle);
        draw_speed_readout(display, &self.layout, palette, state.speed);

        for ring in &self.layout.rings {
            let readout = Readout::of(state, ring.channel);
            draw_ring_gauge(display, ring, palette, &readout, self.layout.scale);
        }

        FrameReport {
            theme: self.theme,
            speed: state.speed,
            rpm: state.rpm,
            rpm_fraction,
            speed_fraction,
            needle_angle: pose.angle,
            static_rebuilt,
        }
    }

    fn ensure_static_layer(&mut self) -> bool {
        if self.cache.is_some() {
            return false;
        }
        let mut layer = PixelLayer::new(self.layout.size);
        let ticks = draw_scale(&mut layer, &self.layout, self.theme.palette());
        self.cache = Some(layer);
        self.cache_builds = self.cache_builds.saturating_add(1);
        debug!(theme = self.theme.name(), ticks, "static layer built");
        true
    }
}
