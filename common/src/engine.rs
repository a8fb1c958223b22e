//! Cluster engine: telemetry in, frames out.
//!
//! The engine is the single owner of [`VehicleState`]. Transport events and
//! operator actions mutate it on the caller's thread; [`Engine::tick`] is the
//! display-refresh callback that decides, through the [`RedrawScheduler`],
//! whether to draw.
//!
//! # Event Flow
//!
//! ```text
//! EngineEvent::Frame ─► decode ─► strip simulated ─► merge ─► mark_dirty
//! simulate()          ─────────────────────────────► merge ─► mark_dirty_now
//! tick(now)           ─► presenter (changes only) ─► scheduler ─► render?
//! ```
//!
//! Decode failures and transport drops are logged and counted. The last
//! valid state stays on screen.

use std::time::Instant;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use tracing::{debug, info, warn};

use crate::channel::{Channel, ChannelSet};
use crate::config::EngineConfig;
use crate::error::{DecodeError, SimulationError};
use crate::presenter::{IndicatorPresenter, IndicatorSink};
use crate::render::{FrameReport, GaugeRenderer};
use crate::scheduler::{FrameDecision, RedrawScheduler, SchedulerStats};
use crate::simulation::SimulationState;
use crate::telemetry::{TelemetryUpdate, decode_frame};
use crate::theme::ThemeId;
use crate::vehicle::VehicleState;

/// Something the transport observed.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum EngineEvent {
    /// Channel opened.
    Connected,
    /// One text frame.
    Frame(String),
    /// Channel closed.
    Disconnected,
    /// Channel failed; treated like a close.
    Error(String),
}

/// Engine counters.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct EngineStats {
    pub scheduler: SchedulerStats,
    /// Frames decoded and merged.
    pub frames: u32,
    /// Frames rejected by the decoder.
    pub decode_failures: u32,
    /// Transport drops seen.
    pub disconnects: u32,
}

pub struct Engine {
    state: VehicleState,
    simulation: SimulationState,
    scheduler: RedrawScheduler,
    renderer: GaugeRenderer,
    presenter: IndicatorPresenter,
    stats: EngineStats,
    running: bool,
}

impl Engine {
    pub fn new(config: &EngineConfig) -> Self {
        let renderer = GaugeRenderer::new(config);
        info!(
            theme = renderer.theme().name(),
            scale = renderer.layout().scale,
            needle = ?renderer.needle_style(),
            simulation = ?config.simulation,
            "engine ready"
        );
        Self {
            state: VehicleState::new(),
            simulation: SimulationState::new(config.simulation),
            scheduler: RedrawScheduler::new(config.frame_interval()),
            renderer,
            presenter: IndicatorPresenter::new(),
            stats: EngineStats::default(),
            running: true,
        }
    }

    #[inline]
    pub fn state(&self) -> &VehicleState { &self.state }

    #[inline]
    pub fn simulation(&self) -> &SimulationState { &self.simulation }

    #[inline]
    pub fn renderer(&self) -> &GaugeRenderer { &self.renderer }

    #[inline]
    pub fn is_running(&self) -> bool { self.running }

    /// Surface size in pixels.
    #[inline]
    pub fn size(&self) -> Size { self.renderer.size() }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            scheduler: self.scheduler.stats(),
            ..self.stats
        }
    }

    /// Feed one transport event. Never fails; problems are logged.
    pub fn handle(
        &mut self,
        event: EngineEvent,
    ) {
        if !self.running {
            return;
        }
        match event {
            EngineEvent::Connected => info!("telemetry channel open"),
            EngineEvent::Frame(text) => {
                if let Err(err) = self.apply_frame(&text) {
                    warn!(%err, "dropping telemetry frame");
                }
            }
            EngineEvent::Disconnected => self.link_lost("closed"),
            EngineEvent::Error(reason) => self.link_lost(&reason),
        }
    }

    /// Decode and merge one text frame. Returns the channels that changed.
    ///
    /// On error the state is left untouched.
    pub fn apply_frame(
        &mut self,
        text: &str,
    ) -> Result<ChannelSet, DecodeError> {
        let mut update = decode_frame(text).inspect_err(|_| {
            self.stats.decode_failures = self.stats.decode_failures.saturating_add(1);
        })?;

        self.simulation.filter(&mut update);
        let changed = self.state.merge(&update);
        self.stats.frames = self.stats.frames.saturating_add(1);

        if changed.intersects(ChannelSet::SURFACE) {
            self.scheduler.mark_dirty();
        }
        debug!(changed = changed.len(), "frame merged");
        Ok(changed)
    }

    /// Operator override of SPEED, RPM or COOLANT.
    pub fn simulate(
        &mut self,
        channel: Channel,
        value: f32,
    ) -> Result<(), SimulationError> {
        let update = self.simulation.set(channel, value, &self.state)?;
        self.apply_simulated(&update);
        Ok(())
    }

    /// Operator nudge of a simulated channel.
    pub fn adjust_simulation(
        &mut self,
        channel: Channel,
        delta: f32,
    ) -> Result<(), SimulationError> {
        let update = self.simulation.adjust(channel, delta, &self.state)?;
        self.apply_simulated(&update);
        Ok(())
    }

    /// Hand the simulated channels back to live telemetry. Values stay where
    /// they are until the next live frame.
    pub fn release_simulation(&mut self) -> Result<(), SimulationError> { self.simulation.release() }

    /// Switch theme and force a redraw on the next refresh.
    pub fn set_theme(
        &mut self,
        theme: ThemeId,
    ) -> bool {
        let changed = self.renderer.set_theme(theme);
        if changed {
            self.scheduler.mark_dirty_now();
        }
        changed
    }

    /// Advance to the next theme.
    pub fn cycle_theme(&mut self) -> ThemeId {
        let next = self.renderer.theme().next();
        self.set_theme(next);
        next
    }

    /// Display refresh callback.
    ///
    /// Pushes indicator changes to `sink` every call and renders to `display`
    /// when the scheduler says so.
    pub fn tick<D, S>(
        &mut self,
        display: &mut D,
        sink: &mut S,
        now: Instant,
    ) -> Option<FrameReport>
    where
        D: DrawTarget<Color = Rgb888>,
        S: IndicatorSink + ?Sized,
    {
        if !self.running {
            return None;
        }

        self.presenter.present(&self.state, sink);

        match self.scheduler.on_frame(now) {
            FrameDecision::Render => {
                let report = self.renderer.render(display, &self.state);
                self.scheduler.complete(now);
                Some(report)
            }
            FrameDecision::Deferred | FrameDecision::Idle => None,
        }
    }

    /// Stop reacting. Cancels any pending frame request; later events and
    /// ticks are ignored.
    pub fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        self.scheduler.cancel();
        self.running = false;
        let stats = self.stats();
        info!(
            frames = stats.frames,
            redraws = stats.scheduler.redraws,
            coalesced = stats.scheduler.coalesced,
            decode_failures = stats.decode_failures,
            disconnects = stats.disconnects,
            "engine stopped"
        );
    }

    fn apply_simulated(
        &mut self,
        update: &TelemetryUpdate,
    ) {
        self.state.merge(update);
        self.scheduler.mark_dirty_now();
    }

    fn link_lost(
        &mut self,
        reason: &str,
    ) {
        self.stats.disconnects = self.stats.disconnects.saturating_add(1);
        warn!(reason, "telemetry channel lost; keeping last state");
        self.state.set_connected(false);
    }
}
