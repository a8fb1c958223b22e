//! Vehicle telemetry cluster, desktop host.
//!
//! Opens an `embedded-graphics-simulator` window sized to the scaled gauge
//! surface plus a chrome strip, feeds the engine from the websocket (or the
//! demo source) and maps keys to the simulation override.
//!
//! # Keys
//!
//! | Key | Action |
//! |-----|--------|
//! | W / S | Simulated speed +5 / -5 |
//! | E / D | Simulated RPM +250 / -250 |
//! | R / F | Simulated coolant +2 / -2 |
//! | G | Release the override (only with `simulation = "releasable"`) |
//! | T | Next theme |
//! | Q | Quit |

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

mod chrome;
mod config;
mod demo;
mod timing;
mod transport;

use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use cluster_common::{Channel, Engine, SimulationError};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::chrome::Chrome;
use crate::config::{Args, Settings};
use crate::timing::{FRAME_TIME, RenderMetrics};
use crate::transport::TelemetryLink;

const SPEED_STEP: f32 = 5.0;
const RPM_STEP: f32 = 250.0;
const COOLANT_STEP: f32 = 2.0;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args = Args::parse();
    let settings = Settings::from_args(&args)?;
    let scale = settings.engine.effective_scale();

    let mut engine = Engine::new(&settings.engine);
    let surface = engine.size();
    let gauge_area = Rectangle::new(Point::zero(), surface);

    let mut display: SimulatorDisplay<Rgb888> =
        SimulatorDisplay::new(Size::new(surface.width, surface.height + Chrome::height(scale)));
    let mut chrome = Chrome::new(surface.height as i32, surface.width, scale, engine.renderer().theme());
    let output_settings = OutputSettingsBuilder::new().build();
    let mut window = Window::new("Telemetry Cluster", &output_settings);
    window.update(&display);

    let (events_tx, events_rx) = mpsc::channel();
    let link = if settings.demo {
        demo::spawn(events_tx).context("starting demo telemetry")?
    } else {
        info!(url = %settings.endpoint.url(), "connecting to telemetry backend");
        TelemetryLink::connect(&settings.endpoint, events_tx).context("starting telemetry reader")?
    };

    let mut metrics = RenderMetrics::new(Instant::now());

    'running: loop {
        let frame_start = Instant::now();

        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit => break 'running,
                SimulatorEvent::KeyDown { keycode, .. } => {
                    if !handle_key(&mut engine, &mut chrome, keycode) {
                        break 'running;
                    }
                }
                _ => {}
            }
        }

        while let Ok(event) = events_rx.try_recv() {
            engine.handle(event);
        }

        let report = engine.tick(&mut display.cropped(&gauge_area), &mut chrome, frame_start);
        if report.is_some() {
            metrics.record_redraw(frame_start.elapsed());
        }
        let chrome_drawn = chrome.draw(&mut display);

        if report.is_some() || chrome_drawn {
            window.update(&display);
        }

        if metrics.roll(Instant::now()) {
            let stats = engine.stats();
            debug!(
                redraw_rate = metrics.redraw_rate,
                render_us = metrics.render_us,
                coalesced = stats.scheduler.coalesced,
                deferrals = stats.scheduler.deferrals,
                frames = stats.frames,
                "render stats"
            );
        }

        let elapsed = frame_start.elapsed();
        if let Some(remaining) = FRAME_TIME.checked_sub(elapsed) {
            thread::sleep(remaining);
        }
    }

    // Reader first, so no event is produced for a stopped engine.
    drop(link);
    engine.shutdown();
    Ok(())
}

/// Apply one key press. Returns `false` when the user asked to quit.
fn handle_key(
    engine: &mut Engine,
    chrome: &mut Chrome,
    keycode: Keycode,
) -> bool {
    let result = match keycode {
        Keycode::W => engine.adjust_simulation(Channel::Speed, SPEED_STEP),
        Keycode::S => engine.adjust_simulation(Channel::Speed, -SPEED_STEP),
        Keycode::E => engine.adjust_simulation(Channel::Rpm, RPM_STEP),
        Keycode::D => engine.adjust_simulation(Channel::Rpm, -RPM_STEP),
        Keycode::R => engine.adjust_simulation(Channel::Coolant, COOLANT_STEP),
        Keycode::F => engine.adjust_simulation(Channel::Coolant, -COOLANT_STEP),
        Keycode::G => engine.release_simulation(),
        Keycode::T => {
            chrome.set_theme(engine.cycle_theme());
            Ok(())
        }
        Keycode::Q => return false,
        _ => Ok(()),
    };

    match result {
        Ok(()) => {}
        Err(SimulationError::Latched) => info!("simulation override is latched for this session"),
        Err(err) => warn!(%err, "operator input rejected"),
    }
    true
}
