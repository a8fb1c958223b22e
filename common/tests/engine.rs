//! End-to-end behaviour of the cluster engine.

use std::time::{Duration, Instant};

use cluster_common::channel::Channel;
use cluster_common::geometry::fraction;
use cluster_common::layer::PixelLayer;
use cluster_common::presenter::{IndicatorSink, Readout, ShiftIndicators, fill_percent};
use cluster_common::telemetry::decode_frame;
use cluster_common::theme::{EMBER, TEAL};
use cluster_common::{Engine, EngineConfig, EngineEvent, ThemeId, VehicleState};
use pretty_assertions::assert_eq;

#[derive(Default)]
struct Chrome {
    shift: ShiftIndicators,
    connected: Option<bool>,
    clock: String,
    readouts: Vec<(Channel, Readout)>,
}

impl IndicatorSink for Chrome {
    fn readout(
        &mut self,
        channel: Channel,
        readout: &Readout,
    ) {
        self.readouts.push((channel, readout.clone()));
    }

    fn shift(
        &mut self,
        indicators: ShiftIndicators,
    ) {
        self.shift = indicators;
    }

    fn connectivity(
        &mut self,
        connected: bool,
    ) {
        self.connected = Some(connected);
    }

    fn clock(
        &mut self,
        time: &str,
    ) {
        self.clock = time.into();
    }
}

fn engine_with_theme(theme: &str) -> Engine {
    Engine::new(&EngineConfig {
        theme: theme.into(),
        ..EngineConfig::default()
    })
}

#[test]
fn test_merge_is_associative() {
    let a = decode_frame(r#"{"SPEED": 10, "RPM": 900, "FUEL": 40}"#).unwrap();
    let b = decode_frame(r#"{"RPM": 2500, "VOLTAGE": 12.2}"#).unwrap();
    let c = decode_frame(r#"{"SPEED": 55, "TIME": "08:15", "BOOST": 0.4}"#).unwrap();

    let mut sequential = VehicleState::new();
    sequential.merge(&a);
    sequential.merge(&b);
    sequential.merge(&c);

    let mut bc = b.clone();
    bc.overlay(c.clone());
    let mut a_bc = a.clone();
    a_bc.overlay(bc);
    let mut folded = VehicleState::new();
    folded.merge(&a_bc);

    let mut ab_c = a;
    ab_c.overlay(b);
    ab_c.overlay(c);
    let mut left = VehicleState::new();
    left.merge(&ab_c);

    assert_eq!(sequential, folded);
    assert_eq!(sequential, left);
    assert_eq!(sequential.speed, 55);
    assert_eq!(sequential.rpm, 2500);
}

#[test]
fn test_gauge_fraction_stays_in_unit_interval() {
    for x in [-1.0e6_f32, -1.0, 0.0, 127.5, 255.0, 255.5, 1.0e6] {
        let f = fraction(x, 255.0);
        assert!((0.0..=1.0).contains(&f), "fraction({x}) = {f}");
    }
}

#[test]
fn test_simulated_rpm_wins_over_live_telemetry() {
    let mut engine = Engine::new(&EngineConfig::default());
    let mut surface = PixelLayer::new(engine.size());
    let mut chrome = Chrome::default();

    engine.simulate(Channel::Rpm, 7000.0).unwrap();
    engine.handle(EngineEvent::Frame(r#"{"RPM": 1200, "SPEED": 40, "FUEL": 12}"#.into()));
    engine.handle(EngineEvent::Frame(r#"{"RPM": 800}"#.into()));

    let report = engine.tick(&mut surface, &mut chrome, Instant::now()).unwrap();
    assert!((report.rpm_fraction - 7000.0 / 8000.0).abs() < 1e-6);
    assert_eq!(chrome.shift, ShiftIndicators { down: false, up: true });
    assert_eq!(engine.state().fuel, 12, "non-simulated channels stay live");
    assert_eq!(engine.state().speed, 0, "speed is simulated too once the override is on");
}

#[test]
fn test_burst_collapses_into_one_redraw_with_last_values() {
    let mut engine = Engine::new(&EngineConfig::default());
    let mut surface = PixelLayer::new(engine.size());
    let mut chrome = Chrome::default();
    let t0 = Instant::now();

    engine.tick(&mut surface, &mut chrome, t0).unwrap();
    let before = engine.stats().scheduler.redraws;

    for i in 0..1000 {
        let frame = format!(r#"{{"RPM": {}, "SPEED": {}}}"#, i * 7, i % 200);
        engine.handle(EngineEvent::Frame(frame));
    }

    assert!(engine.tick(&mut surface, &mut chrome, t0 + Duration::from_millis(4)).is_none(), "inside the throttle window");
    let report = engine.tick(&mut surface, &mut chrome, t0 + Duration::from_millis(40)).unwrap();
    assert!(engine.tick(&mut surface, &mut chrome, t0 + Duration::from_millis(80)).is_none(), "nothing left to draw");

    assert_eq!(engine.stats().scheduler.redraws - before, 1);
    assert_eq!(report.rpm, 999 * 7);
    assert_eq!(report.speed, 999 % 200);
    assert_eq!(engine.stats().frames, 1000);
}

#[test]
fn test_theme_switch_recolors_scale_without_touching_values() {
    let mut engine = engine_with_theme("teal");
    let mut surface = PixelLayer::new(engine.size());
    let mut chrome = Chrome::default();
    let t0 = Instant::now();

    engine.handle(EngineEvent::Frame(r#"{"SPEED": 120, "RPM": 3500, "COOLANT": 88}"#.into()));
    engine.tick(&mut surface, &mut chrome, t0).unwrap();
    let state = engine.state().clone();
    assert!(surface.count(TEAL.tick) > 0);
    assert!(surface.count(TEAL.tick_label) > 0);
    assert_eq!(surface.count(EMBER.tick), 0);
    assert_eq!(surface.count(EMBER.tick_label), 0);

    assert!(engine.set_theme(ThemeId::Ember));
    let report = engine.tick(&mut surface, &mut chrome, t0 + Duration::from_millis(1)).unwrap();
    assert!(report.static_rebuilt);
    assert_eq!(surface.count(TEAL.tick), 0, "no teal tick marks left");
    assert!(surface.count(EMBER.tick) > 0, "ember tick marks drawn");
    assert_eq!(surface.count(TEAL.tick_label), 0, "no teal tick labels left");
    assert!(surface.count(EMBER.tick_label) > 0, "ember tick labels drawn");
    assert_eq!(*engine.state(), state);
}

#[test]
fn test_voltage_bar_fill() {
    assert!(fill_percent(Channel::Voltage, 11.8).abs() < 1e-3);
    assert!((fill_percent(Channel::Voltage, 12.3) - 100.0).abs() < 1e-3);
    assert!((fill_percent(Channel::Voltage, 12.05) - 50.0).abs() < 0.1);
}

#[test]
fn test_voltage_bar_reaches_chrome() {
    let mut engine = Engine::new(&EngineConfig::default());
    let mut surface = PixelLayer::new(engine.size());
    let mut chrome = Chrome::default();

    engine.handle(EngineEvent::Frame(r#"{"BATTERY": "12.3V"}"#.into()));
    engine.tick(&mut surface, &mut chrome, Instant::now());

    let (_, voltage) = chrome.readouts.iter().rev().find(|(c, _)| *c == Channel::Voltage).unwrap();
    assert_eq!(voltage.text.as_str(), "12.3");
    assert!((voltage.fill_percent - 100.0).abs() < 1e-3);
}

#[test]
fn test_malformed_frame_leaves_state_identical() {
    let mut engine = Engine::new(&EngineConfig::default());
    engine.handle(EngineEvent::Frame(r#"{"SPEED": 61, "VOLTAGE": 12.2, "TIME": "09:00"}"#.into()));
    let before = engine.state().clone();

    engine.handle(EngineEvent::Frame(r#"{"SPEED": 70, "#.into()));
    engine.handle(EngineEvent::Frame("\"just a string\"".into()));
    engine.handle(EngineEvent::Frame(String::new()));

    assert_eq!(*engine.state(), before);
    assert_eq!(engine.stats().decode_failures, 3);
}

#[test]
fn test_lenient_values_keep_leading_number() {
    let mut engine = Engine::new(&EngineConfig::default());
    engine.handle(EngineEvent::Frame(r#"{"COOLANT": "45°C", "OIL": "abc", "FUEL": 55.9}"#.into()));
    assert_eq!(engine.state().coolant, 45);
    assert_eq!(engine.state().oil, 60, "unparseable field is dropped, default kept");
    assert_eq!(engine.state().fuel, 55);
}

#[test]
fn test_drop_then_reconnect() {
    let mut engine = Engine::new(&EngineConfig::default());
    let mut surface = PixelLayer::new(engine.size());
    let mut chrome = Chrome::default();

    engine.handle(EngineEvent::Frame(r#"{"UART_CONNECTED": true, "SPEED": 33}"#.into()));
    engine.tick(&mut surface, &mut chrome, Instant::now());
    assert_eq!(chrome.connected, Some(true));

    engine.handle(EngineEvent::Disconnected);
    engine.tick(&mut surface, &mut chrome, Instant::now());
    assert_eq!(chrome.connected, Some(false));
    assert_eq!(engine.state().speed, 33, "last values stay on screen");

    engine.handle(EngineEvent::Connected);
    engine.handle(EngineEvent::Frame(r#"{"UART_CONNECTED": 1}"#.into()));
    engine.tick(&mut surface, &mut chrome, Instant::now());
    assert_eq!(chrome.connected, Some(true));
}
