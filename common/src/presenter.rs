//! Auxiliary indicator presenter.
//!
//! Derives the discrete signals the chrome around the gauge surface shows:
//! shift arrows, per-channel readouts with bar-fill percentages, the link
//! flag and the clock. [`IndicatorPresenter`] remembers what it last pushed
//! and only forwards changes to its [`IndicatorSink`].
//!
//! # Fill Ranges
//!
//! | Channel | Range | Unit |
//! |---------|-------|------|
//! | COOLANT, OIL | 0..120 | °C |
//! | FUEL | 0..100 | % |
//! | VOLTAGE | 11.8..12.3 | V |
//! | BOOST | 0..2 | bar |
//! | OILPRESS | 0..5 | bar |
//!
//! Fills are clamped to `0..=100`; non-finite input gives `0`.

use core::fmt::Write;

use heapless::String;

use crate::channel::Channel;
use crate::geometry::range_fraction;
use crate::vehicle::VehicleState;

/// Shift-down arrow shows below this RPM.
pub const SHIFT_DOWN_BELOW: i32 = 1000;

/// Shift-up arrow shows above this RPM.
pub const SHIFT_UP_ABOVE: i32 = 6000;

/// Readout text capacity.
pub const READOUT_LEN: usize = 16;

// =============================================================================
// Derivations
// =============================================================================

/// Visibility of the two shift arrows.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct ShiftIndicators {
    pub down: bool,
    pub up: bool,
}

impl ShiftIndicators {
    /// Hard thresholds, recomputed on every update.
    pub const fn from_rpm(rpm: i32) -> Self {
        Self {
            down: rpm < SHIFT_DOWN_BELOW,
            up: rpm > SHIFT_UP_ABOVE,
        }
    }
}

/// Fixed bar range for an auxiliary channel.
pub const fn channel_range(channel: Channel) -> Option<(f32, f32)> {
    match channel {
        Channel::Coolant | Channel::Oil => Some((0.0, 120.0)),
        Channel::Fuel => Some((0.0, 100.0)),
        Channel::Voltage => Some((11.8, 12.3)),
        Channel::Boost => Some((0.0, 2.0)),
        Channel::OilPress => Some((0.0, 5.0)),
        _ => None,
    }
}

/// Bar fill in percent. `0.0` for channels without a range.
pub fn fill_percent(
    channel: Channel,
    value: f32,
) -> f32 {
    channel_range(channel).map_or(0.0, |(min, max)| range_fraction(value, min, max) * 100.0)
}

/// Display unit for a channel.
pub const fn unit(channel: Channel) -> &'static str {
    match channel {
        Channel::Speed => "km/h",
        Channel::Rpm => "rpm",
        Channel::Coolant | Channel::Oil => "°C",
        Channel::Fuel => "%",
        Channel::Voltage => "V",
        Channel::Boost | Channel::OilPress => "bar",
        Channel::UartConnected | Channel::Time => "",
    }
}

/// Numeric text for a channel value: integers for whole-number channels,
/// one decimal for voltage and pressures.
pub fn format_value(
    channel: Channel,
    value: f32,
) -> String<READOUT_LEN> {
    let mut text = String::new();
    match channel {
        Channel::Voltage | Channel::Boost | Channel::OilPress => {
            let _ = write!(text, "{value:.1}");
        }
        _ => {
            let _ = write!(text, "{}", value as i32);
        }
    }
    text
}

// =============================================================================
// Readouts
// =============================================================================

/// One channel as the chrome shows it.
#[derive(Clone, PartialEq, Debug)]
pub struct Readout {
    pub text: String<READOUT_LEN>,
    pub unit: &'static str,
    pub fill_percent: f32,
}

impl Readout {
    pub fn new(
        channel: Channel,
        value: f32,
    ) -> Self {
        Self {
            text: format_value(channel, value),
            unit: unit(channel),
            fill_percent: fill_percent(channel, value),
        }
    }

    /// Read an auxiliary channel from the state.
    pub fn of(
        state: &VehicleState,
        channel: Channel,
    ) -> Self {
        Self::new(channel, state.value(channel).unwrap_or(0.0))
    }

    /// Text and unit as shown in the chrome, e.g. `85°C` or `1.1 bar`.
    pub fn joined(&self) -> String<24> {
        let mut out = String::new();
        let sep = if self.unit == unit(Channel::Boost) { " " } else { "" };
        let _ = write!(out, "{}{sep}{}", self.text, self.unit);
        out
    }

    /// Fill as a `0.0..=1.0` fraction.
    #[inline]
    pub fn fraction(&self) -> f32 { self.fill_percent / 100.0 }
}

// =============================================================================
// Sink + Presenter
// =============================================================================

/// Receiver of presenter output. Implemented by the window chrome.
pub trait IndicatorSink {
    fn readout(
        &mut self,
        channel: Channel,
        readout: &Readout,
    );

    fn shift(
        &mut self,
        indicators: ShiftIndicators,
    );

    fn connectivity(
        &mut self,
        connected: bool,
    );

    fn clock(
        &mut self,
        time: &str,
    );
}

/// Sink that discards everything. For headless runs.
pub struct NullSink;

impl IndicatorSink for NullSink {
    fn readout(
        &mut self,
        _channel: Channel,
        _readout: &Readout,
    ) {
    }

    fn shift(
        &mut self,
        _indicators: ShiftIndicators,
    ) {
    }

    fn connectivity(
        &mut self,
        _connected: bool,
    ) {
    }

    fn clock(
        &mut self,
        _time: &str,
    ) {
    }
}

/// Change-only forwarder of derived indicators.
#[derive(Default)]
pub struct IndicatorPresenter {
    readouts: [Option<Readout>; 6],
    shift: Option<ShiftIndicators>,
    connected: Option<bool>,
    clock: Option<std::string::String>,
}

impl IndicatorPresenter {
    pub fn new() -> Self { Self::default() }

    /// Push whatever changed since the last call. Returns the number of
    /// sink calls made.
    pub fn present<S>(
        &mut self,
        state: &VehicleState,
        sink: &mut S,
    ) -> usize
    where
        S: IndicatorSink + ?Sized,
    {
        let mut pushed = 0;

        for (slot, channel) in self.readouts.iter_mut().zip(Channel::AUXILIARY) {
            let readout = Readout::of(state, channel);
            if slot.as_ref() != Some(&readout) {
                sink.readout(channel, &readout);
                *slot = Some(readout);
                pushed += 1;
            }
        }

        let shift = ShiftIndicators::from_rpm(state.rpm);
        if self.shift != Some(shift) {
            sink.shift(shift);
            self.shift = Some(shift);
            pushed += 1;
        }

        if self.connected != Some(state.uart_connected) {
            sink.connectivity(state.uart_connected);
            self.connected = Some(state.uart_connected);
            pushed += 1;
        }

        if self.clock.as_deref() != Some(state.time.as_str()) {
            sink.clock(&state.time);
            self.clock = Some(state.time.clone());
            pushed += 1;
        }

        pushed
    }

    /// Forget what was pushed so the next call re-sends everything.
    pub fn reset(&mut self) { *self = Self::default(); }
}
