//! Latest-known vehicle state.
//!
//! [`VehicleState`] is owned by the engine and mutated only through
//! [`VehicleState::merge`] (telemetry and the simulation override both go
//! through it). A merge writes every field present in the update and leaves
//! the rest untouched, so a frame carrying only `BOOST` never resets speed.
//!
//! # Change Detection
//!
//! | Channel kind | Compared as |
//! |--------------|-------------|
//! | SPEED, RPM and other integer channels | Exact integer (already truncated) |
//! | VOLTAGE, BOOST, OILPRESS | Difference above [`FLOAT_EPSILON`] |
//! | UART_CONNECTED, TIME | Exact |

use crate::channel::{Channel, ChannelSet};
use crate::telemetry::TelemetryUpdate;

/// Float channels closer than this are reported as unchanged.
pub const FLOAT_EPSILON: f32 = 1e-3;

// =============================================================================
// Defaults (shown before the first frame arrives)
// =============================================================================

pub const DEFAULT_SPEED: i32 = 0;
pub const DEFAULT_RPM: i32 = 0;
pub const DEFAULT_COOLANT: i32 = 20;
pub const DEFAULT_OIL: i32 = 60;
pub const DEFAULT_FUEL: i32 = 73;
pub const DEFAULT_VOLTAGE: f32 = 12.1;
pub const DEFAULT_BOOST: f32 = 1.1;
pub const DEFAULT_OIL_PRESS: f32 = 0.3;

/// Last-known value of every channel.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleState {
    pub speed: i32,
    pub rpm: i32,
    pub coolant: i32,
    pub oil: i32,
    pub fuel: i32,
    pub voltage: f32,
    pub boost: f32,
    pub oil_press: f32,
    pub uart_connected: bool,
    pub time: String,
}

impl VehicleState {
    pub const fn new() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            rpm: DEFAULT_RPM,
            coolant: DEFAULT_COOLANT,
            oil: DEFAULT_OIL,
            fuel: DEFAULT_FUEL,
            voltage: DEFAULT_VOLTAGE,
            boost: DEFAULT_BOOST,
            oil_press: DEFAULT_OIL_PRESS,
            uart_connected: false,
            time: String::new(),
        }
    }

    /// Apply every field present in `update`.
    ///
    /// Returns the channels whose value actually changed.
    pub fn merge(
        &mut self,
        update: &TelemetryUpdate,
    ) -> ChannelSet {
        let mut changed = ChannelSet::EMPTY;

        merge_exact(&mut self.speed, update.speed, Channel::Speed, &mut changed);
        merge_exact(&mut self.rpm, update.rpm, Channel::Rpm, &mut changed);
        merge_exact(&mut self.coolant, update.coolant, Channel::Coolant, &mut changed);
        merge_exact(&mut self.oil, update.oil, Channel::Oil, &mut changed);
        merge_exact(&mut self.fuel, update.fuel, Channel::Fuel, &mut changed);
        merge_float(&mut self.voltage, update.voltage, Channel::Voltage, &mut changed);
        merge_float(&mut self.boost, update.boost, Channel::Boost, &mut changed);
        merge_float(&mut self.oil_press, update.oil_press, Channel::OilPress, &mut changed);
        merge_exact(&mut self.uart_connected, update.uart_connected, Channel::UartConnected, &mut changed);

        if let Some(time) = &update.time
            && *time != self.time
        {
            self.time.clone_from(time);
            changed.insert(Channel::Time);
        }

        changed
    }

    /// Flip the connectivity signal. Returns `true` if it changed.
    pub fn set_connected(
        &mut self,
        connected: bool,
    ) -> bool {
        let changed = self.uart_connected != connected;
        self.uart_connected = connected;
        changed
    }

    /// Numeric value of an analog channel. `None` for the link flag and clock.
    pub fn value(
        &self,
        channel: Channel,
    ) -> Option<f32> {
        match channel {
            Channel::Speed => Some(self.speed as f32),
            Channel::Rpm => Some(self.rpm as f32),
            Channel::Coolant => Some(self.coolant as f32),
            Channel::Oil => Some(self.oil as f32),
            Channel::Fuel => Some(self.fuel as f32),
            Channel::Voltage => Some(self.voltage),
            Channel::Boost => Some(self.boost),
            Channel::OilPress => Some(self.oil_press),
            Channel::UartConnected | Channel::Time => None,
        }
    }
}

impl Default for VehicleState {
    fn default() -> Self { Self::new() }
}

fn merge_exact<T: PartialEq + Copy>(
    slot: &mut T,
    incoming: Option<T>,
    channel: Channel,
    changed: &mut ChannelSet,
) {
    if let Some(value) = incoming {
        if *slot != value {
            changed.insert(channel);
        }
        *slot = value;
    }
}

fn merge_float(
    slot: &mut f32,
    incoming: Option<f32>,
    channel: Channel,
    changed: &mut ChannelSet,
) {
    if let Some(value) = incoming {
        if (*slot - value).abs() > FLOAT_EPSILON {
            changed.insert(channel);
        }
        // Always store, so the state holds exactly what was sent.
        *slot = value;
    }
}
