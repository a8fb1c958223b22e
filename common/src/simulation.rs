//! Operator-driven simulation override.
//!
//! While active, SPEED, RPM and COOLANT come from the operator instead of
//! telemetry; every other channel stays live. Activation happens implicitly on
//! the first adjustment. Whether it can be turned off again is decided by
//! [`SimulationPolicy`]: `Latching` keeps it on for the session, `Releasable`
//! allows [`SimulationState::release`].

use tracing::info;

use crate::channel::{Channel, ChannelSet};
use crate::config::SimulationPolicy;
use crate::config::layout::{MAX_RPM, MAX_SPEED};
use crate::error::SimulationError;
use crate::telemetry::TelemetryUpdate;
use crate::vehicle::{DEFAULT_COOLANT, VehicleState};

/// Coolant range accepted from the operator, in °C.
pub const SIM_COOLANT_MIN: i32 = -40;
pub const SIM_COOLANT_MAX: i32 = 150;

/// Operator-supplied values for the simulated channels.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationState {
    active: bool,
    policy: SimulationPolicy,
    pub speed: i32,
    pub rpm: i32,
    pub coolant: i32,
}

impl SimulationState {
    pub const fn new(policy: SimulationPolicy) -> Self {
        Self {
            active: false,
            policy,
            speed: 0,
            rpm: 0,
            coolant: DEFAULT_COOLANT,
        }
    }

    #[inline]
    pub const fn is_active(&self) -> bool { self.active }

    #[inline]
    pub const fn policy(&self) -> SimulationPolicy { self.policy }

    /// Set one simulated channel, activating the override if needed.
    ///
    /// On first activation the other simulated channels are seeded from
    /// `current`, so taking over RPM does not snap the needle to zero.
    /// Returns the update to merge into the vehicle state.
    pub fn set(
        &mut self,
        channel: Channel,
        value: f32,
        current: &VehicleState,
    ) -> Result<TelemetryUpdate, SimulationError> {
        if !ChannelSet::SIMULATED.contains(channel) {
            return Err(SimulationError::UnsupportedChannel(channel.key()));
        }
        if !value.is_finite() {
            return Err(SimulationError::NotFinite);
        }

        if !self.active {
            self.speed = current.speed;
            self.rpm = current.rpm;
            self.coolant = current.coolant;
            self.active = true;
            info!(?channel, "simulation override active");
        }

        let value = value.trunc() as i32;
        match channel {
            Channel::Speed => self.speed = value.clamp(0, MAX_SPEED as i32),
            Channel::Rpm => self.rpm = value.clamp(0, MAX_RPM as i32),
            Channel::Coolant => self.coolant = value.clamp(SIM_COOLANT_MIN, SIM_COOLANT_MAX),
            _ => return Err(SimulationError::UnsupportedChannel(channel.key())),
        }

        Ok(self.as_update())
    }

    /// Nudge a simulated channel by `delta` from its current simulated value.
    pub fn adjust(
        &mut self,
        channel: Channel,
        delta: f32,
        current: &VehicleState,
    ) -> Result<TelemetryUpdate, SimulationError> {
        let base = if self.active {
            match channel {
                Channel::Speed => self.speed,
                Channel::Rpm => self.rpm,
                Channel::Coolant => self.coolant,
                _ => return Err(SimulationError::UnsupportedChannel(channel.key())),
            }
        } else {
            current.value(channel).map_or(0, |v| v as i32)
        };
        self.set(channel, base as f32 + delta, current)
    }

    /// Turn the override off. Refused under [`SimulationPolicy::Latching`].
    pub fn release(&mut self) -> Result<(), SimulationError> {
        match self.policy {
            SimulationPolicy::Latching if self.active => Err(SimulationError::Latched),
            _ => {
                if self.active {
                    info!("simulation override released");
                }
                self.active = false;
                Ok(())
            }
        }
    }

    /// Strip the simulated channels from a live frame while active.
    pub fn filter(
        &self,
        update: &mut TelemetryUpdate,
    ) {
        if self.active {
            update.remove(ChannelSet::SIMULATED);
        }
    }

    fn as_update(&self) -> TelemetryUpdate {
        TelemetryUpdate {
            speed: Some(self.speed),
            rpm: Some(self.rpm),
            coolant: Some(self.coolant),
            ..TelemetryUpdate::default()
        }
    }
}

impl Default for SimulationState {
    fn default() -> Self { Self::new(SimulationPolicy::default()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inactive_by_default() {
        let sim = SimulationState::default();
        assert!(!sim.is_active());
    }

    #[test]
    fn test_set_activates_and_seeds_from_state() {
        let mut state = VehicleState::new();
        state.speed = 90;
        state.coolant = 85;
        let mut sim = SimulationState::default();

        let update = sim.set(Channel::Rpm, 7000.0, &state).unwrap();
        assert!(sim.is_active());
        assert_eq!(update.rpm, Some(7000));
        assert_eq!(update.speed, Some(90), "speed seeded from live state");
        assert_eq!(update.coolant, Some(85));
    }

    #[test]
    fn test_values_clamped() {
        let state = VehicleState::new();
        let mut sim = SimulationState::default();
        sim.set(Channel::Rpm, 12_000.0, &state).unwrap();
        sim.set(Channel::Speed, -5.0, &state).unwrap();
        sim.set(Channel::Coolant, 400.0, &state).unwrap();
        assert_eq!(sim.rpm, 8000);
        assert_eq!(sim.speed, 0);
        assert_eq!(sim.coolant, SIM_COOLANT_MAX);
    }

    #[test]
    fn test_unsupported_and_non_finite() {
        let state = VehicleState::new();
        let mut sim = SimulationState::default();
        assert_eq!(sim.set(Channel::Fuel, 10.0, &state), Err(SimulationError::UnsupportedChannel("FUEL")));
        assert_eq!(sim.set(Channel::Rpm, f32::NAN, &state), Err(SimulationError::NotFinite));
        assert!(!sim.is_active(), "rejected input must not activate the override");
    }

    #[test]
    fn test_filter_strips_only_simulated_channels() {
        let state = VehicleState::new();
        let mut sim = SimulationState::default();
        let mut live = TelemetryUpdate {
            rpm: Some(900),
            speed: Some(30),
            coolant: Some(60),
            fuel: Some(50),
            boost: Some(0.8),
            ..TelemetryUpdate::default()
        };

        let mut untouched = live.clone();
        sim.filter(&mut untouched);
        assert_eq!(untouched, live, "inactive override leaves frames alone");

        sim.set(Channel::Rpm, 7000.0, &state).unwrap();
        sim.filter(&mut live);
        assert_eq!(live.rpm, None);
        assert_eq!(live.speed, None);
        assert_eq!(live.coolant, None);
        assert_eq!(live.fuel, Some(50));
        assert_eq!(live.boost, Some(0.8));
    }

    #[test]
    fn test_latching_refuses_release() {
        let state = VehicleState::new();
        let mut sim = SimulationState::new(SimulationPolicy::Latching);
        assert!(sim.release().is_ok(), "releasing an inactive override is a no-op");
        sim.set(Channel::Speed, 50.0, &state).unwrap();
        assert_eq!(sim.release(), Err(SimulationError::Latched));
        assert!(sim.is_active());
    }

    #[test]
    fn test_releasable_returns_to_live() {
        let state = VehicleState::new();
        let mut sim = SimulationState::new(SimulationPolicy::Releasable);
        sim.set(Channel::Speed, 50.0, &state).unwrap();
        assert!(sim.release().is_ok());
        assert!(!sim.is_active());
    }

    #[test]
    fn test_adjust_from_live_then_simulated() {
        let mut state = VehicleState::new();
        state.rpm = 2000;
        let mut sim = SimulationState::default();
        sim.adjust(Channel::Rpm, 250.0, &state).unwrap();
        assert_eq!(sim.rpm, 2250);
        sim.adjust(Channel::Rpm, 250.0, &state).unwrap();
        assert_eq!(sim.rpm, 2500);
    }
}
