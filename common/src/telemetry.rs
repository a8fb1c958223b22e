//! Telemetry frame decoding.
//!
//! A frame is one JSON object pushed by the backend. Any subset of the known
//! keys may be present, in any order, and values may arrive either as JSON
//! numbers or as strings straight off the serial line (`"3000"`, `"45°C"`,
//! `"12.4V"`). Decoding is lenient per field and strict per frame:
//!
//! | Input | Outcome |
//! |-------|---------|
//! | Unknown key | Ignored |
//! | Known key, unparsable value | That field dropped, rest of frame kept |
//! | Invalid JSON / non-object | [`DecodeError`], nothing applied |
//!
//! Numeric strings are read by their leading numeric prefix, so unit suffixes
//! added upstream do not cost the value.

use serde_json::{Map, Value};
use tracing::debug;

use crate::channel::{Channel, ChannelSet};
use crate::error::DecodeError;

/// Alternate key accepted for `VOLTAGE`. `VOLTAGE` wins when both are present.
pub const BATTERY_ALIAS: &str = "BATTERY";

// =============================================================================
// Partial Update
// =============================================================================

/// Decoded contents of one frame. `None` means "not in this frame".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TelemetryUpdate {
    pub speed: Option<i32>,
    pub rpm: Option<i32>,
    pub coolant: Option<i32>,
    pub oil: Option<i32>,
    pub fuel: Option<i32>,
    pub voltage: Option<f32>,
    pub boost: Option<f32>,
    pub oil_press: Option<f32>,
    pub uart_connected: Option<bool>,
    pub time: Option<String>,
}

impl TelemetryUpdate {
    /// Channels present in this update.
    pub fn channels(&self) -> ChannelSet {
        let mut set = ChannelSet::EMPTY;
        let present = [
            (Channel::Speed, self.speed.is_some()),
            (Channel::Rpm, self.rpm.is_some()),
            (Channel::Coolant, self.coolant.is_some()),
            (Channel::Oil, self.oil.is_some()),
            (Channel::Fuel, self.fuel.is_some()),
            (Channel::Voltage, self.voltage.is_some()),
            (Channel::Boost, self.boost.is_some()),
            (Channel::OilPress, self.oil_press.is_some()),
            (Channel::UartConnected, self.uart_connected.is_some()),
            (Channel::Time, self.time.is_some()),
        ];
        for (channel, is_present) in present {
            if is_present {
                set.insert(channel);
            }
        }
        set
    }

    #[inline]
    pub fn is_empty(&self) -> bool { self.channels().is_empty() }

    /// Fold a newer update on top of this one. Fields present in `newer` win.
    pub fn overlay(
        &mut self,
        newer: Self,
    ) {
        fn take<T>(
            slot: &mut Option<T>,
            newer: Option<T>,
        ) {
            if newer.is_some() {
                *slot = newer;
            }
        }

        take(&mut self.speed, newer.speed);
        take(&mut self.rpm, newer.rpm);
        take(&mut self.coolant, newer.coolant);
        take(&mut self.oil, newer.oil);
        take(&mut self.fuel, newer.fuel);
        take(&mut self.voltage, newer.voltage);
        take(&mut self.boost, newer.boost);
        take(&mut self.oil_press, newer.oil_press);
        take(&mut self.uart_connected, newer.uart_connected);
        take(&mut self.time, newer.time);
    }

    /// Drop every field in `channels`.
    pub fn remove(
        &mut self,
        channels: ChannelSet,
    ) {
        for channel in channels.iter() {
            match channel {
                Channel::Speed => self.speed = None,
                Channel::Rpm => self.rpm = None,
                Channel::Coolant => self.coolant = None,
                Channel::Oil => self.oil = None,
                Channel::Fuel => self.fuel = None,
                Channel::Voltage => self.voltage = None,
                Channel::Boost => self.boost = None,
                Channel::OilPress => self.oil_press = None,
                Channel::UartConnected => self.uart_connected = None,
                Channel::Time => self.time = None,
            }
        }
    }
}

// =============================================================================
// Frame Decoding
// =============================================================================

/// Decode one raw frame.
pub fn decode_frame(text: &str) -> Result<TelemetryUpdate, DecodeError> {
    let value: Value = serde_json::from_str(text)?;
    match value {
        Value::Object(map) => Ok(decode_object(&map)),
        Value::Array(_) => Err(DecodeError::NotAnObject("array")),
        Value::String(_) => Err(DecodeError::NotAnObject("string")),
        Value::Number(_) => Err(DecodeError::NotAnObject("number")),
        Value::Bool(_) => Err(DecodeError::NotAnObject("bool")),
        Value::Null => Err(DecodeError::NotAnObject("null")),
    }
}

/// Decode an already-parsed key/value bag.
pub fn decode_object(map: &Map<String, Value>) -> TelemetryUpdate {
    let voltage = field(map, Channel::Voltage.key(), float_value)
        .or_else(|| field(map, BATTERY_ALIAS, float_value));

    TelemetryUpdate {
        speed: field(map, Channel::Speed.key(), int_value),
        rpm: field(map, Channel::Rpm.key(), int_value),
        coolant: field(map, Channel::Coolant.key(), int_value),
        oil: field(map, Channel::Oil.key(), int_value),
        fuel: field(map, Channel::Fuel.key(), int_value),
        voltage,
        boost: field(map, Channel::Boost.key(), float_value),
        oil_press: field(map, Channel::OilPress.key(), float_value),
        uart_connected: field(map, Channel::UartConnected.key(), bool_value),
        time: field(map, Channel::Time.key(), string_value),
    }
}

fn field<T>(
    map: &Map<String, Value>,
    key: &str,
    parse: fn(&Value) -> Option<T>,
) -> Option<T> {
    let raw = map.get(key)?;
    let parsed = parse(raw);
    if parsed.is_none() {
        debug!(key, value = %raw, "dropping unparsable field");
    }
    parsed
}

// =============================================================================
// Value Parsers
// =============================================================================

/// Integer channel value. Fractions truncate toward zero.
fn int_value(value: &Value) -> Option<i32> {
    let wide = match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i,
            None => {
                let f = n.as_f64()?;
                if !f.is_finite() {
                    return None;
                }
                f.trunc() as i64
            }
        },
        Value::String(s) => parse_int_prefix(s)?,
        _ => return None,
    };
    i32::try_from(wide).ok()
}

fn float_value(value: &Value) -> Option<f32> {
    let f = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_float_prefix(s)?,
        _ => return None,
    };
    let narrow = f as f32;
    narrow.is_finite().then_some(narrow)
}

fn bool_value(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64()? {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn string_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// Leading integer of `s`: optional sign then digits, surrounding text
/// ignored. `"45°C"` → 45, `"7.9"` → 7, `"abc"` → `None`.
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    s[..end].parse().ok()
}

/// Leading decimal number of `s`. `"12.4V"` → 12.4, `".5 bar"` → 0.5.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let mut digits = 0usize;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return None;
    }
    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_decode_numeric_frame() {
        let update = decode_frame(r#"{"RPM": 3200, "SPEED": 88, "BOOST": 1.4}"#).unwrap();
        assert_eq!(
            update,
            TelemetryUpdate {
                rpm: Some(3200),
                speed: Some(88),
                boost: Some(1.4),
                ..TelemetryUpdate::default()
            }
        );
    }

    #[test]
    fn test_decode_string_values_from_serial_line() {
        let update = decode_frame(r#"{"RPM": "3000", "SPEED": "120", "COOLANT": "45°C"}"#).unwrap();
        assert_eq!(update.rpm, Some(3000));
        assert_eq!(update.speed, Some(120));
        assert_eq!(update.coolant, Some(45), "unit suffix should not cost the value");
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let update = decode_frame(r#"{"GEAR": 3, "LAMBDA": 0.98}"#).unwrap();
        assert!(update.is_empty());
    }

    #[test]
    fn test_bad_field_dropped_others_kept() {
        let update = decode_frame(r#"{"RPM": "n/a", "SPEED": 50, "VOLTAGE": {"v": 1}}"#).unwrap();
        assert_eq!(update.rpm, None);
        assert_eq!(update.speed, Some(50));
        assert_eq!(update.voltage, None);
    }

    #[test]
    fn test_voltage_preferred_over_battery() {
        let both = decode_frame(r#"{"BATTERY": 11.9, "VOLTAGE": 12.2}"#).unwrap();
        assert_eq!(both.voltage, Some(12.2));
        let alias = decode_frame(r#"{"BATTERY": "12.0V"}"#).unwrap();
        assert_eq!(alias.voltage, Some(12.0));
    }

    #[test]
    fn test_battery_used_when_voltage_unparsable() {
        let update = decode_frame(r#"{"VOLTAGE": "--", "BATTERY": 12.1}"#).unwrap();
        assert_eq!(update.voltage, Some(12.1));
    }

    #[test]
    fn test_integer_channels_truncate() {
        let update = decode_frame(r#"{"SPEED": 87.9, "FUEL": "55.5"}"#).unwrap();
        assert_eq!(update.speed, Some(87));
        assert_eq!(update.fuel, Some(55));
    }

    #[test]
    fn test_out_of_range_integer_dropped() {
        let update = decode_frame(r#"{"RPM": 99999999999}"#).unwrap();
        assert_eq!(update.rpm, None);
    }

    #[test]
    fn test_special_keys() {
        let update = decode_frame(r#"{"UART_CONNECTED": true, "TIME": "12:34"}"#).unwrap();
        assert_eq!(update.uart_connected, Some(true));
        assert_eq!(update.time.as_deref(), Some("12:34"));

        let stringly = decode_frame(r#"{"UART_CONNECTED": "false", "TIME": 5}"#).unwrap();
        assert_eq!(stringly.uart_connected, Some(false));
        assert_eq!(stringly.time, None, "clock must be a string");
    }

    #[test]
    fn test_invalid_syntax_is_error() {
        assert!(matches!(decode_frame("{RPM: 1"), Err(DecodeError::Syntax(_))));
    }

    #[test]
    fn test_non_object_is_error() {
        assert!(matches!(decode_frame("[1,2]"), Err(DecodeError::NotAnObject("array"))));
        assert!(matches!(decode_frame("42"), Err(DecodeError::NotAnObject("number"))));
    }

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int_prefix("  -12abc"), Some(-12));
        assert_eq!(parse_int_prefix("7.9"), Some(7));
        assert_eq!(parse_int_prefix("°C"), None);
        assert_eq!(parse_int_prefix("-"), None);
    }

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float_prefix("12.4V"), Some(12.4));
        assert_eq!(parse_float_prefix(".5 bar"), Some(0.5));
        assert_eq!(parse_float_prefix("3."), Some(3.0));
        assert_eq!(parse_float_prefix("."), None);
        assert_eq!(parse_float_prefix("bar"), None);
    }

    #[test]
    fn test_overlay_is_right_biased() {
        let mut base = TelemetryUpdate { rpm: Some(1000), speed: Some(10), ..TelemetryUpdate::default() };
        base.overlay(TelemetryUpdate { rpm: Some(2000), fuel: Some(40), ..TelemetryUpdate::default() });
        assert_eq!(base.rpm, Some(2000));
        assert_eq!(base.speed, Some(10));
        assert_eq!(base.fuel, Some(40));
    }

    #[test]
    fn test_remove_channels() {
        let mut update = decode_frame(r#"{"RPM": 1, "SPEED": 2, "COOLANT": 3, "FUEL": 4}"#).unwrap();
        update.remove(ChannelSet::SIMULATED);
        assert_eq!(update.channels().len(), 1);
        assert_eq!(update.fuel, Some(4));
    }
}
