//! Channel-level value types
//!
//! `State` is what the state layer reports to the owner of a device;
//! `Command` is what the owner asks the state layer to do.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary switch value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OnOff {
    On,
    Off,
}

impl OnOff {
    pub fn is_on(self) -> bool {
        matches!(self, OnOff::On)
    }
}

impl From<bool> for OnOff {
    fn from(on: bool) -> Self {
        if on {
            OnOff::On
        } else {
            OnOff::Off
        }
    }
}

impl fmt::Display for OnOff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnOff::On => write!(f, "ON"),
            OnOff::Off => write!(f, "OFF"),
        }
    }
}

/// Units attached to dimensioned values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    MicrogramsPerCubicMetre,
    Minutes,
    Percent,
}

impl Unit {
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::MicrogramsPerCubicMetre => "µg/m³",
            Unit::Minutes => "min",
            Unit::Percent => "%",
        }
    }
}

/// A number with a unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit.symbol())
    }
}

/// Decoded value of a channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum State {
    OnOff(OnOff),
    Decimal(i64),
    /// Whole percent, 0-100
    Percent(u8),
    Quantity(Quantity),
    /// The device reported that it has no meaningful value
    Undefined,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::OnOff(value) => write!(f, "{}", value),
            State::Decimal(value) => write!(f, "{}", value),
            State::Percent(value) => write!(f, "{}%", value),
            State::Quantity(quantity) => write!(f, "{}", quantity),
            State::Undefined => write!(f, "UNDEF"),
        }
    }
}

/// Command issued against a channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Re-read the device state; applies to the whole device
    Refresh,
    OnOff(OnOff),
    /// Bare number
    Decimal(f64),
    /// Number with a unit; the unit is assumed to be the one the device uses
    Quantity(Quantity),
}

impl Command {
    /// Bare magnitude of a numeric command
    pub fn magnitude(&self) -> Option<f64> {
        match self {
            Command::Decimal(value) => Some(*value),
            Command::Quantity(quantity) => Some(quantity.value),
            Command::Refresh | Command::OnOff(_) => None,
        }
    }

    /// Short name of the command type, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Refresh => "Refresh",
            Command::OnOff(_) => "OnOff",
            Command::Decimal(_) => "Decimal",
            Command::Quantity(_) => "Quantity",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Refresh => write!(f, "REFRESH"),
            Command::OnOff(value) => write!(f, "{}", value),
            Command::Decimal(value) => write!(f, "{}", value),
            Command::Quantity(quantity) => write!(f, "{}", quantity),
        }
    }
}

/// Reachability of a device as reported to its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThingStatus {
    Online,
    Offline,
}

impl From<bool> for ThingStatus {
    fn from(reachable: bool) -> Self {
        if reachable {
            ThingStatus::Online
        } else {
            ThingStatus::Offline
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_on_off_from_bool() {
        assert_eq!(OnOff::from(true), OnOff::On);
        assert_eq!(OnOff::from(false), OnOff::Off);
        assert!(OnOff::On.is_on());
        assert!(!OnOff::Off.is_on());
    }

    #[test]
    fn test_command_magnitude() {
        assert_eq!(Command::Decimal(20.0).magnitude(), Some(20.0));
        assert_eq!(
            Command::Quantity(Quantity::new(40.0, Unit::Percent)).magnitude(),
            Some(40.0)
        );
        assert_eq!(Command::OnOff(OnOff::On).magnitude(), None);
        assert_eq!(Command::Refresh.magnitude(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(State::OnOff(OnOff::Off).to_string(), "OFF");
        assert_eq!(State::Percent(42).to_string(), "42%");
        assert_eq!(
            State::Quantity(Quantity::new(12.0, Unit::MicrogramsPerCubicMetre)).to_string(),
            "12 µg/m³"
        );
        assert_eq!(State::Undefined.to_string(), "UNDEF");
        assert_eq!(Command::Refresh.to_string(), "REFRESH");
    }

    #[test]
    fn test_serde_round_trip() {
        let states = vec![
            State::OnOff(OnOff::On),
            State::Decimal(20),
            State::Percent(42),
            State::Quantity(Quantity::new(12.0, Unit::MicrogramsPerCubicMetre)),
            State::Undefined,
        ];
        let json = serde_json::to_string(&states).unwrap();
        assert_eq!(serde_json::from_str::<Vec<State>>(&json).unwrap(), states);

        let commands = vec![
            Command::Refresh,
            Command::OnOff(OnOff::Off),
            Command::Decimal(30.0),
            Command::Quantity(Quantity::new(20.0, Unit::Percent)),
        ];
        let json = serde_json::to_string(&commands).unwrap();
        assert_eq!(serde_json::from_str::<Vec<Command>>(&json).unwrap(), commands);

        let json = serde_json::to_string(&ThingStatus::Online).unwrap();
        assert_eq!(json, "\"Online\"");
        assert_eq!(
            serde_json::from_str::<ThingStatus>(&json).unwrap(),
            ThingStatus::Online
        );
    }

    #[test]
    fn test_thing_status_from_reachability() {
        assert_eq!(ThingStatus::from(true), ThingStatus::Online);
        assert_eq!(ThingStatus::from(false), ThingStatus::Offline);
    }
}
