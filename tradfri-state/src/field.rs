//! Typed field codec
//!
//! A [`FieldDescriptor`] binds a channel id to an attribute key and knows how
//! to turn the raw JSON value into a [`State`] and a [`Command`] back into a
//! raw value. Decoding never fails loudly: a missing key is
//! [`Decoded::Absent`], a value outside the field's domain is
//! [`Decoded::Invalid`]. Encoding validates the whole command before touching
//! the document, so a rejected command leaves no partial write behind.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::document::{integer, AttributeDocument};
use crate::model::{Command, DeviceType, OnOff, Quantity, State, Unit};

/// Where a field's raw value lives in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldSource {
    /// The device-type attribute object
    Attributes,
    /// The general device info object (`"3"`)
    GeneralInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    ReadWrite,
}

/// Value domain of a field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// `0` is off, anything else is on; encodes as `1`/`0`
    Switch,
    /// Integer restricted to an allow-list
    Enumerated(&'static [i64]),
    /// Whole percent stored as-is, 0-100
    Percent,
    /// Percent stored on a `0..=device_max` device scale
    Scaled { device_max: i64 },
    /// Integer with a unit; `undefined` is the device's "no reading" marker
    Measurement { unit: Unit, undefined: Option<i64> },
    /// Integer reported verbatim
    Raw,
}

/// Result of decoding one field from a document
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<T> {
    Present(T),
    /// The key is not in the document
    Absent,
    /// The key is there but its value is outside the field's domain
    Invalid(InvalidValue),
}

impl<T> Decoded<T> {
    /// Collapse to "value or nothing"
    pub fn value(self) -> Option<T> {
        match self {
            Decoded::Present(value) => Some(value),
            Decoded::Absent | Decoded::Invalid(_) => None,
        }
    }

    pub fn present(&self) -> Option<&T> {
        match self {
            Decoded::Present(value) => Some(value),
            Decoded::Absent | Decoded::Invalid(_) => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Decoded::Absent)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Decoded::Invalid(_))
    }
}

/// Raw value rejected by a field's domain
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidValue {
    pub key: &'static str,
    pub raw: Value,
    pub reason: &'static str,
}

impl fmt::Display for InvalidValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key {} = {}: {}", self.key, self.raw, self.reason)
    }
}

/// Reasons a command could not be encoded
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("Unknown channel '{channel}' for device type {device_type}")]
    UnknownChannel {
        channel: String,
        device_type: DeviceType,
    },

    #[error("Channel '{channel}' is read-only")]
    ReadOnly { channel: &'static str },

    #[error("Channel '{channel}' does not accept {command} commands")]
    UnsupportedCommand {
        channel: &'static str,
        command: &'static str,
    },

    #[error("Value {value} is out of range for channel '{channel}'")]
    OutOfDomain { channel: &'static str, value: String },
}

/// Binding of a channel to an attribute key and its value domain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDescriptor {
    pub channel: &'static str,
    pub key: &'static str,
    pub source: FieldSource,
    pub access: Access,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub const fn read_only(channel: &'static str, key: &'static str, kind: FieldKind) -> Self {
        Self {
            channel,
            key,
            source: FieldSource::Attributes,
            access: Access::ReadOnly,
            kind,
        }
    }

    pub const fn read_write(channel: &'static str, key: &'static str, kind: FieldKind) -> Self {
        Self {
            channel,
            key,
            source: FieldSource::Attributes,
            access: Access::ReadWrite,
            kind,
        }
    }

    /// Read-only field taken from the general device info object
    pub const fn general_info(channel: &'static str, key: &'static str, kind: FieldKind) -> Self {
        Self {
            channel,
            key,
            source: FieldSource::GeneralInfo,
            access: Access::ReadOnly,
            kind,
        }
    }

    pub fn is_writable(&self) -> bool {
        self.access == Access::ReadWrite && self.source == FieldSource::Attributes
    }

    /// Decode this field from `document`
    pub fn decode(&self, document: &AttributeDocument) -> Decoded<State> {
        let raw = match self.source {
            FieldSource::Attributes => document.get(self.key),
            FieldSource::GeneralInfo => document.general_info(self.key),
        };

        let raw = match raw {
            None | Some(Value::Null) => return Decoded::Absent,
            Some(raw) => raw,
        };

        let Some(number) = integer(raw) else {
            return self.invalid(raw, "not an integer");
        };

        match self.kind {
            FieldKind::Switch => Decoded::Present(State::OnOff(OnOff::from(number != 0))),
            FieldKind::Enumerated(allowed) => {
                if allowed.contains(&number) {
                    Decoded::Present(State::Decimal(number))
                } else {
                    self.invalid(raw, "not an allowed value")
                }
            }
            FieldKind::Percent => match u8::try_from(number) {
                Ok(percent) if percent <= 100 => Decoded::Present(State::Percent(percent)),
                _ => self.invalid(raw, "percent outside 0-100"),
            },
            FieldKind::Scaled { device_max } => {
                if (0..=device_max).contains(&number) {
                    let percent = (number as f64 * 100.0 / device_max as f64).round() as u8;
                    Decoded::Present(State::Percent(percent))
                } else {
                    self.invalid(raw, "outside the device scale")
                }
            }
            FieldKind::Measurement { unit, undefined } => {
                if undefined == Some(number) {
                    Decoded::Present(State::Undefined)
                } else {
                    Decoded::Present(State::Quantity(Quantity::new(number as f64, unit)))
                }
            }
            FieldKind::Raw => Decoded::Present(State::Decimal(number)),
        }
    }

    /// Validate `command` and write its raw value into `document`
    ///
    /// The document is only modified on success.
    pub fn encode(
        &self,
        command: &Command,
        document: &mut AttributeDocument,
    ) -> Result<(), EncodeError> {
        if !self.is_writable() {
            return Err(EncodeError::ReadOnly {
                channel: self.channel,
            });
        }

        let raw = self.encode_value(command)?;
        document.set(self.key, raw);
        Ok(())
    }

    fn encode_value(&self, command: &Command) -> Result<i64, EncodeError> {
        if let FieldKind::Switch = self.kind {
            return match command {
                Command::OnOff(value) => Ok(i64::from(value.is_on())),
                other => Err(self.unsupported(other)),
            };
        }

        let magnitude = command.magnitude().ok_or_else(|| self.unsupported(command))?;
        if !magnitude.is_finite() || magnitude.fract() != 0.0 {
            return Err(self.out_of_domain(magnitude));
        }
        let number = magnitude as i64;

        match self.kind {
            FieldKind::Enumerated(allowed) if !allowed.contains(&number) => {
                Err(self.out_of_domain(magnitude))
            }
            FieldKind::Percent if !(0..=100).contains(&number) => Err(self.out_of_domain(magnitude)),
            FieldKind::Scaled { device_max } => {
                if (0..=100).contains(&number) {
                    Ok((number as f64 * device_max as f64 / 100.0).round() as i64)
                } else {
                    Err(self.out_of_domain(magnitude))
                }
            }
            _ => Ok(number),
        }
    }

    fn invalid(&self, raw: &Value, reason: &'static str) -> Decoded<State> {
        Decoded::Invalid(InvalidValue {
            key: self.key,
            raw: raw.clone(),
            reason,
        })
    }

    fn unsupported(&self, command: &Command) -> EncodeError {
        EncodeError::UnsupportedCommand {
            channel: self.channel,
            command: command.kind(),
        }
    }

    fn out_of_domain(&self, value: f64) -> EncodeError {
        EncodeError::OutOfDomain {
            channel: self.channel,
            value: value.to_string(),
        }
    }
}

/// Channel computed from another channel's decoded state
///
/// `derive` returns `None` when the source state carries nothing to derive
/// from.
#[derive(Clone, Copy)]
pub struct DerivedField {
    pub channel: &'static str,
    /// Channel id of the source field
    pub source: &'static str,
    pub derive: fn(&State) -> Option<State>,
}

impl DerivedField {
    /// Derive from the source field's decode result; no source, no value
    pub fn derive_from(&self, source: &Decoded<State>) -> Decoded<State> {
        match source.present().and_then(self.derive) {
            Some(state) => Decoded::Present(state),
            None => Decoded::Absent,
        }
    }
}

impl fmt::Debug for DerivedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedField")
            .field("channel", &self.channel)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
