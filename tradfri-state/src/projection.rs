//! Typed views over attribute documents
//!
//! [`DeviceProjection`] reads an inbound document through the device type's
//! profile. [`DeviceRequest`] builds an outbound document one command at a
//! time and serializes it once when finished.

use serde::Serialize;
use serde_json::Value;

use crate::document::{integer, AttributeDocument};
use crate::error::{Result, StateError};
use crate::field::{Decoded, EncodeError, InvalidValue};
use crate::keys;
use crate::model::{Command, DeviceType, State, ThingStatus};
use crate::profiles::DeviceProfile;

/// Identification and metadata of a device
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub vendor: Option<String>,
    pub model_id: Option<String>,
    pub firmware_version: Option<String>,
}

/// Read-only typed view over one inbound document
#[derive(Debug, Clone, Copy)]
pub struct DeviceProjection<'a> {
    document: &'a AttributeDocument,
    profile: &'static DeviceProfile,
}

impl<'a> DeviceProjection<'a> {
    pub fn new(document: &'a AttributeDocument) -> Self {
        Self {
            document,
            profile: document.device_type().profile(),
        }
    }

    pub fn profile(&self) -> &'static DeviceProfile {
        self.profile
    }

    /// Reachability flag from the envelope
    ///
    /// `0` and `false` are unreachable; any other integer or `true` is
    /// reachable.
    pub fn reachability(&self) -> Decoded<bool> {
        let Some(raw) = self.document.envelope(keys::REACHABILITY_STATE) else {
            return Decoded::Absent;
        };

        match raw {
            Value::Bool(reachable) => Decoded::Present(*reachable),
            other => match integer(other) {
                Some(n) => Decoded::Present(n != 0),
                None => Decoded::Invalid(InvalidValue {
                    key: keys::REACHABILITY_STATE,
                    raw: other.clone(),
                    reason: "not a reachability flag",
                }),
            },
        }
    }

    /// A device that does not report reachability is treated as unreachable
    pub fn is_reachable(&self) -> bool {
        self.reachability().value().unwrap_or(false)
    }

    pub fn status(&self) -> ThingStatus {
        ThingStatus::from(self.is_reachable())
    }

    pub fn device_id(&self) -> Option<i64> {
        self.document.envelope(keys::INSTANCE_ID).and_then(integer)
    }

    pub fn name(&self) -> Option<&'a str> {
        self.document.envelope(keys::NAME).and_then(Value::as_str)
    }

    pub fn vendor(&self) -> Option<&'a str> {
        self.document
            .general_info(keys::DEVICE_VENDOR)
            .and_then(Value::as_str)
    }

    pub fn model_id(&self) -> Option<&'a str> {
        self.document
            .general_info(keys::DEVICE_MODEL)
            .and_then(Value::as_str)
    }

    pub fn firmware_version(&self) -> Option<&'a str> {
        self.document
            .general_info(keys::DEVICE_FIRMWARE)
            .and_then(Value::as_str)
    }

    pub fn info(&self) -> DeviceInfo {
        DeviceInfo {
            id: self.device_id(),
            name: self.name().map(str::to_string),
            vendor: self.vendor().map(str::to_string),
            model_id: self.model_id().map(str::to_string),
            firmware_version: self.firmware_version().map(str::to_string),
        }
    }

    /// Decode a single channel, raw or derived
    pub fn decode(&self, channel: &str) -> Result<Decoded<State>> {
        if let Some(field) = self.profile.field(channel) {
            return Ok(field.decode(self.document));
        }

        if let Some(derived) = self.profile.derived_field(channel) {
            let source = match self.profile.field(derived.source) {
                Some(field) => field.decode(self.document),
                None => Decoded::Absent,
            };
            return Ok(derived.derive_from(&source));
        }

        Err(StateError::UnknownChannel {
            channel: channel.to_string(),
            device_type: self.profile.device_type,
        })
    }

    /// Every channel that has a value, raw fields first, then derived ones
    pub fn states(&self) -> Vec<(&'static str, State)> {
        let decoded: Vec<_> = self
            .profile
            .fields
            .iter()
            .map(|field| (field.channel, field.decode(self.document)))
            .collect();

        let derived = self.profile.derived.iter().map(|derived| {
            let source = decoded
                .iter()
                .find(|(channel, _)| *channel == derived.source)
                .map(|(_, source)| derived.derive_from(source))
                .unwrap_or(Decoded::Absent);
            (derived.channel, source)
        });
        let derived: Vec<_> = derived.collect();

        let mut states = Vec::new();
        for (channel, value) in decoded.into_iter().chain(derived) {
            match value {
                Decoded::Present(state) => states.push((channel, state)),
                Decoded::Absent => tracing::trace!("Channel {} absent from update", channel),
                Decoded::Invalid(invalid) => {
                    tracing::debug!("Ignoring invalid value for channel {}: {}", channel, invalid)
                }
            }
        }
        states
    }
}

/// Outbound document under construction
///
/// Every `set` either encodes fully or leaves the document as it was.
#[derive(Debug, Clone)]
pub struct DeviceRequest {
    profile: &'static DeviceProfile,
    document: AttributeDocument,
}

impl DeviceRequest {
    pub fn new(device_type: DeviceType) -> Self {
        Self {
            profile: device_type.profile(),
            document: AttributeDocument::new(device_type),
        }
    }

    /// Encode `command` for `channel` into the request
    pub fn set(
        &mut self,
        channel: &str,
        command: &Command,
    ) -> std::result::Result<&mut Self, EncodeError> {
        if let Some(field) = self.profile.field(channel) {
            field.encode(command, &mut self.document)?;
            return Ok(self);
        }

        if let Some(derived) = self.profile.derived_field(channel) {
            return Err(EncodeError::ReadOnly {
                channel: derived.channel,
            });
        }

        Err(EncodeError::UnknownChannel {
            channel: channel.to_string(),
            device_type: self.profile.device_type,
        })
    }

    pub fn document(&self) -> &AttributeDocument {
        &self.document
    }

    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }

    /// Serialized wire form of the request
    pub fn finish(self) -> String {
        self.document.serialize()
    }
}
