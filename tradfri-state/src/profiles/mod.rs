//! Static channel profiles per device type
//!
//! A profile lists the raw fields of a device kind and the channels derived
//! from them, both in the order notifications are emitted.

mod air_purifier;
mod blind;
mod light;
mod plug;

pub use air_purifier::{AirQualityRating, AIR_QUALITY_UNDEFINED, FAN_MODES};

use crate::field::{DerivedField, FieldDescriptor};
use crate::model::DeviceType;

/// Field table of one device kind
#[derive(Debug)]
pub struct DeviceProfile {
    pub device_type: DeviceType,
    pub fields: &'static [FieldDescriptor],
    pub derived: &'static [DerivedField],
}

impl DeviceProfile {
    pub fn field(&self, channel: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|field| field.channel == channel)
    }

    pub fn derived_field(&self, channel: &str) -> Option<&'static DerivedField> {
        self.derived.iter().find(|derived| derived.channel == channel)
    }

    pub fn has_channel(&self, channel: &str) -> bool {
        self.field(channel).is_some() || self.derived_field(channel).is_some()
    }

    /// All channel ids in emission order
    pub fn channels(&self) -> impl Iterator<Item = &'static str> {
        self.fields
            .iter()
            .map(|field| field.channel)
            .chain(self.derived.iter().map(|derived| derived.channel))
    }
}

/// Profile table for `device_type`
pub fn profile_for(device_type: DeviceType) -> &'static DeviceProfile {
    match device_type {
        DeviceType::Light => &light::PROFILE,
        DeviceType::Plug => &plug::PROFILE,
        DeviceType::Blind => &blind::PROFILE,
        DeviceType::AirPurifier => &air_purifier::PROFILE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_channels_and_keys_are_unique() {
        for device_type in DeviceType::ALL {
            let profile = profile_for(device_type);

            let channels: Vec<_> = profile.channels().collect();
            let unique: HashSet<_> = channels.iter().collect();
            assert_eq!(channels.len(), unique.len(), "{} channels", device_type);

            let keys: HashSet<_> = profile
                .fields
                .iter()
                .map(|field| (field.source, field.key))
                .collect();
            assert_eq!(keys.len(), profile.fields.len(), "{} keys", device_type);
        }
    }

    #[test]
    fn test_derived_sources_exist() {
        for device_type in DeviceType::ALL {
            let profile = profile_for(device_type);
            for derived in profile.derived {
                assert!(
                    profile.field(derived.source).is_some(),
                    "{} derives {} from missing {}",
                    device_type,
                    derived.channel,
                    derived.source
                );
            }
        }
    }

    #[test]
    fn test_lookup() {
        let profile = profile_for(DeviceType::AirPurifier);
        assert!(profile.has_channel("fanMode"));
        assert!(profile.has_channel("airQualityRating"));
        assert!(!profile.has_channel("brightness"));
        assert!(profile.field("airQualityRating").is_none());
        assert!(profile.derived_field("airQualityRating").is_some());
    }
}
