//! Supported device kinds

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StateError;
use crate::keys;
use crate::profiles::{self, DeviceProfile};

/// Kind of device behind a gateway instance
///
/// Each kind stores its attributes under its own type code in the gateway
/// document and has a fixed channel profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DeviceType {
    Light,
    Plug,
    Blind,
    AirPurifier,
}

impl DeviceType {
    pub const ALL: [DeviceType; 4] = [
        DeviceType::Light,
        DeviceType::Plug,
        DeviceType::Blind,
        DeviceType::AirPurifier,
    ];

    /// Type code keying the attribute array in gateway documents
    pub fn code(self) -> &'static str {
        match self {
            DeviceType::Light => keys::TYPE_LIGHT,
            DeviceType::Plug => keys::TYPE_PLUG,
            DeviceType::Blind => keys::TYPE_BLIND,
            DeviceType::AirPurifier => keys::TYPE_AIR_PURIFIER,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DeviceType::Light => "light",
            DeviceType::Plug => "plug",
            DeviceType::Blind => "blind",
            DeviceType::AirPurifier => "airPurifier",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    /// Channel profile of this device kind
    pub fn profile(self) -> &'static DeviceProfile {
        profiles::profile_for(self)
    }
}

impl FromStr for DeviceType {
    type Err = StateError;

    /// Accepts either the type code (`"15025"`) or the name (`"airPurifier"`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::from_code(s)
            .or_else(|| Self::ALL.into_iter().find(|t| t.name().eq_ignore_ascii_case(s)))
            .ok_or_else(|| StateError::UnknownDeviceType(s.to_string()))
    }
}

impl TryFrom<String> for DeviceType {
    type Error = StateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DeviceType> for String {
    fn from(device_type: DeviceType) -> Self {
        device_type.name().to_string()
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        for a in DeviceType::ALL {
            for b in DeviceType::ALL {
                if a != b {
                    assert_ne!(a.code(), b.code());
                }
            }
        }
    }

    #[test]
    fn test_parse_code_and_name() {
        assert_eq!("15025".parse::<DeviceType>().unwrap(), DeviceType::AirPurifier);
        assert_eq!("airPurifier".parse::<DeviceType>().unwrap(), DeviceType::AirPurifier);
        assert_eq!("AIRPURIFIER".parse::<DeviceType>().unwrap(), DeviceType::AirPurifier);
        assert_eq!(" 3312 ".parse::<DeviceType>().unwrap(), DeviceType::Plug);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "remote".parse::<DeviceType>().unwrap_err();
        assert!(matches!(err, StateError::UnknownDeviceType(ref s) if s == "remote"));
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&DeviceType::Blind).unwrap();
        assert_eq!(json, "\"blind\"");
        let parsed: DeviceType = serde_json::from_str("\"15015\"").unwrap();
        assert_eq!(parsed, DeviceType::Blind);
    }

    #[test]
    fn test_profile_matches_type() {
        for device_type in DeviceType::ALL {
            assert_eq!(device_type.profile().device_type, device_type);
        }
    }
}
