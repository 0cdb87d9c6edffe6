//! Per-device configuration
//!
//! A device is identified by its gateway instance id and its device type.
//! Configs are usually loaded from JSON:
//!
//! ```rust
//! use tradfri_state::{DeviceConfig, DeviceType};
//!
//! let config = DeviceConfig::from_json(r#"{"id": 65537, "type": "airPurifier"}"#).unwrap();
//! assert_eq!(config.device_type, DeviceType::AirPurifier);
//! ```

use serde::{Deserialize, Serialize};

use coap_client::{DeviceEndpoint, GatewayConfig};

use crate::error::{Result, StateError};
use crate::model::DeviceType;

/// Lowest instance id the gateway assigns to devices
pub const MIN_INSTANCE_ID: u32 = 65536;

/// Configuration of one gateway device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceConfig {
    /// Gateway instance id (`9003`)
    pub id: u32,

    /// Device kind, by name (`"airPurifier"`) or type code (`"15025"`)
    #[serde(alias = "type")]
    pub device_type: DeviceType,
}

impl DeviceConfig {
    pub fn new(id: u32, device_type: DeviceType) -> Self {
        Self { id, device_type }
    }

    /// Parse and validate a config from JSON
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| StateError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.id < MIN_INSTANCE_ID {
            return Err(StateError::Config(format!(
                "Invalid instance id {}: gateway devices start at {}",
                self.id, MIN_INSTANCE_ID
            )));
        }

        Ok(())
    }

    /// Resource endpoint of this device behind `gateway`
    pub fn endpoint(&self, gateway: &GatewayConfig) -> Result<DeviceEndpoint> {
        Ok(gateway.endpoint(self.id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_with_name_and_code() {
        let by_name = DeviceConfig::from_json(r#"{"id": 65537, "type": "airPurifier"}"#).unwrap();
        let by_code = DeviceConfig::from_json(r#"{"id": 65537, "deviceType": "15025"}"#).unwrap();

        assert_eq!(by_name, DeviceConfig::new(65537, DeviceType::AirPurifier));
        assert_eq!(by_name, by_code);
    }

    #[test]
    fn test_from_json_rejects_unknown_type() {
        let err = DeviceConfig::from_json(r#"{"id": 65537, "type": "remote"}"#).unwrap_err();
        assert!(matches!(err, StateError::Config(ref m) if m.contains("remote")));
    }

    #[test]
    fn test_from_json_rejects_low_instance_id() {
        let err = DeviceConfig::from_json(r#"{"id": 12, "type": "plug"}"#).unwrap_err();
        assert!(matches!(err, StateError::Config(ref m) if m.contains("65536")));
    }

    #[test]
    fn test_from_json_malformed() {
        assert!(matches!(
            DeviceConfig::from_json("{"),
            Err(StateError::Config(_))
        ));
    }

    #[test]
    fn test_endpoint() {
        let gateway = GatewayConfig::new("192.168.1.20");
        let config = DeviceConfig::new(65537, DeviceType::Light);

        let endpoint = config.endpoint(&gateway).unwrap();
        assert_eq!(endpoint.uri(), "coaps://192.168.1.20:5684/15001/65537");
    }

    #[test]
    fn test_endpoint_propagates_transport_error() {
        let config = DeviceConfig::new(65537, DeviceType::Light);
        let err = config.endpoint(&GatewayConfig::new(" ")).unwrap_err();
        assert!(matches!(err, StateError::Transport(_)));
    }
}
