//! Gateway connection settings and device resource addressing

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::CoapError;

/// Default port of the gateway's DTLS-secured CoAP endpoint
pub const DEFAULT_COAPS_PORT: u16 = 5684;

/// Resource path under which the gateway exposes its devices
pub const DEVICES_PATH: &str = "15001";

fn default_port() -> u16 {
    DEFAULT_COAPS_PORT
}

/// Connection settings for a Tradfri gateway
///
/// The identity and pre-shared key are handed to the DTLS layer of the
/// transport; they never appear in documents or URIs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Hostname or IPv4 address of the gateway
    pub host: String,

    /// CoAPS port
    /// Default: 5684
    #[serde(default = "default_port")]
    pub port: u16,

    /// DTLS PSK identity
    #[serde(default)]
    pub identity: String,

    /// DTLS pre-shared key
    #[serde(default)]
    pub pre_shared_key: String,
}

impl GatewayConfig {
    /// Create a config for the given host on the default port
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_COAPS_PORT,
            identity: String::new(),
            pre_shared_key: String::new(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_credentials(
        mut self,
        identity: impl Into<String>,
        pre_shared_key: impl Into<String>,
    ) -> Self {
        self.identity = identity.into();
        self.pre_shared_key = pre_shared_key.into();
        self
    }

    /// Build the resource endpoint of one device behind this gateway
    pub fn endpoint(&self, instance_id: u32) -> Result<DeviceEndpoint, CoapError> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(CoapError::InvalidEndpoint("gateway host is empty".to_string()));
        }

        let raw = format!(
            "coaps://{}:{}/{}/{}",
            host, self.port, DEVICES_PATH, instance_id
        );
        let url = Url::parse(&raw)
            .map_err(|e| CoapError::InvalidEndpoint(format!("'{}': {}", raw, e)))?;

        Ok(DeviceEndpoint { url, instance_id })
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("identity", &self.identity)
            .field("pre_shared_key", &"<redacted>")
            .finish()
    }
}

/// CoAP resource of a single device, e.g. `coaps://192.168.1.50:5684/15001/65537`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceEndpoint {
    url: Url,
    instance_id: u32,
}

impl DeviceEndpoint {
    pub fn uri(&self) -> &str {
        self.url.as_str()
    }

    pub fn instance_id(&self) -> u32 {
        self.instance_id
    }
}

impl fmt::Display for DeviceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_uri() {
        let config = GatewayConfig::new("192.168.1.50");
        let endpoint = config.endpoint(65537).unwrap();

        assert_eq!(endpoint.uri(), "coaps://192.168.1.50:5684/15001/65537");
        assert_eq!(endpoint.instance_id(), 65537);
        assert_eq!(format!("{}", endpoint), endpoint.uri());
    }

    #[test]
    fn test_endpoint_custom_port() {
        let config = GatewayConfig::new("gateway.local").with_port(15684);
        let endpoint = config.endpoint(65540).unwrap();
        assert_eq!(endpoint.uri(), "coaps://gateway.local:15684/15001/65540");
    }

    #[test]
    fn test_endpoint_empty_host() {
        let config = GatewayConfig::new("  ");
        assert!(matches!(
            config.endpoint(65537),
            Err(CoapError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_deserialize_defaults() {
        let config: GatewayConfig = serde_json::from_str(r#"{"host": "10.0.0.2"}"#).unwrap();
        assert_eq!(config.port, DEFAULT_COAPS_PORT);
        assert!(config.identity.is_empty());
        assert!(config.pre_shared_key.is_empty());
    }

    #[test]
    fn test_deserialize_credentials() {
        let config: GatewayConfig = serde_json::from_str(
            r#"{"host": "10.0.0.2", "port": 5685, "identity": "tradfri-sdk", "preSharedKey": "s3cret"}"#,
        )
        .unwrap();
        assert_eq!(
            config,
            GatewayConfig::new("10.0.0.2")
                .with_port(5685)
                .with_credentials("tradfri-sdk", "s3cret")
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = GatewayConfig::new("10.0.0.2").with_credentials("id", "s3cret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("<redacted>"));
    }
}
