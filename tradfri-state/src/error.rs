//! Error types for tradfri-state

use thiserror::Error;

use crate::model::DeviceType;

/// Result type for tradfri-state operations
pub type Result<T> = std::result::Result<T, StateError>;

/// Errors that can occur while synchronizing device state
#[derive(Debug, Error)]
pub enum StateError {
    /// Inbound document is not valid JSON or does not have the gateway's shape
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// Device type name or code is not one of the supported kinds
    #[error("Unknown device type: {0}")]
    UnknownDeviceType(String),

    /// Channel id is not part of the device type's profile
    #[error("Unknown channel '{channel}' for device type {device_type}")]
    UnknownChannel {
        channel: String,
        device_type: DeviceType,
    },

    /// Configuration could not be parsed or failed validation
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Error from the transport collaborator
    #[error("Transport error: {0}")]
    Transport(#[from] coap_client::CoapError),

    /// Device worker has shut down
    #[error("Device worker channel has been closed")]
    ChannelClosed,
}
