//! Error types for the CoAP transport boundary

use thiserror::Error;

/// Errors that can occur while exchanging messages with the gateway
#[derive(Debug, Error)]
pub enum CoapError {
    /// Network or DTLS communication error
    #[error("Network/CoAP error: {0}")]
    Network(String),

    /// Payload was not a JSON document
    #[error("Payload parsing error: {0}")]
    Parse(String),

    /// Gateway answered with a non-success response code (e.g. 404 for 4.04)
    #[error("CoAP response code {0}")]
    Response(u16),

    /// Gateway address or resource path could not be turned into a URI
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}
