//! Transport boundary for Tradfri gateway communication
//!
//! The state layer never speaks CoAP itself. It hands serialized documents to
//! a [`CoapTransport`] and asks it to read device resources. Reads complete
//! asynchronously: the result is handed to a [`ResponseSink`], a one-shot
//! continuation that may run on any thread.
//!
//! Retries, timeouts and DTLS session handling belong to the transport
//! implementation, not to this crate's callers.
//!
//! ```rust
//! use coap_client::{CoapTransport, MemoryTransport, ResponseSink};
//! use serde_json::json;
//! use std::sync::mpsc;
//!
//! let transport = MemoryTransport::new(json!({"9019": 1}));
//! let (tx, rx) = mpsc::channel();
//! transport.async_get(ResponseSink::new(move |response| {
//!     let _ = tx.send(response);
//! }));
//!
//! let document = rx.recv().unwrap().unwrap();
//! assert_eq!(document["9019"], 1);
//! ```

mod endpoint;
mod error;
pub mod memory;

use std::fmt;

use serde_json::Value;

pub use endpoint::{DeviceEndpoint, GatewayConfig, DEFAULT_COAPS_PORT, DEVICES_PATH};
pub use error::CoapError;
pub use memory::MemoryTransport;

/// Outcome of a single read exchange
///
/// `Ok(Value::Null)` is a valid response meaning the device had nothing to
/// report.
pub type CoapResponse = Result<Value, CoapError>;

/// One-shot continuation receiving the result of [`CoapTransport::async_get`]
///
/// `deliver` consumes the sink, so every read produces at most one result.
pub struct ResponseSink {
    deliver: Box<dyn FnOnce(CoapResponse) + Send>,
}

impl ResponseSink {
    /// Wrap a closure that will receive the response
    pub fn new<F>(deliver: F) -> Self
    where
        F: FnOnce(CoapResponse) + Send + 'static,
    {
        Self {
            deliver: Box::new(deliver),
        }
    }

    /// Hand the response over to the receiver
    pub fn deliver(self, response: CoapResponse) {
        (self.deliver)(response)
    }
}

impl fmt::Debug for ResponseSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseSink").finish_non_exhaustive()
    }
}

/// Client side of a single device resource on the gateway
pub trait CoapTransport: Send + Sync {
    /// Issue a read of the device resource
    ///
    /// Must return without waiting for the response. The result is handed to
    /// `sink` exactly once, from whatever thread the transport completes on.
    fn async_get(&self, sink: ResponseSink);

    /// Fire a write of a serialized document at the device resource
    ///
    /// No success or failure signal is returned to the caller.
    fn set(&self, payload: String);
}

/// Parse a CoAP payload into a JSON document
///
/// An empty payload is treated as JSON `null`.
pub fn parse_payload(payload: &[u8]) -> Result<Value, CoapError> {
    if payload.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    serde_json::from_slice(payload).map_err(|e| CoapError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::mpsc;

    #[test]
    fn test_parse_payload_object() {
        let value = parse_payload(br#"{"9003":65537,"15025":[{"5900":1}]}"#).unwrap();
        assert_eq!(value["9003"], 65537);
        assert_eq!(value["15025"][0]["5900"], 1);
    }

    #[test]
    fn test_parse_payload_null_and_empty() {
        assert_eq!(parse_payload(b"null").unwrap(), Value::Null);
        assert_eq!(parse_payload(b"").unwrap(), Value::Null);
        assert_eq!(parse_payload(b"  \n").unwrap(), Value::Null);
    }

    #[test]
    fn test_parse_payload_malformed() {
        let result = parse_payload(b"{\"5900\":");
        assert!(matches!(result, Err(CoapError::Parse(_))));
    }

    #[test]
    fn test_response_sink_delivers_once() {
        let (tx, rx) = mpsc::channel();
        let sink = ResponseSink::new(move |response| {
            tx.send(response).unwrap();
        });

        sink.deliver(Ok(json!({"9019": 1})));

        let received = rx.recv().unwrap().unwrap();
        assert_eq!(received["9019"], 1);
        // Sender was dropped together with the consumed sink
        assert!(rx.recv().is_err());
    }

    #[test]
    fn test_response_sink_debug() {
        let sink = ResponseSink::new(|_| {});
        assert!(format!("{:?}", sink).contains("ResponseSink"));
    }

    #[test]
    fn test_error_display() {
        let err = CoapError::Network("handshake timed out".to_string());
        assert_eq!(format!("{}", err), "Network/CoAP error: handshake timed out");

        let err = CoapError::Response(404);
        assert_eq!(format!("{}", err), "CoAP response code 404");
    }
}
