//! Tradfri Device State Synchronization
//!
//! Keeps the channel view of a Tradfri gateway device in sync with the
//! gateway's attribute documents.
//!
//! # Features
//!
//! - **Typed codec**: every channel is a static field descriptor with a value
//!   domain; out-of-domain values are dropped, never guessed
//! - **Device profiles**: air purifier, light, plug and blind
//! - **One worker per device**: commands, read responses and pushed updates
//!   are processed in order on a single thread
//! - **Transport agnostic**: any [`coap_client::CoapTransport`] can be attached
//!
//! # Architecture
//!
//! ```text
//! command ─→ DeviceRequest ─→ serialized document ─→ transport.set
//! refresh ─→ transport.async_get ─→ mailbox ─→ AttributeDocument
//!                                               ─→ DeviceProjection ─→ StateSink
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use coap_client::MemoryTransport;
//! use serde_json::json;
//! use tradfri_state::prelude::*;
//!
//! struct PrintSink;
//!
//! impl StateSink for PrintSink {
//!     fn update_state(&self, channel: &str, state: State) {
//!         println!("{} = {}", channel, state);
//!     }
//!
//!     fn update_status(&self, status: ThingStatus) {
//!         println!("status {:?}", status);
//!     }
//! }
//!
//! let worker = DeviceWorker::spawn(
//!     DeviceConfig::new(65537, DeviceType::AirPurifier),
//!     Arc::new(PrintSink),
//! );
//! worker.attach_transport(Arc::new(MemoryTransport::new(json!({"9019": 1}))));
//! worker.send_command("disableLed", Command::OnOff(OnOff::On)).unwrap();
//! worker.refresh().unwrap();
//! worker.shutdown();
//! ```

// Wire keys and channel ids
pub mod channels;
pub mod keys;

// Core modules
pub mod document;
pub mod field;
pub mod model;
pub mod profiles;
pub mod projection;

// Reconciler and its worker thread
pub mod handler;
pub mod worker;

// Configuration
pub mod config;

// Error types
pub mod error;

// Logging infrastructure
pub mod logging;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::DeviceConfig;
pub use document::AttributeDocument;
pub use field::{Decoded, EncodeError, FieldDescriptor, FieldKind, InvalidValue};
pub use handler::{CommandOutcome, DeviceHandler, StateSink, UpdateOutcome};
pub use model::{Command, DeviceType, OnOff, Quantity, State, ThingStatus, Unit};
pub use profiles::{AirQualityRating, DeviceProfile};
pub use projection::{DeviceInfo, DeviceProjection, DeviceRequest};
pub use worker::{DeviceMessage, DeviceWorker};

// ============================================================================
// Re-exports - Error types
// ============================================================================

pub use error::{Result, StateError};

// ============================================================================
// Re-exports - Logging
// ============================================================================

pub use logging::{init_logging, init_logging_from_env, init_silent, LoggingError, LoggingMode};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::config::DeviceConfig;
    pub use crate::handler::{CommandOutcome, StateSink, UpdateOutcome};
    pub use crate::model::{Command, DeviceType, OnOff, Quantity, State, ThingStatus, Unit};
    pub use crate::projection::{DeviceProjection, DeviceRequest};
    pub use crate::worker::DeviceWorker;
}
