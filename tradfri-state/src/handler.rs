//! Command/update reconciler for a single device
//!
//! `DeviceHandler` turns owner commands into transport writes and reads, and
//! applies inbound documents as channel and status notifications. Every step
//! reports what it did as an outcome value; nothing propagates out as an
//! error.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

use parking_lot::RwLock;
use serde_json::Value;

use coap_client::{CoapResponse, CoapTransport, ResponseSink};

use crate::config::DeviceConfig;
use crate::document::AttributeDocument;
use crate::field::EncodeError;
use crate::model::{Command, State, ThingStatus};
use crate::projection::{DeviceProjection, DeviceRequest};
use crate::worker::DeviceMessage;

/// Receiver of the notifications produced by a device
///
/// Called once per decoded channel per update; never batched.
pub trait StateSink: Send + Sync {
    fn update_state(&self, channel: &str, state: State);

    fn update_status(&self, status: ThingStatus);
}

/// What `handle_command` did with a command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// Device is not active, command dropped
    Inactive,
    /// Read issued; the response arrives through the device mailbox
    RefreshRequested,
    /// Serialized document handed to the transport
    Transmitted { payload: String },
    /// Command failed validation, nothing sent
    Declined(EncodeError),
    /// Channel is not part of the device profile
    UnknownChannel,
    /// No transport attached
    TransportUnavailable,
}

/// What `on_update`/`on_response` did with an inbound exchange
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Inactive,
    /// Document was `null`
    NoData,
    Malformed(String),
    TransportFailed(String),
    Applied { status: ThingStatus, notified: usize },
}

/// State-sync logic of one gateway device
pub struct DeviceHandler {
    config: DeviceConfig,
    active: Arc<AtomicBool>,
    transport: RwLock<Option<Arc<dyn CoapTransport>>>,
    sink: Arc<dyn StateSink>,
    mailbox: mpsc::Sender<DeviceMessage>,
}

impl DeviceHandler {
    /// Create an active handler
    ///
    /// Responses to refresh reads are posted to `mailbox` as
    /// [`DeviceMessage::Response`].
    pub fn new(
        config: DeviceConfig,
        sink: Arc<dyn StateSink>,
        mailbox: mpsc::Sender<DeviceMessage>,
    ) -> Self {
        Self {
            config,
            active: Arc::new(AtomicBool::new(true)),
            transport: RwLock::new(None),
            sink,
            mailbox,
        }
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Shared active flag
    pub fn liveness(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.active)
    }

    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn attach_transport(&self, transport: Arc<dyn CoapTransport>) {
        tracing::debug!("Transport attached to device {}", self.config.id);
        *self.transport.write() = Some(transport);
    }

    pub fn detach_transport(&self) {
        tracing::debug!("Transport detached from device {}", self.config.id);
        *self.transport.write() = None;
    }

    fn transport(&self) -> Option<Arc<dyn CoapTransport>> {
        self.transport.read().clone()
    }

    /// Handle a command for `channel`
    ///
    /// A refresh applies to the whole device and is accepted for any channel
    /// id.
    pub fn handle_command(&self, channel: &str, command: &Command) -> CommandOutcome {
        if !self.is_active() {
            tracing::debug!(
                "Device {} inactive, dropping {} for channel {}",
                self.config.id,
                command,
                channel
            );
            return CommandOutcome::Inactive;
        }

        if let Command::Refresh = command {
            let Some(transport) = self.transport() else {
                tracing::debug!("No transport for device {}, skipping refresh", self.config.id);
                return CommandOutcome::TransportUnavailable;
            };
            tracing::debug!("Refreshing device {}", self.config.id);
            transport.async_get(self.response_sink());
            return CommandOutcome::RefreshRequested;
        }

        let profile = self.config.device_type.profile();
        if !profile.has_channel(channel) {
            tracing::error!(
                "Unknown channel '{}' for {} device {}",
                channel,
                self.config.device_type,
                self.config.id
            );
            return CommandOutcome::UnknownChannel;
        }

        let mut request = DeviceRequest::new(self.config.device_type);
        if let Err(e) = request.set(channel, command) {
            tracing::warn!("Declining command for device {}: {}", self.config.id, e);
            return CommandOutcome::Declined(e);
        }

        let Some(transport) = self.transport() else {
            tracing::debug!(
                "No transport for device {}, dropping {} for channel {}",
                self.config.id,
                command,
                channel
            );
            return CommandOutcome::TransportUnavailable;
        };

        let payload = request.finish();
        tracing::debug!("Sending to device {}: {}", self.config.id, payload);
        transport.set(payload.clone());
        CommandOutcome::Transmitted { payload }
    }

    /// Continuation for a read that funnels the response into the mailbox
    pub fn response_sink(&self) -> ResponseSink {
        let mailbox = self.mailbox.clone();
        let id = self.config.id;
        ResponseSink::new(move |response| {
            if mailbox.send(DeviceMessage::Response(response)).is_err() {
                tracing::debug!("Device {} worker stopped, dropping response", id);
            }
        })
    }

    /// Apply the result of a read exchange
    pub fn on_response(&self, response: CoapResponse) -> UpdateOutcome {
        match response {
            Ok(document) => self.on_update(document),
            Err(e) => {
                if !self.is_active() {
                    return UpdateOutcome::Inactive;
                }
                tracing::warn!("Read of device {} failed: {}", self.config.id, e);
                UpdateOutcome::TransportFailed(e.to_string())
            }
        }
    }

    /// Apply an inbound document, solicited or not
    ///
    /// Reports reachability first, then every decoded channel.
    pub fn on_update(&self, value: Value) -> UpdateOutcome {
        if !self.is_active() {
            tracing::debug!("Device {} inactive, ignoring update", self.config.id);
            return UpdateOutcome::Inactive;
        }

        let document = match AttributeDocument::from_value(self.config.device_type, value) {
            Ok(Some(document)) => document,
            Ok(None) => {
                tracing::debug!("Device {} sent no data", self.config.id);
                return UpdateOutcome::NoData;
            }
            Err(e) => {
                tracing::warn!("Dropping update for device {}: {}", self.config.id, e);
                return UpdateOutcome::Malformed(e.to_string());
            }
        };

        let projection = DeviceProjection::new(&document);
        let status = projection.status();
        self.sink.update_status(status);

        tracing::debug!(
            "Device {} updated: {:?} (firmware {}, model {}, vendor {})",
            self.config.id,
            status,
            projection.firmware_version().unwrap_or("unknown"),
            projection.model_id().unwrap_or("unknown"),
            projection.vendor().unwrap_or("unknown")
        );

        let states = projection.states();
        let notified = states.len();
        for (channel, state) in states {
            self.sink.update_state(channel, state);
        }

        UpdateOutcome::Applied { status, notified }
    }
}

impl fmt::Debug for DeviceHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceHandler")
            .field("config", &self.config)
            .field("active", &self.is_active())
            .field("transport", &self.transport.read().is_some())
            .finish_non_exhaustive()
    }
}
