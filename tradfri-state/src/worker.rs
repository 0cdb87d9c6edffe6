//! Per-device worker thread
//!
//! Each device gets one thread that owns the handler's processing loop.
//! Owner commands, read responses and pushed updates all arrive through the
//! same mailbox, so steps for one device never overlap and updates are applied
//! in the order they were delivered.

use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};

use serde_json::Value;

use coap_client::{CoapResponse, CoapTransport, ResponseSink};

use crate::config::DeviceConfig;
use crate::error::{Result, StateError};
use crate::handler::{DeviceHandler, StateSink};
use crate::model::Command;

/// Messages processed by a device worker
#[derive(Debug)]
pub enum DeviceMessage {
    /// Command from the owner for one channel
    Command { channel: String, command: Command },
    /// Result of a read issued by a refresh
    Response(CoapResponse),
    /// Document pushed by the gateway without a request
    Update(Value),
    /// Stop the worker
    Shutdown,
}

/// Spawns the device worker thread
///
/// Runs until a `Shutdown` message arrives. The handler keeps a sender to
/// its own mailbox, so the channel never disconnects while the loop runs;
/// `DeviceWorker` sends `Shutdown` from `shutdown` and `Drop`.
pub(crate) fn spawn_device_worker(
    handler: Arc<DeviceHandler>,
    mailbox: mpsc::Receiver<DeviceMessage>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let id = handler.config().id;
        tracing::debug!("Device worker {} started", id);

        for message in mailbox.iter() {
            match message {
                DeviceMessage::Command { channel, command } => {
                    let outcome = handler.handle_command(&channel, &command);
                    tracing::trace!("Device {} command on {}: {:?}", id, channel, outcome);
                }
                DeviceMessage::Response(response) => {
                    let outcome = handler.on_response(response);
                    tracing::trace!("Device {} response: {:?}", id, outcome);
                }
                DeviceMessage::Update(document) => {
                    let outcome = handler.on_update(document);
                    tracing::trace!("Device {} update: {:?}", id, outcome);
                }
                DeviceMessage::Shutdown => {
                    tracing::debug!("Device worker {} received shutdown", id);
                    break;
                }
            }
        }

        tracing::debug!("Device worker {} stopped", id);
    })
}

/// Handle to a running device worker
///
/// Dropping the handle stops the worker and waits for it to finish.
pub struct DeviceWorker {
    handler: Arc<DeviceHandler>,
    mailbox: mpsc::Sender<DeviceMessage>,
    thread: Option<JoinHandle<()>>,
}

impl DeviceWorker {
    /// Start a worker for the device described by `config`
    ///
    /// The device starts active and without a transport.
    pub fn spawn(config: DeviceConfig, sink: Arc<dyn StateSink>) -> Self {
        let (tx, rx) = mpsc::channel();
        let handler = Arc::new(DeviceHandler::new(config, sink, tx.clone()));
        let thread = spawn_device_worker(Arc::clone(&handler), rx);

        Self {
            handler,
            mailbox: tx,
            thread: Some(thread),
        }
    }

    pub fn config(&self) -> &DeviceConfig {
        self.handler.config()
    }

    pub fn attach_transport(&self, transport: Arc<dyn CoapTransport>) {
        self.handler.attach_transport(transport);
    }

    pub fn detach_transport(&self) {
        self.handler.detach_transport();
    }

    /// Queue a command for `channel`
    pub fn send_command(&self, channel: impl Into<String>, command: Command) -> Result<()> {
        self.post(DeviceMessage::Command {
            channel: channel.into(),
            command,
        })
    }

    /// Queue a refresh of the whole device
    pub fn refresh(&self) -> Result<()> {
        self.send_command(String::new(), Command::Refresh)
    }

    /// Continuation a transport can complete with an unsolicited read result
    pub fn update_sink(&self) -> ResponseSink {
        self.handler.response_sink()
    }

    /// Queue a document pushed by the gateway
    pub fn deliver_update(&self, document: Value) -> Result<()> {
        self.post(DeviceMessage::Update(document))
    }

    pub fn set_active(&self, active: bool) {
        self.handler.set_active(active);
    }

    pub fn is_active(&self) -> bool {
        self.handler.is_active()
    }

    /// Stop the worker after the messages already queued
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn post(&self, message: DeviceMessage) -> Result<()> {
        self.mailbox
            .send(message)
            .map_err(|_| StateError::ChannelClosed)
    }

    fn stop(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };

        let _ = self.mailbox.send(DeviceMessage::Shutdown);
        if thread.join().is_err() {
            tracing::error!("Device worker {} panicked", self.handler.config().id);
        }
    }
}

impl Drop for DeviceWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeviceType, OnOff, State, ThingStatus};
    use coap_client::MemoryTransport;
    use serde_json::json;
    use std::time::Duration;

    enum Notification {
        State(String, State),
        Status(ThingStatus),
    }

    struct ChannelSink(parking_lot::Mutex<mpsc::Sender<Notification>>);

    impl StateSink for ChannelSink {
        fn update_state(&self, channel: &str, state: State) {
            let _ = self
                .0
                .lock()
                .send(Notification::State(channel.to_string(), state));
        }

        fn update_status(&self, status: ThingStatus) {
            let _ = self.0.lock().send(Notification::Status(status));
        }
    }

    fn worker(device_type: DeviceType) -> (DeviceWorker, mpsc::Receiver<Notification>) {
        let (tx, rx) = mpsc::channel();
        let sink = Arc::new(ChannelSink(parking_lot::Mutex::new(tx)));
        (
            DeviceWorker::spawn(DeviceConfig::new(65537, device_type), sink),
            rx,
        )
    }

    #[test]
    fn test_refresh_applies_response() {
        let (worker, rx) = worker(DeviceType::Plug);
        worker.attach_transport(Arc::new(MemoryTransport::new(
            json!({"9019": 1, "3312": [{"5850": 1}]}),
        )));

        worker.refresh().unwrap();

        let timeout = Duration::from_secs(2);
        assert!(matches!(
            rx.recv_timeout(timeout).unwrap(),
            Notification::Status(ThingStatus::Online)
        ));
        match rx.recv_timeout(timeout).unwrap() {
            Notification::State(channel, state) => {
                assert_eq!(channel, "power");
                assert_eq!(state, State::OnOff(OnOff::On));
            }
            Notification::Status(_) => panic!("expected a channel state"),
        }
    }

    #[test]
    fn test_pushed_update() {
        let (worker, rx) = worker(DeviceType::Plug);
        worker.deliver_update(json!({"9019": 0})).unwrap();

        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(2)).unwrap(),
            Notification::Status(ThingStatus::Offline)
        ));
    }

    #[test]
    fn test_update_sink_posts_to_mailbox() {
        let (worker, rx) = worker(DeviceType::Plug);
        worker.update_sink().deliver(Ok(json!({"9019": 1})));

        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(2)).unwrap(),
            Notification::Status(ThingStatus::Online)
        ));
    }

    #[test]
    fn test_shutdown_processes_queued_commands() {
        let (worker, _rx) = worker(DeviceType::Plug);
        let transport = MemoryTransport::new(json!({}));
        worker.attach_transport(Arc::new(transport.clone()));

        worker
            .send_command("power", Command::OnOff(OnOff::On))
            .unwrap();
        worker.shutdown();

        assert_eq!(transport.writes(), vec![r#"{"3312":[{"5850":1}]}"#.to_string()]);
    }

    #[test]
    fn test_inactive_worker() {
        let (worker, _rx) = worker(DeviceType::Plug);
        worker.set_active(false);
        assert!(!worker.is_active());
        assert_eq!(worker.config().device_type, DeviceType::Plug);
    }
}
