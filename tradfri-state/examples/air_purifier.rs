//! Air Purifier Example
//!
//! Runs a device worker for an air purifier against the in-memory transport,
//! sends a few commands, refreshes, and prints every notification.
//!
//! Run with: `cargo run -p tradfri-sdk-state --example air_purifier`
//! Set `TRADFRI_LOG_MODE=development` to see the worker's logging.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use coap_client::{GatewayConfig, MemoryTransport};
use serde_json::json;
use tradfri_state::logging;
use tradfri_state::prelude::*;

struct PrintSink;

impl StateSink for PrintSink {
    fn update_state(&self, channel: &str, state: State) {
        println!("  {:<18} {}", channel, state);
    }

    fn update_status(&self, status: ThingStatus) {
        println!("  status             {:?}", status);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging_from_env()?;

    println!("Tradfri Air Purifier Example");
    println!("============================\n");

    let config = DeviceConfig::from_json(r#"{"id": 65537, "type": "airPurifier"}"#)?;
    let gateway = GatewayConfig::new("192.168.1.20").with_credentials("tradfri-sdk", "secret");
    println!("Device resource: {}\n", config.endpoint(&gateway)?);

    let transport = MemoryTransport::new(json!({
        "9001": "Living room purifier",
        "9003": 65537,
        "9019": 1,
        "3": {"0": "IKEA of Sweden", "1": "STARKVIND Air purifier", "3": "1.0.033"},
        "15025": [{
            "5900": 1,
            "5908": 10,
            "5905": 0,
            "5906": 0,
            "5907": 12,
            "5910": 259200,
            "5909": 1200
        }]
    }));

    let worker = DeviceWorker::spawn(config, Arc::new(PrintSink));
    worker.attach_transport(Arc::new(transport.clone()));

    println!("Initial state:");
    worker.refresh()?;
    thread::sleep(Duration::from_millis(200));

    println!("\nSwitching to fan level 3 and turning the LED off");
    worker.send_command("fanMode", Command::Decimal(30.0))?;
    worker.send_command("disableLed", Command::OnOff(OnOff::On))?;
    // Declined: not an allowed fan mode
    worker.send_command("fanMode", Command::Decimal(35.0))?;

    println!("\nState after commands:");
    worker.refresh()?;
    thread::sleep(Duration::from_millis(200));

    println!("\nPayloads sent to the device:");
    for payload in transport.writes() {
        println!("  {}", payload);
    }

    worker.shutdown();
    Ok(())
}
