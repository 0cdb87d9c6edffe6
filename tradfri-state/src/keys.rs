//! Attribute codes of the gateway protocol
//!
//! Every field in a gateway document is keyed by a short numeric code.

// Envelope
pub const NAME: &str = "9001";
pub const INSTANCE_ID: &str = "9003";
pub const REACHABILITY_STATE: &str = "9019";
pub const DEVICE: &str = "3";

// General device info, nested under DEVICE
pub const DEVICE_VENDOR: &str = "0";
pub const DEVICE_MODEL: &str = "1";
pub const DEVICE_FIRMWARE: &str = "3";
pub const DEVICE_BATTERY_LEVEL: &str = "9";

// Device type codes, keying the attribute array
pub const TYPE_LIGHT: &str = "3311";
pub const TYPE_PLUG: &str = "3312";
pub const TYPE_BLIND: &str = "15015";
pub const TYPE_AIR_PURIFIER: &str = "15025";

// Lights and plugs
pub const ONOFF: &str = "5850";
pub const DIMMER: &str = "5851";

// Blinds
pub const POSITION: &str = "5536";

// Air purifiers
pub const FAN_MODE: &str = "5900";
pub const AIR_QUALITY: &str = "5907";
pub const FAN_SPEED: &str = "5908";
pub const LED_DISABLE: &str = "5905";
pub const LOCK_PHYSICAL_BUTTON: &str = "5906";
pub const FILTER_UPTIME: &str = "5909";
pub const FILTER_CHECK_NEXT: &str = "5910";
