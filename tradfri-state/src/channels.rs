//! Channel identifiers exposed to the owner of a device

pub const POWER: &str = "power";
pub const BRIGHTNESS: &str = "brightness";
pub const POSITION: &str = "position";
pub const BATTERY_LEVEL: &str = "batteryLevel";

pub const FAN_MODE: &str = "fanMode";
pub const FAN_SPEED: &str = "fanSpeed";
pub const DISABLE_LED: &str = "disableLed";
pub const LOCK_BUTTON: &str = "lockButton";
pub const AIR_QUALITY_PM25: &str = "airQualityPm25";
pub const AIR_QUALITY_RATING: &str = "airQualityRating";
pub const FILTER_CHECK_NEXT: &str = "filterCheckNext";
pub const FILTER_CHECK_ALARM: &str = "filterCheckAlarm";
pub const FILTER_UPTIME: &str = "filterUptime";
