//! Model types for tradfri-state

mod device_type;
mod state;

pub use device_type::DeviceType;
pub use state::{Command, OnOff, Quantity, State, ThingStatus, Unit};
