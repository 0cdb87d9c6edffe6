//! Dimmable light

use crate::channels;
use crate::field::{FieldDescriptor, FieldKind};
use crate::keys;
use crate::model::DeviceType;

use super::DeviceProfile;

/// Top of the gateway's dimmer scale
pub const DIMMER_MAX: i64 = 254;

static FIELDS: [FieldDescriptor; 2] = [
    FieldDescriptor::read_write(channels::POWER, keys::ONOFF, FieldKind::Switch),
    FieldDescriptor::read_write(
        channels::BRIGHTNESS,
        keys::DIMMER,
        FieldKind::Scaled {
            device_max: DIMMER_MAX,
        },
    ),
];

pub(super) static PROFILE: DeviceProfile = DeviceProfile {
    device_type: DeviceType::Light,
    fields: &FIELDS,
    derived: &[],
};
