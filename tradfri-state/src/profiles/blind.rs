//! Roller blind

use crate::channels;
use crate::field::{FieldDescriptor, FieldKind};
use crate::keys;
use crate::model::DeviceType;

use super::DeviceProfile;

static FIELDS: [FieldDescriptor; 2] = [
    FieldDescriptor::read_write(channels::POSITION, keys::POSITION, FieldKind::Percent),
    // Battery level is reported in the general device info, not the blind's attributes
    FieldDescriptor::general_info(
        channels::BATTERY_LEVEL,
        keys::DEVICE_BATTERY_LEVEL,
        FieldKind::Percent,
    ),
];

pub(super) static PROFILE: DeviceProfile = DeviceProfile {
    device_type: DeviceType::Blind,
    fields: &FIELDS,
    derived: &[],
};
