use crate::channels;
use crate::field::{FieldDescriptor, FieldKind};
use crate::keys;
use crate::model::DeviceType;

use super::DeviceProfile;

static FIELDS: [FieldDescriptor; 1] = [FieldDescriptor::read_write(
    channels::POWER,
    keys::ONOFF,
    FieldKind::Switch,
)];

pub(super) static PROFILE: DeviceProfile = DeviceProfile {
    device_type: DeviceType::Plug,
    fields: &FIELDS,
    derived: &[],
};
