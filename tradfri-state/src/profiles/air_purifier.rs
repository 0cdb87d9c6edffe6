//! STARKVIND air purifier

use crate::channels;
use crate::field::{DerivedField, FieldDescriptor, FieldKind};
use crate::keys;
use crate::model::{DeviceType, OnOff, State, Unit};

use super::DeviceProfile;

/// Accepted fan mode codes: off, auto, then levels 1 to 5
pub const FAN_MODES: &[i64] = &[0, 1, 10, 20, 30, 40, 50];

/// PM2.5 reading reported while the sensor has no measurement
pub const AIR_QUALITY_UNDEFINED: i64 = 65535;

/// Coarse air quality bucket derived from PM2.5
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirQualityRating {
    Good = 1,
    Ok = 2,
    Bad = 3,
}

impl AirQualityRating {
    pub fn from_pm25(pm25: f64) -> Self {
        if pm25 <= 35.0 {
            AirQualityRating::Good
        } else if pm25 <= 85.0 {
            AirQualityRating::Ok
        } else {
            AirQualityRating::Bad
        }
    }
}

static FIELDS: [FieldDescriptor; 7] = [
    FieldDescriptor::read_write(
        channels::FAN_MODE,
        keys::FAN_MODE,
        FieldKind::Enumerated(FAN_MODES),
    ),
    FieldDescriptor::read_only(channels::FAN_SPEED, keys::FAN_SPEED, FieldKind::Raw),
    FieldDescriptor::read_write(channels::DISABLE_LED, keys::LED_DISABLE, FieldKind::Switch),
    FieldDescriptor::read_write(
        channels::LOCK_BUTTON,
        keys::LOCK_PHYSICAL_BUTTON,
        FieldKind::Switch,
    ),
    FieldDescriptor::read_only(
        channels::AIR_QUALITY_PM25,
        keys::AIR_QUALITY,
        FieldKind::Measurement {
            unit: Unit::MicrogramsPerCubicMetre,
            undefined: Some(AIR_QUALITY_UNDEFINED),
        },
    ),
    FieldDescriptor::read_only(
        channels::FILTER_CHECK_NEXT,
        keys::FILTER_CHECK_NEXT,
        FieldKind::Measurement {
            unit: Unit::Minutes,
            undefined: None,
        },
    ),
    FieldDescriptor::read_only(
        channels::FILTER_UPTIME,
        keys::FILTER_UPTIME,
        FieldKind::Measurement {
            unit: Unit::Minutes,
            undefined: None,
        },
    ),
];

static DERIVED: [DerivedField; 2] = [
    DerivedField {
        channel: channels::AIR_QUALITY_RATING,
        source: channels::AIR_QUALITY_PM25,
        derive: air_quality_rating,
    },
    DerivedField {
        channel: channels::FILTER_CHECK_ALARM,
        source: channels::FILTER_CHECK_NEXT,
        derive: filter_check_alarm,
    },
];

pub(super) static PROFILE: DeviceProfile = DeviceProfile {
    device_type: DeviceType::AirPurifier,
    fields: &FIELDS,
    derived: &DERIVED,
};

fn air_quality_rating(pm25: &State) -> Option<State> {
    match pm25 {
        State::Quantity(quantity) => Some(State::Decimal(
            AirQualityRating::from_pm25(quantity.value) as i64,
        )),
        State::Undefined => Some(State::Undefined),
        _ => None,
    }
}

// Negative minutes until the next check means the check is overdue
fn filter_check_alarm(next_check: &State) -> Option<State> {
    match next_check {
        State::Quantity(quantity) => Some(State::OnOff(OnOff::from(quantity.value < 0.0))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Quantity;

    #[test]
    fn test_rating_buckets() {
        assert_eq!(AirQualityRating::from_pm25(0.0), AirQualityRating::Good);
        assert_eq!(AirQualityRating::from_pm25(35.0), AirQualityRating::Good);
        assert_eq!(AirQualityRating::from_pm25(36.0), AirQualityRating::Ok);
        assert_eq!(AirQualityRating::from_pm25(85.0), AirQualityRating::Ok);
        assert_eq!(AirQualityRating::from_pm25(86.0), AirQualityRating::Bad);
    }

    #[test]
    fn test_rating_derivation() {
        let pm25 = State::Quantity(Quantity::new(50.0, Unit::MicrogramsPerCubicMetre));
        assert_eq!(air_quality_rating(&pm25), Some(State::Decimal(2)));
        assert_eq!(air_quality_rating(&State::Undefined), Some(State::Undefined));
    }

    #[test]
    fn test_filter_alarm_derivation() {
        let overdue = State::Quantity(Quantity::new(-10.0, Unit::Minutes));
        let pending = State::Quantity(Quantity::new(0.0, Unit::Minutes));
        assert_eq!(filter_check_alarm(&overdue), Some(State::OnOff(OnOff::On)));
        assert_eq!(filter_check_alarm(&pending), Some(State::OnOff(OnOff::Off)));
        assert_eq!(filter_check_alarm(&State::Undefined), None);
    }
}
