//! The default setting schema.
//!
//! This table is the single source of truth binding document tag paths and
//! message frame bit spans to the fields of the master record. Identifiers
//! are dense and appear in error code payloads, so their numbering is part
//! of the log format. Declaration order matters: each trigger's `enabled`
//! entry precedes the sensor entries whose appliers read it.

use aether_protocol::BitSpan;

use crate::record::UsbDetection;
use crate::setting::Setting;
use crate::tagpath::TagPath;
use crate::validate::Validator;

/// Upper bound on settings a parser can track; sizes the matching state and
/// the validation error rings.
pub const MAX_SCHEMA_SETTINGS: usize = 48;

/// Dense setting identifiers, used as error code payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SettingId {
    Unspecified = 0,
    DeviceName = 1,
    UsbDetection = 2,
    UsbIntervalMs = 3,
    TimeTriggerEnabled = 4,
    TimeTriggerInterval = 5,
    TimeTriggerThp = 6,
    TimeTriggerAccGyro = 7,
    TimeTriggerMagnetometer = 8,
    TimeTriggerLightIntensity = 9,
    TimeTriggerLoraPriority = 10,
    TimeTriggerWriteToLora = 11,
    TimeTriggerWriteToSd = 12,
    LightTriggerEnabled = 13,
    LightTriggerLowThreshold = 14,
    LightTriggerHighThreshold = 15,
    LightTriggerThp = 16,
    LightTriggerAccGyro = 17,
    LightTriggerMagnetometer = 18,
    LightTriggerLightIntensity = 19,
    LightTriggerLoraPriority = 20,
    LightTriggerWriteToLora = 21,
    LightTriggerWriteToSd = 22,
    AccelerationTriggerEnabled = 23,
    AccelerationTriggerThp = 24,
    AccelerationTriggerAccGyro = 25,
    AccelerationTriggerMagnetometer = 26,
    AccelerationTriggerLightIntensity = 27,
    AccelerationTriggerLoraPriority = 28,
    AccelerationTriggerWriteToLora = 29,
    AccelerationTriggerWriteToSd = 30,
    OrientationTriggerEnabled = 31,
    OrientationTriggerThp = 32,
    OrientationTriggerAccGyro = 33,
    OrientationTriggerMagnetometer = 34,
    OrientationTriggerLightIntensity = 35,
    OrientationTriggerLoraPriority = 36,
    OrientationTriggerWriteToLora = 37,
    OrientationTriggerWriteToSd = 38,
}

/// Builds the default schema.
///
/// Every entry is optional: partial payloads are welcome and only touch the
/// record fields they name. Validation ranges follow the record field types;
/// the LoRa priority is additionally clamped to the four downlink classes.
pub fn default_settings() -> Vec<Setting> {
    const AETHER: TagPath = TagPath::root("aether");
    const PROPERTIES: TagPath = AETHER.join("properties");
    const USB: TagPath = AETHER.join("usb");
    const TRIGGER: TagPath = AETHER.join("trigger");

    const TIME: TagPath = TRIGGER.join("time");
    const TIME_SENSORS: TagPath = TIME.join("activate-sensors");
    const TIME_WRITE: TagPath = TIME.join("write-to");
    const LIGHT: TagPath = TRIGGER.join("light");
    const LIGHT_SENSORS: TagPath = LIGHT.join("activate-sensors");
    const LIGHT_WRITE: TagPath = LIGHT.join("write-to");
    const ACCELERATION: TagPath = TRIGGER.join("acceleration");
    const ACCEL_SENSORS: TagPath = ACCELERATION.join("activate-sensors");
    const ACCEL_WRITE: TagPath = ACCELERATION.join("write-to");
    const ORIENTATION: TagPath = TRIGGER.join("orientation");
    const ORIEN_SENSORS: TagPath = ORIENTATION.join("activate-sensors");
    const ORIEN_WRITE: TagPath = ORIENTATION.join("write-to");

    const FULL_U32: Validator = Validator::RangeU32 { min: 0, max: u32::MAX };
    const FULL_U16: Validator = Validator::RangeU16 { min: 0, max: u16::MAX };
    const PRIORITY: Validator = Validator::RangeI8 { min: 0, max: 3 };

    vec![
        Setting::new(
            SettingId::DeviceName,
            PROPERTIES.join("name"),
            BitSpan::NONE,
            Validator::Name,
            |value, config| {
                if let Some(name) = value.as_text() {
                    config.set_device_name(name);
                }
            },
        ),
        Setting::new(
            SettingId::UsbDetection,
            USB.join("detection"),
            BitSpan::new(24, 2),
            Validator::UsbMode,
            |value, config| {
                if let Some(mode) = value.as_i32() {
                    config.usb_detection = UsbDetection::from_i32(mode);
                }
            },
        ),
        Setting::new(
            SettingId::UsbIntervalMs,
            USB.join("detection-interval-ms"),
            BitSpan::new(32, 32),
            FULL_U32,
            |value, config| {
                if let Some(interval) = value.as_u32() {
                    config.usb_detection_interval_ms = interval;
                }
            },
        ),
        Setting::new(
            SettingId::TimeTriggerEnabled,
            TIME.join("enabled"),
            BitSpan::flag(26),
            Validator::Flag,
            |value, config| {
                if let Some(flag) = value.as_flag() {
                    config.trigger.time.enabled = flag;
                }
            },
        ),
        Setting::new(
            SettingId::TimeTriggerInterval,
            TIME.join("interval-ms"),
            BitSpan::new(64, 32),
            FULL_U32,
            |value, config| {
                if let Some(interval) = value.as_u32() {
                    config.trigger.time.interval_ms = interval;
                }
            },
        ),
        Setting::new(
            SettingId::TimeTriggerThp,
            TIME_SENSORS.join("thp"),
            BitSpan::flag(8),
            Validator::Flag,
            |value, config| {
                let flag = value.as_flag().unwrap_or(false) && config.trigger.time.enabled;
                config.sensors.bme280.measure_temperature = flag;
                config.sensors.bme280.measure_humidity = flag;
                config.sensors.bme280.measure_pressure = flag;
                config.trigger.time.sensors.thp = flag;
            },
        ),
        Setting::new(
            SettingId::TimeTriggerAccGyro,
            TIME_SENSORS.join("accel-gyro"),
            BitSpan::flag(9),
            Validator::Flag,
            |value, config| {
                let flag = value.as_flag().unwrap_or(false) && config.trigger.time.enabled;
                config.sensors.bmx160.measure_accelerometer = flag;
                config.sensors.bmx160.measure_gyroscope = flag;
                config.trigger.time.sensors.accel_gyro = flag;
            },
        ),
        Setting::new(
            SettingId::TimeTriggerMagnetometer,
            TIME_SENSORS.join("magnet"),
            BitSpan::flag(10),
            Validator::Flag,
            |value, config| {
                let flag = value.as_flag().unwrap_or(false) && config.trigger.time.enabled;
                config.sensors.bmx160.measure_magnetometer = flag;
                config.trigger.time.sensors.magnet = flag;
            },
        ),
        Setting::new(
            SettingId::TimeTriggerLightIntensity,
            TIME_SENSORS.join("light"),
            BitSpan::flag(11),
            Validator::Flag,
            |value, config| {
                let flag = value.as_flag().unwrap_or(false) && config.trigger.time.enabled;
                config.sensors.veml6030.measure_light = flag;
                config.trigger.time.sensors.light = flag;
            },
        ),
        Setting::new(
            SettingId::TimeTriggerLoraPriority,
            TIME_WRITE.join("lorawan-priority"),
            BitSpan::new(128, 2),
            PRIORITY,
            |value, config| {
                if let Some(priority) = value.as_i8() {
                    config.trigger.time.lora_priority = priority;
                }
            },
        ),
        Setting::new(
            SettingId::TimeTriggerWriteToLora,
            TIME_WRITE.join("lora"),
            BitSpan::flag(130),
            Validator::Flag,
            |value, config| {
                if let Some(flag) = value.as_flag() {
                    config.trigger.time.write_to.lora = flag;
                }
            },
        ),
        Setting::new(
            SettingId::TimeTriggerWriteToSd,
            TIME_WRITE.join("sd"),
            BitSpan::flag(131),
            Validator::Flag,
            |value, config| {
                if let Some(flag) = value.as_flag() {
                    config.trigger.time.write_to.sd = flag;
                }
            },
        ),
        Setting::new(
            SettingId::LightTriggerEnabled,
            LIGHT.join("enabled"),
            BitSpan::flag(27),
            Validator::Flag,
            |value, config| {
                if let Some(flag) = value.as_flag() {
                    config.trigger.light.enabled = flag;
                }
            },
        ),
        Setting::new(
            SettingId::LightTriggerLowThreshold,
            LIGHT.join("low-threshold"),
            BitSpan::new(112, 16),
            FULL_U16,
            |value, config| {
                if let Some(threshold) = value.as_u16() {
                    config.trigger.light.low_threshold = threshold;
                }
            },
        ),
        Setting::new(
            SettingId::LightTriggerHighThreshold,
            LIGHT.join("high-threshold"),
            BitSpan::new(96, 16),
            FULL_U16,
            |value, config| {
                if let Some(threshold) = value.as_u16() {
                    config.trigger.light.high_threshold = threshold;
                }
            },
        ),
        Setting::new(
            SettingId::LightTriggerThp,
            LIGHT_SENSORS.join("thp"),
            BitSpan::flag(12),
            Validator::Flag,
            |value, config| {
                config.trigger.light.sensors.thp =
                    value.as_flag().unwrap_or(false) && config.trigger.light.enabled;
            },
        ),
        Setting::new(
            SettingId::LightTriggerAccGyro,
            LIGHT_SENSORS.join("accel-gyro"),
            BitSpan::flag(13),
            Validator::Flag,
            |value, config| {
                config.trigger.light.sensors.accel_gyro =
                    value.as_flag().unwrap_or(false) && config.trigger.light.enabled;
            },
        ),
        Setting::new(
            SettingId::LightTriggerMagnetometer,
            LIGHT_SENSORS.join("magnet"),
            BitSpan::flag(14),
            Validator::Flag,
            |value, config| {
                config.trigger.light.sensors.magnet =
                    value.as_flag().unwrap_or(false) && config.trigger.light.enabled;
            },
        ),
        Setting::new(
            SettingId::LightTriggerLightIntensity,
            LIGHT_SENSORS.join("light"),
            BitSpan::flag(15),
            Validator::Flag,
            |value, config| {
                config.trigger.light.sensors.light =
                    value.as_flag().unwrap_or(false) && config.trigger.light.enabled;
            },
        ),
        Setting::new(
            SettingId::LightTriggerLoraPriority,
            LIGHT_WRITE.join("lorawan-priority"),
            BitSpan::new(132, 2),
            PRIORITY,
            |value, config| {
                if let Some(priority) = value.as_i8() {
                    config.trigger.light.lora_priority = priority;
                }
            },
        ),
        Setting::new(
            SettingId::LightTriggerWriteToLora,
            LIGHT_WRITE.join("lora"),
            BitSpan::flag(134),
            Validator::Flag,
            |value, config| {
                if let Some(flag) = value.as_flag() {
                    config.trigger.light.write_to.lora = flag;
                }
            },
        ),
        Setting::new(
            SettingId::LightTriggerWriteToSd,
            LIGHT_WRITE.join("sd"),
            BitSpan::flag(135),
            Validator::Flag,
            |value, config| {
                if let Some(flag) = value.as_flag() {
                    config.trigger.light.write_to.sd = flag;
                }
            },
        ),
        Setting::new(
            SettingId::AccelerationTriggerEnabled,
            ACCELERATION.join("enabled"),
            BitSpan::flag(28),
            Validator::Flag,
            |value, config| {
                if let Some(flag) = value.as_flag() {
                    config.trigger.acceleration.enabled = flag;
                }
            },
        ),
        Setting::new(
            SettingId::AccelerationTriggerThp,
            ACCEL_SENSORS.join("thp"),
            BitSpan::flag(16),
            Validator::Flag,
            |value, config| {
                config.trigger.acceleration.sensors.thp =
                    value.as_flag().unwrap_or(false) && config.trigger.acceleration.enabled;
            },
        ),
        Setting::new(
            SettingId::AccelerationTriggerAccGyro,
            ACCEL_SENSORS.join("accel-gyro"),
            BitSpan::flag(17),
            Validator::Flag,
            |value, config| {
                config.trigger.acceleration.sensors.accel_gyro =
                    value.as_flag().unwrap_or(false) && config.trigger.acceleration.enabled;
            },
        ),
        Setting::new(
            SettingId::AccelerationTriggerMagnetometer,
            ACCEL_SENSORS.join("magnet"),
            BitSpan::flag(18),
            Validator::Flag,
            |value, config| {
                config.trigger.acceleration.sensors.magnet =
                    value.as_flag().unwrap_or(false) && config.trigger.acceleration.enabled;
            },
        ),
        Setting::new(
            SettingId::AccelerationTriggerLightIntensity,
            ACCEL_SENSORS.join("light"),
            BitSpan::flag(19),
            Validator::Flag,
            |value, config| {
                config.trigger.acceleration.sensors.light =
                    value.as_flag().unwrap_or(false) && config.trigger.acceleration.enabled;
            },
        ),
        Setting::new(
            SettingId::AccelerationTriggerLoraPriority,
            ACCEL_WRITE.join("lorawan-priority"),
            BitSpan::new(136, 2),
            PRIORITY,
            |value, config| {
                if let Some(priority) = value.as_i8() {
                    config.trigger.acceleration.lora_priority = priority;
                }
            },
        ),
        Setting::new(
            SettingId::AccelerationTriggerWriteToLora,
            ACCEL_WRITE.join("lora"),
            BitSpan::flag(138),
            Validator::Flag,
            |value, config| {
                if let Some(flag) = value.as_flag() {
                    config.trigger.acceleration.write_to.lora = flag;
                }
            },
        ),
        Setting::new(
            SettingId::AccelerationTriggerWriteToSd,
            ACCEL_WRITE.join("sd"),
            BitSpan::flag(139),
            Validator::Flag,
            |value, config| {
                if let Some(flag) = value.as_flag() {
                    config.trigger.acceleration.write_to.sd = flag;
                }
            },
        ),
        Setting::new(
            SettingId::OrientationTriggerEnabled,
            ORIENTATION.join("enabled"),
            BitSpan::flag(29),
            Validator::Flag,
            |value, config| {
                if let Some(flag) = value.as_flag() {
                    config.trigger.orientation.enabled = flag;
                }
            },
        ),
        Setting::new(
            SettingId::OrientationTriggerThp,
            ORIEN_SENSORS.join("thp"),
            BitSpan::flag(20),
            Validator::Flag,
            |value, config| {
                config.trigger.orientation.sensors.thp =
                    value.as_flag().unwrap_or(false) && config.trigger.orientation.enabled;
            },
        ),
        Setting::new(
            SettingId::OrientationTriggerAccGyro,
            ORIEN_SENSORS.join("accel-gyro"),
            BitSpan::flag(21),
            Validator::Flag,
            |value, config| {
                config.trigger.orientation.sensors.accel_gyro =
                    value.as_flag().unwrap_or(false) && config.trigger.orientation.enabled;
            },
        ),
        Setting::new(
            SettingId::OrientationTriggerMagnetometer,
            ORIEN_SENSORS.join("magnet"),
            BitSpan::flag(22),
            Validator::Flag,
            |value, config| {
                config.trigger.orientation.sensors.magnet =
                    value.as_flag().unwrap_or(false) && config.trigger.orientation.enabled;
            },
        ),
        Setting::new(
            SettingId::OrientationTriggerLightIntensity,
            ORIEN_SENSORS.join("light"),
            BitSpan::flag(23),
            Validator::Flag,
            |value, config| {
                config.trigger.orientation.sensors.light =
                    value.as_flag().unwrap_or(false) && config.trigger.orientation.enabled;
            },
        ),
        Setting::new(
            SettingId::OrientationTriggerLoraPriority,
            ORIEN_WRITE.join("lorawan-priority"),
            BitSpan::new(140, 2),
            PRIORITY,
            |value, config| {
                if let Some(priority) = value.as_i8() {
                    config.trigger.orientation.lora_priority = priority;
                }
            },
        ),
        Setting::new(
            SettingId::OrientationTriggerWriteToLora,
            ORIEN_WRITE.join("lora"),
            BitSpan::flag(142),
            Validator::Flag,
            |value, config| {
                if let Some(flag) = value.as_flag() {
                    config.trigger.orientation.write_to.lora = flag;
                }
            },
        ),
        Setting::new(
            SettingId::OrientationTriggerWriteToSd,
            ORIEN_WRITE.join("sd"),
            BitSpan::flag(143),
            Validator::Flag,
            |value, config| {
                if let Some(flag) = value.as_flag() {
                    config.trigger.orientation.write_to.sd = flag;
                }
            },
        ),
    ]
}
