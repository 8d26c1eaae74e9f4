//! The master configuration record.
//!
//! One fully processed payload produces one of these. External systems read
//! it to decide what to measure, how often, and where the data goes. The
//! record is only ever mutated through setting appliers; on verification
//! failure it is reset to the defaults below.

use core::fmt::Write as _;

use tracing::info;

/// Device EUI of the built-in LoRaWAN chip, used as the default identity.
pub const DEVICE_EUI: [u8; 8] = [0x00, 0x80, 0xE1, 0x01, 0x07, 0x4C, 0x2A, 0x5D];

/// Capacity of the device name buffer.
///
/// Large enough for the hex rendering of [`DEVICE_EUI`] plus a margin for
/// user-chosen names.
pub const MAX_NAME_LEN: usize = 32;

/// Overall health flag the firmware exposes to the outside world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusIndicator {
    /// The active record was processed and verified.
    #[default]
    Operational,
    /// The last payload was rejected; the record holds defaults.
    Failure,
}

/// USB detection behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum UsbDetection {
    /// Never look for a USB host.
    Off = 0,
    /// Continuously look for a USB host.
    On = 1,
    /// Poll for a USB host at a fixed interval.
    Interval = 2,
}

impl UsbDetection {
    /// Decodes a detection mode from its message frame discriminant.
    pub const fn from_i32(value: i32) -> Self {
        match value {
            1 => Self::On,
            2 => Self::Interval,
            _ => Self::Off,
        }
    }

    /// The document form label of this mode.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
            Self::Interval => "interval",
        }
    }
}

/// Which measurements a trigger performs when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorMask {
    /// Temperature, humidity and pressure.
    pub thp: bool,
    /// Accelerometer and gyroscope.
    pub accel_gyro: bool,
    /// Magnetometer.
    pub magnet: bool,
    /// Light intensity.
    pub light: bool,
}

impl SensorMask {
    const ALL: SensorMask = SensorMask {
        thp: true,
        accel_gyro: true,
        magnet: true,
        light: true,
    };
}

/// Where a trigger writes its measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteTo {
    /// Send over LoRaWAN.
    pub lora: bool,
    /// Append to the SD-card log.
    pub sd: bool,
}

impl WriteTo {
    /// Whether at least one destination is configured.
    #[inline]
    pub const fn any(self) -> bool {
        self.lora || self.sd
    }
}

/// The interval-driven trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeTrigger {
    pub enabled: bool,
    pub interval_ms: u32,
    pub sensors: SensorMask,
    pub lora_priority: i8,
    pub write_to: WriteTo,
}

/// The ambient-light threshold trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightTrigger {
    pub enabled: bool,
    /// Lux level below which the trigger fires.
    pub low_threshold: u16,
    /// Lux level above which the trigger fires.
    pub high_threshold: u16,
    pub sensors: SensorMask,
    pub lora_priority: i8,
    pub write_to: WriteTo,
}

/// A motion-driven trigger (acceleration or orientation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionTrigger {
    pub enabled: bool,
    pub sensors: SensorMask,
    pub lora_priority: i8,
    pub write_to: WriteTo,
}

/// All four measurement triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triggers {
    pub time: TimeTrigger,
    pub light: LightTrigger,
    pub acceleration: MotionTrigger,
    pub orientation: MotionTrigger,
}

impl Triggers {
    /// Whether any trigger is enabled at all.
    pub const fn any_enabled(&self) -> bool {
        self.time.enabled
            || self.light.enabled
            || self.acceleration.enabled
            || self.orientation.enabled
    }
}

/// BME280 environmental sensor driver flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bme280 {
    pub measure_temperature: bool,
    pub measure_humidity: bool,
    pub measure_pressure: bool,
    pub low_power: bool,
}

/// BMX160 inertial sensor driver flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bmx160 {
    pub measure_accelerometer: bool,
    pub measure_gyroscope: bool,
    pub measure_magnetometer: bool,
    pub low_power: bool,
}

/// VEML6030 light sensor driver flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Veml6030 {
    pub measure_light: bool,
    pub low_power: bool,
}

/// Sensor driver configuration, fanned out from the time trigger's mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sensors {
    pub bme280: Bme280,
    pub bmx160: Bmx160,
    pub veml6030: Veml6030,
}

/// The master configuration record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Device name; defaults to the hex rendering of [`DEVICE_EUI`].
    pub device_name: heapless::String<MAX_NAME_LEN>,
    /// Health flag, set to failure when a payload is rejected.
    pub status: StatusIndicator,
    pub usb_detection: UsbDetection,
    pub usb_detection_interval_ms: u32,
    pub sensors: Sensors,
    pub trigger: Triggers,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig {
            device_name: default_device_name(),
            status: StatusIndicator::Operational,
            usb_detection: UsbDetection::Interval,
            usb_detection_interval_ms: 10_000,
            sensors: Sensors {
                bme280: Bme280 {
                    measure_temperature: true,
                    measure_humidity: true,
                    measure_pressure: true,
                    low_power: true,
                },
                bmx160: Bmx160 {
                    measure_accelerometer: true,
                    measure_gyroscope: true,
                    measure_magnetometer: true,
                    low_power: true,
                },
                veml6030: Veml6030 {
                    measure_light: true,
                    low_power: true,
                },
            },
            trigger: Triggers {
                time: TimeTrigger {
                    enabled: true,
                    interval_ms: 20_000,
                    sensors: SensorMask::ALL,
                    lora_priority: 4,
                    write_to: WriteTo { lora: true, sd: true },
                },
                light: LightTrigger {
                    enabled: true,
                    low_threshold: 1_000,
                    high_threshold: 20_000,
                    sensors: SensorMask::ALL,
                    lora_priority: 4,
                    write_to: WriteTo { lora: true, sd: true },
                },
                acceleration: MotionTrigger {
                    enabled: true,
                    sensors: SensorMask::ALL,
                    lora_priority: 4,
                    write_to: WriteTo { lora: true, sd: true },
                },
                orientation: MotionTrigger {
                    enabled: true,
                    sensors: SensorMask::ALL,
                    lora_priority: 4,
                    write_to: WriteTo { lora: true, sd: true },
                },
            },
        }
    }
}

impl DeviceConfig {
    /// Resets every field to the defaults, including the status flag.
    pub fn reset(&mut self) {
        *self = DeviceConfig::default();
    }

    /// Replaces the device name with at most [`MAX_NAME_LEN`] bytes of `name`.
    pub fn set_device_name(&mut self, name: &str) {
        self.device_name.clear();
        let take = name
            .char_indices()
            .take_while(|(index, ch)| index + ch.len_utf8() <= MAX_NAME_LEN)
            .last()
            .map_or(0, |(index, ch)| index + ch.len_utf8());
        let _ = self.device_name.push_str(&name[..take]);
    }

    /// Logs a human-readable dump of the active record.
    pub fn log_summary(&self) {
        info!(
            name = %self.device_name,
            usb = self.usb_detection.as_str(),
            usb_interval_ms = self.usb_detection_interval_ms,
            "active config"
        );
        log_time_trigger(&self.trigger.time);
        log_light_trigger(&self.trigger.light);
        log_motion_trigger("acceleration", &self.trigger.acceleration);
        log_motion_trigger("orientation", &self.trigger.orientation);
    }
}

fn default_device_name() -> heapless::String<MAX_NAME_LEN> {
    let mut name = heapless::String::new();
    for byte in DEVICE_EUI {
        let _ = write!(name, "{byte:02X}");
    }
    name
}

fn log_time_trigger(trigger: &TimeTrigger) {
    info!(
        enabled = trigger.enabled,
        interval_ms = trigger.interval_ms,
        thp = trigger.sensors.thp,
        accel_gyro = trigger.sensors.accel_gyro,
        magnet = trigger.sensors.magnet,
        light = trigger.sensors.light,
        lora_priority = trigger.lora_priority,
        lora = trigger.write_to.lora,
        sd = trigger.write_to.sd,
        "time trigger"
    );
}

fn log_light_trigger(trigger: &LightTrigger) {
    info!(
        enabled = trigger.enabled,
        low_threshold = trigger.low_threshold,
        high_threshold = trigger.high_threshold,
        thp = trigger.sensors.thp,
        accel_gyro = trigger.sensors.accel_gyro,
        magnet = trigger.sensors.magnet,
        light = trigger.sensors.light,
        lora_priority = trigger.lora_priority,
        lora = trigger.write_to.lora,
        sd = trigger.write_to.sd,
        "light trigger"
    );
}

fn log_motion_trigger(kind: &'static str, trigger: &MotionTrigger) {
    info!(
        trigger = kind,
        enabled = trigger.enabled,
        thp = trigger.sensors.thp,
        accel_gyro = trigger.sensors.accel_gyro,
        magnet = trigger.sensors.magnet,
        light = trigger.sensors.light,
        lora_priority = trigger.lora_priority,
        lora = trigger.write_to.lora,
        sd = trigger.write_to.sd,
        "motion trigger"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_name_is_device_eui_hex() {
        let config = DeviceConfig::default();
        assert_eq!(config.device_name.as_str(), "0080E101074C2A5D");
    }

    #[test]
    fn test_defaults() {
        let config = DeviceConfig::default();
        assert_eq!(config.status, StatusIndicator::Operational);
        assert_eq!(config.usb_detection, UsbDetection::Interval);
        assert_eq!(config.usb_detection_interval_ms, 10_000);
        assert!(config.trigger.time.enabled);
        assert_eq!(config.trigger.time.interval_ms, 20_000);
        assert_eq!(config.trigger.light.low_threshold, 1_000);
        assert_eq!(config.trigger.light.high_threshold, 20_000);
        assert!(config.trigger.orientation.write_to.sd);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut config = DeviceConfig::default();
        config.trigger.time.enabled = false;
        config.status = StatusIndicator::Failure;
        config.set_device_name("bench-unit");
        config.reset();
        assert_eq!(config, DeviceConfig::default());
    }

    #[test]
    fn test_set_device_name_truncates() {
        let mut config = DeviceConfig::default();
        let long = "x".repeat(MAX_NAME_LEN + 10);
        config.set_device_name(&long);
        assert_eq!(config.device_name.len(), MAX_NAME_LEN);
    }

    #[test]
    fn test_any_enabled() {
        let mut config = DeviceConfig::default();
        assert!(config.trigger.any_enabled());
        config.trigger.time.enabled = false;
        config.trigger.light.enabled = false;
        config.trigger.acceleration.enabled = false;
        config.trigger.orientation.enabled = false;
        assert!(!config.trigger.any_enabled());
    }

    #[test]
    fn test_usb_detection_roundtrip() {
        assert_eq!(UsbDetection::from_i32(UsbDetection::On as i32), UsbDetection::On);
        assert_eq!(UsbDetection::from_i32(2), UsbDetection::Interval);
        assert_eq!(UsbDetection::from_i32(9), UsbDetection::Off);
    }
}
