//! AEther Configuration
//!
//! Schema-driven processing of device configuration payloads. A payload
//! arrives in one of two wire forms - a textual tag-tree document (usually
//! loaded from the SD card at boot) or a bit-packed message frame (received
//! over LoRaWAN) - and resolves into one validated [`DeviceConfig`] record
//! that governs triggers, sensors, data sinks, USB detection and the device
//! identity.
//!
//! # Processing pipeline
//!
//! ```text
//! payload -> parser -> per-setting value buffer -> validator -> applier
//!                                                                  |
//!                                       verification rules <- DeviceConfig
//! ```
//!
//! Every problem is recorded as a packed [`aether_protocol::ErrorCode`] in a
//! bounded buffer and reported through a [`ReportSink`]; nothing unwinds.
//! Parsing errors do not stop validation and a single invalid setting does
//! not stop the rest, so one rejected payload reports everything wrong with
//! it at once.
//!
//! # Example
//!
//! ```
//! use aether_config::ConfigProcessor;
//!
//! let mut processor = ConfigProcessor::new();
//! let outcome = processor.process_document(
//!     "<aether><usb><detection>interval</detection></usb></aether>",
//! );
//! assert!(outcome.is_accepted());
//! ```

mod errors;
mod frame;
mod handler;
mod loader;
mod processor;
mod record;
mod report;
mod schema;
mod setting;
mod tagpath;
mod tagtree;
mod validate;
mod value;
mod verify;

pub use errors::ErrorRing;
pub use frame::{FrameMessage, FrameParser};
pub use handler::SettingHandler;
pub use loader::{LoadError, MAX_CONFIG_FILE_LEN, load_config_file};
pub use processor::{
    ConfigProcessor, ProcessOutcome, process_config_file, process_config_message,
};
pub use record::{
    Bme280, Bmx160, DEVICE_EUI, DeviceConfig, LightTrigger, MAX_NAME_LEN, MotionTrigger,
    SensorMask, Sensors, StatusIndicator, TimeTrigger, Triggers, UsbDetection, Veml6030, WriteTo,
};
pub use report::{CaptureSink, ReportSink, TracingSink};
pub use schema::{MAX_SCHEMA_SETTINGS, SettingId, default_settings};
pub use setting::{Applier, Necessity, Setting};
pub use tagpath::{MAX_TAG_DEPTH, TagPath};
pub use tagtree::{Cursor, TagTreeParser};
pub use validate::{ValidationMode, Validator};
pub use value::{MAX_VALUE_LEN, SettingValue};
pub use verify::{
    MAX_VERIFICATION_RULES, VerificationErrors, VerificationId, VerificationRule, default_rules,
};

// Re-export the wire contracts for downstream consumers.
pub use aether_protocol as protocol;
