//! The config processor: parse, validate, apply, verify.
//!
//! One processor owns the schema, the verification rules and the master
//! record, and turns incoming payloads into record updates:
//!
//! 1. the payload is parsed into the setting buffers (tag-tree document or
//!    bit-packed message frame),
//! 2. each setting is validated and, when valid, applied to the record,
//! 3. with a clean parse and validation, the verification rules inspect the
//!    applied record as a whole.
//!
//! Any parsing or validation error rejects the payload but leaves applied
//! values in place; a verification failure resets the record to defaults.
//! Either way the record's status flag reports the failure and the error
//! codes go out through the report sink.

use std::path::Path;

use tracing::{error, info};

use aether_protocol::ErrorCode;

use crate::errors::ErrorRing;
use crate::frame::{FrameMessage, FrameParser};
use crate::handler::SettingHandler;
use crate::loader;
use crate::record::{DeviceConfig, StatusIndicator};
use crate::report::{ReportSink, TracingSink};
use crate::schema::{MAX_SCHEMA_SETTINGS, default_settings};
use crate::setting::Setting;
use crate::tagtree::TagTreeParser;
use crate::validate::ValidationMode;
use crate::verify::{VerificationErrors, VerificationRule, default_rules};

/// The outcome of processing one payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The record reflects the payload and passed verification.
    Accepted,
    /// The payload was rejected; the record's status flag is set to failure.
    Rejected,
}

impl ProcessOutcome {
    /// Whether the payload was accepted.
    #[inline]
    pub const fn is_accepted(self) -> bool {
        matches!(self, ProcessOutcome::Accepted)
    }
}

/// Processes config payloads against a schema and a master record.
pub struct ConfigProcessor<S: ReportSink = TracingSink> {
    config: DeviceConfig,
    settings: Vec<Setting>,
    rules: Vec<VerificationRule>,
    sink: S,
}

impl ConfigProcessor<TracingSink> {
    /// Creates a processor with the default schema, the default rules and
    /// the tracing report sink.
    pub fn new() -> Self {
        Self::with_sink(TracingSink)
    }
}

impl Default for ConfigProcessor<TracingSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ReportSink> ConfigProcessor<S> {
    /// Creates a processor with the default schema and rules, reporting
    /// through `sink`.
    pub fn with_sink(sink: S) -> Self {
        Self::with_parts(default_settings(), default_rules(), sink)
    }

    /// Creates a processor from explicit parts.
    pub fn with_parts(settings: Vec<Setting>, rules: Vec<VerificationRule>, sink: S) -> Self {
        debug_assert!(settings.len() <= MAX_SCHEMA_SETTINGS);
        ConfigProcessor {
            config: DeviceConfig::default(),
            settings,
            rules,
            sink,
        }
    }

    /// Processes a tag-tree document.
    pub fn process_document(&mut self, document: &str) -> ProcessOutcome {
        self.clear_settings();

        let mut parser = TagTreeParser::new();
        parser.parse(document, &mut self.settings);

        let mut handler = SettingHandler::new(ValidationMode::File);
        handler.validate_and_apply(&mut self.settings, &mut self.config);

        if parser.has_errors() || handler.has_errors() {
            error!("config could not be fully processed");
            parser
                .errors()
                .report("errors while parsing the config document:", &mut self.sink);
            handler.report(&mut self.sink);
            return self.reject();
        }
        self.accept_or_reset()
    }

    /// Processes a bit-packed config message frame.
    pub fn process_message(&mut self, message: FrameMessage<'_>) -> ProcessOutcome {
        self.clear_settings();

        let mut parser = FrameParser::new();
        parser.parse(message, &mut self.settings);

        let mut handler = SettingHandler::new(ValidationMode::Message);
        handler.validate_and_apply(&mut self.settings, &mut self.config);

        if parser.has_errors() || handler.has_errors() {
            error!("config message could not be fully processed");
            parser
                .errors()
                .report("errors while parsing the config message:", &mut self.sink);
            handler.report(&mut self.sink);
            return self.reject();
        }
        self.accept_or_reset()
    }

    /// The master record in its current state.
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Consumes the processor, yielding the master record.
    pub fn into_config(self) -> DeviceConfig {
        self.config
    }

    /// Replaces the master record, e.g. with values restored from flash.
    pub fn set_config(&mut self, config: DeviceConfig) {
        self.config = config;
    }

    /// The report sink, mainly for tests inspecting captured lines.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn clear_settings(&mut self) {
        for setting in &mut self.settings {
            setting.clear();
        }
    }

    fn reject(&mut self) -> ProcessOutcome {
        self.config.status = StatusIndicator::Failure;
        ProcessOutcome::Rejected
    }

    fn accept_or_reset(&mut self) -> ProcessOutcome {
        info!("config processed successfully");
        let verification = self.verify();
        if verification.any() {
            verification.report("active config did not pass verification:", &mut self.sink);
            self.config.reset();
            return self.reject();
        }
        info!("active config passed verification");
        self.config.log_summary();
        ProcessOutcome::Accepted
    }

    fn verify(&self) -> VerificationErrors {
        let mut errors = ErrorRing::new();
        for rule in &self.rules {
            if let Some(kind) = rule.verify(&self.config) {
                errors.push(ErrorCode::verification(kind).with_id(rule.id() as u8));
            }
        }
        errors
    }
}

/// Loads and processes a config file, the boot-time entry point.
///
/// A file that cannot be loaded never reaches the parser; the failure is
/// logged and a defaulted record with the failure status comes back.
pub fn process_config_file(path: &Path) -> DeviceConfig {
    match loader::load_config_file(path) {
        Ok(document) => {
            let mut processor = ConfigProcessor::new();
            processor.process_document(&document);
            processor.into_config()
        }
        Err(load_error) => {
            error!("config file could not be loaded: {load_error}");
            let mut config = DeviceConfig::default();
            config.status = StatusIndicator::Failure;
            config
        }
    }
}

/// Processes a received config message, the radio entry point.
pub fn process_config_message(message: FrameMessage<'_>) -> DeviceConfig {
    let mut processor = ConfigProcessor::new();
    processor.process_message(message);
    processor.into_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CaptureSink;

    fn capture_processor() -> ConfigProcessor<CaptureSink> {
        ConfigProcessor::with_sink(CaptureSink::default())
    }

    #[test]
    fn test_accepting_a_document_keeps_status_operational() {
        let mut processor = capture_processor();
        let outcome = processor.process_document(
            "<aether><usb><detection>off</detection></usb></aether>",
        );
        assert!(outcome.is_accepted());
        assert_eq!(processor.config().status, StatusIndicator::Operational);
        assert_eq!(processor.config().usb_detection, crate::record::UsbDetection::Off);
        assert!(processor.sink().lines().is_empty());
    }

    #[test]
    fn test_parsing_failure_sets_failure_status_and_reports() {
        let mut processor = capture_processor();
        let outcome = processor.process_document("<aether><usb>");
        assert_eq!(outcome, ProcessOutcome::Rejected);
        assert_eq!(processor.config().status, StatusIndicator::Failure);
        assert!(
            processor
                .sink()
                .lines()
                .iter()
                .any(|line| line == "errors while parsing the config document:")
        );
    }

    #[test]
    fn test_validation_failure_keeps_other_applied_values() {
        let mut processor = capture_processor();
        let outcome = processor.process_document(
            "<aether>\
               <usb><detection-interval-ms>60000</detection-interval-ms></usb>\
               <trigger><time><write-to><lorawan-priority>7</lorawan-priority></write-to></time></trigger>\
             </aether>",
        );
        assert_eq!(outcome, ProcessOutcome::Rejected);
        // Valid settings were applied before the failure was tallied.
        assert_eq!(processor.config().usb_detection_interval_ms, 60_000);
        assert_eq!(processor.config().trigger.time.lora_priority, 4);
        assert_eq!(processor.config().status, StatusIndicator::Failure);
    }

    #[test]
    fn test_verification_failure_resets_the_record() {
        let mut processor = capture_processor();
        let outcome = processor.process_document(
            "<aether><trigger>\
               <time><enabled>0</enabled></time>\
               <light><enabled>0</enabled></light>\
               <acceleration><enabled>0</enabled></acceleration>\
               <orientation><enabled>0</enabled></orientation>\
             </trigger></aether>",
        );
        assert_eq!(outcome, ProcessOutcome::Rejected);
        // The record is back to defaults apart from the failure flag.
        assert_eq!(processor.config().status, StatusIndicator::Failure);
        assert!(processor.config().trigger.time.enabled);
        assert!(
            processor
                .sink()
                .lines()
                .iter()
                .any(|line| line == "active config did not pass verification:")
        );
    }

    #[test]
    fn test_consecutive_payloads_start_from_clean_buffers() {
        let mut processor = capture_processor();
        assert!(
            processor
                .process_document("<aether><usb><detection>on</detection></usb></aether>")
                .is_accepted()
        );
        // The second document does not mention USB at all; the earlier value
        // must not be revalidated from a stale buffer.
        assert!(
            processor
                .process_document(
                    "<aether><trigger><time><interval-ms>9000</interval-ms></time></trigger></aether>"
                )
                .is_accepted()
        );
        assert_eq!(processor.config().trigger.time.interval_ms, 9_000);
        assert_eq!(processor.config().usb_detection, crate::record::UsbDetection::On);
    }

    #[test]
    fn test_message_roundtrip_through_processor() {
        let mut frame = [0u8; aether_protocol::MIN_FRAME_LEN];
        frame[3] = 0b0010_0000; // time trigger enabled
        frame[16] = 0b0010_0000; // bit 130: time write-to lora

        let mut processor = capture_processor();
        let outcome = processor.process_message(FrameMessage::new(&frame));
        assert!(outcome.is_accepted());
        assert!(processor.config().trigger.time.enabled);
        assert!(processor.config().trigger.time.write_to.lora);
        assert!(!processor.config().trigger.time.write_to.sd);
    }

    #[test]
    fn test_process_config_message_entry_point() {
        let config = process_config_message(FrameMessage::new(&[0u8; 16]));
        assert_eq!(config.status, StatusIndicator::Failure);
        assert_eq!(config.usb_detection_interval_ms, 10_000);
    }
}
