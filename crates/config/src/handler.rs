//! The setting handler: validate everything, apply what is valid.
//!
//! After a parser has filled the value buffers, the handler walks the schema
//! in declaration order, validates each setting and applies the valid ones
//! to the master record. Failures are bucketed by severity: settings that
//! were never assigned a value land in the unset ring (and only when they
//! are required), everything else lands in the invalid-value ring.
//!
//! Declaration order is a contract: an applier may read record state written
//! by an earlier applier. The default schema declares each trigger's
//! `enabled` entry before the sensor entries that depend on it.

use aether_protocol::{ErrorCode, ValidationKind};

use crate::errors::ErrorRing;
use crate::record::DeviceConfig;
use crate::report::ReportSink;
use crate::schema::MAX_SCHEMA_SETTINGS;
use crate::setting::{Necessity, Setting};
use crate::validate::ValidationMode;

/// Validates and applies a schema against a master record.
#[derive(Debug)]
pub struct SettingHandler {
    mode: ValidationMode,
    unset_errors: ErrorRing<MAX_SCHEMA_SETTINGS>,
    invalid_value_errors: ErrorRing<MAX_SCHEMA_SETTINGS>,
}

impl SettingHandler {
    /// Creates a handler validating under `mode`.
    pub fn new(mode: ValidationMode) -> Self {
        SettingHandler {
            mode,
            unset_errors: ErrorRing::new(),
            invalid_value_errors: ErrorRing::new(),
        }
    }

    /// Validates every setting in schema order, applying each valid one to
    /// `config` before the next is visited.
    pub fn validate_and_apply(&mut self, settings: &mut [Setting], config: &mut DeviceConfig) {
        self.unset_errors.clear();
        self.invalid_value_errors.clear();

        for setting in settings {
            match setting.validate(self.mode) {
                Ok(()) => setting.apply(config),
                Err(ValidationKind::SettingUnset) => {
                    if setting.necessity() == Necessity::Required {
                        self.unset_errors.push(
                            ErrorCode::validation(ValidationKind::SettingUnset)
                                .with_id(setting.id() as u8),
                        );
                    }
                }
                Err(kind) => {
                    self.invalid_value_errors
                        .push(ErrorCode::validation(kind).with_id(setting.id() as u8));
                }
            }
        }
    }

    /// Whether any validation error was recorded.
    pub fn has_errors(&self) -> bool {
        self.unset_errors.any() || self.invalid_value_errors.any()
    }

    /// Required settings that were never assigned a value.
    pub fn unset_errors(&self) -> &ErrorRing<MAX_SCHEMA_SETTINGS> {
        &self.unset_errors
    }

    /// Settings whose buffered value failed validation.
    pub fn invalid_value_errors(&self) -> &ErrorRing<MAX_SCHEMA_SETTINGS> {
        &self.invalid_value_errors
    }

    /// Emits both error buckets through `sink`.
    pub fn report(&self, sink: &mut dyn ReportSink) {
        self.unset_errors.report("settings that were not set:", sink);
        self.invalid_value_errors.report("settings with invalid values:", sink);
    }

    /// The active validation mode.
    pub fn mode(&self) -> ValidationMode {
        self.mode
    }
}
