//! Verification rules: cross-field post-conditions on the applied record.
//!
//! Individually valid settings can still combine into a record that would
//! brick the device in the field, e.g. every trigger disabled, or a trigger
//! that measures but writes nowhere. Verification runs after apply and
//! rejects such records as a whole.

use aether_protocol::VerificationKind;

use crate::errors::ErrorRing;
use crate::record::{DeviceConfig, WriteTo};

/// Dense identifiers of the verification rules, used in error payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum VerificationId {
    Unspecified = 0,
    /// At least one trigger must be enabled.
    TriggerRequirement = 1,
    /// The time trigger must have an output destination.
    TimeTrigger = 2,
    /// The light trigger must have an output destination.
    LightTrigger = 3,
    /// The acceleration trigger must have an output destination.
    AccelerationTrigger = 4,
    /// The orientation trigger must have an output destination.
    OrientationTrigger = 5,
}

/// Upper bound on rules held by one processor; sizes the verification ring.
pub const MAX_VERIFICATION_RULES: usize = 8;

/// A bounded collection of verification error codes.
pub type VerificationErrors = ErrorRing<MAX_VERIFICATION_RULES>;

/// One post-condition over the master record.
#[derive(Debug, Clone, Copy)]
pub struct VerificationRule {
    id: VerificationId,
    check: fn(&DeviceConfig) -> Option<VerificationKind>,
}

impl VerificationRule {
    /// Creates a rule from an identifier and a predicate.
    pub fn new(id: VerificationId, check: fn(&DeviceConfig) -> Option<VerificationKind>) -> Self {
        VerificationRule { id, check }
    }

    /// Runs the predicate against `config`.
    pub fn verify(&self, config: &DeviceConfig) -> Option<VerificationKind> {
        (self.check)(config)
    }

    /// The identifier of this rule.
    pub fn id(&self) -> VerificationId {
        self.id
    }
}

/// Rules are identified by id alone.
impl PartialEq for VerificationRule {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for VerificationRule {}

/// An enabled trigger must write somewhere; a disabled one may do anything.
fn verify_destination(enabled: bool, write_to: WriteTo) -> Option<VerificationKind> {
    if enabled && !write_to.any() {
        return Some(VerificationKind::NoDataDestinationEnabled);
    }
    None
}

/// The default rule set guarding the device against dead configurations.
pub fn default_rules() -> Vec<VerificationRule> {
    vec![
        VerificationRule::new(VerificationId::TriggerRequirement, |config| {
            if config.trigger.any_enabled() {
                None
            } else {
                Some(VerificationKind::NoTriggerEnabled)
            }
        }),
        VerificationRule::new(VerificationId::TimeTrigger, |config| {
            verify_destination(config.trigger.time.enabled, config.trigger.time.write_to)
        }),
        VerificationRule::new(VerificationId::LightTrigger, |config| {
            verify_destination(config.trigger.light.enabled, config.trigger.light.write_to)
        }),
        VerificationRule::new(VerificationId::AccelerationTrigger, |config| {
            verify_destination(
                config.trigger.acceleration.enabled,
                config.trigger.acceleration.write_to,
            )
        }),
        VerificationRule::new(VerificationId::OrientationTrigger, |config| {
            verify_destination(
                config.trigger.orientation.enabled,
                config.trigger.orientation.write_to,
            )
        }),
    ]
}
