//! A setting: one schema entry binding a payload location to a record field.
//!
//! A setting knows where its value lives in both payload forms (a tag path
//! for the document form, a bit span for the message frame form), how to
//! validate the raw bytes, and how to write the converted value into the
//! master record. The raw bytes live in a fixed 32-byte buffer filled during
//! parsing; the converted value is cached between validate and apply.

use aether_protocol::{BitSpan, ValidationKind};

use crate::record::DeviceConfig;
use crate::schema::SettingId;
use crate::tagpath::TagPath;
use crate::validate::{ValidationMode, Validator};
use crate::value::{MAX_VALUE_LEN, SettingValue};

/// Whether a payload must assign the setting a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Necessity {
    /// An unset value is a validation error.
    Required,
    /// An unset value is silently skipped.
    Optional,
}

/// Applies a converted value to the master record.
///
/// Appliers run in schema order and may read record state written by earlier
/// appliers; the default schema relies on this for the trigger enable gates.
pub type Applier = fn(&SettingValue, &mut DeviceConfig);

/// One entry of the setting schema.
#[derive(Debug, Clone)]
pub struct Setting {
    id: SettingId,
    tags: TagPath,
    bits: BitSpan,
    necessity: Necessity,
    validator: Validator,
    applier: Applier,
    buffer: heapless::Vec<u8, MAX_VALUE_LEN>,
    cached: Option<SettingValue>,
}

impl Setting {
    /// Creates an optional setting; chain [`Setting::required`] to tighten.
    pub fn new(
        id: SettingId,
        tags: TagPath,
        bits: BitSpan,
        validator: Validator,
        applier: Applier,
    ) -> Self {
        Setting {
            id,
            tags,
            bits,
            necessity: Necessity::Optional,
            validator,
            applier,
            buffer: heapless::Vec::new(),
            cached: None,
        }
    }

    /// Marks the setting as required.
    pub fn required(mut self) -> Self {
        self.necessity = Necessity::Required;
        self
    }

    /// Copies at most [`MAX_VALUE_LEN`] bytes of `content` into the value
    /// buffer, replacing any previous value.
    pub fn set_value(&mut self, content: &[u8]) {
        self.buffer.clear();
        let take = content.len().min(MAX_VALUE_LEN);
        let _ = self.buffer.extend_from_slice(&content[..take]);
    }

    /// Stores an extracted frame value as its little-endian bytes.
    pub fn set_frame_value(&mut self, value: u64) {
        self.set_value(&value.to_le_bytes());
    }

    /// Drops the buffered value and the cached conversion.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cached = None;
    }

    /// Whether the current payload assigned this setting a value.
    #[inline]
    pub fn is_set(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Validates the buffered value and caches the conversion on success.
    ///
    /// An empty buffer reports [`ValidationKind::SettingUnset`] without
    /// invoking the validator. The cache holds a value exactly when the most
    /// recent call returned `Ok`.
    pub fn validate(&mut self, mode: ValidationMode) -> Result<(), ValidationKind> {
        if !self.is_set() {
            self.cached = None;
            return Err(ValidationKind::SettingUnset);
        }
        match self.validator.check(&self.buffer, mode) {
            Ok(value) => {
                self.cached = Some(value);
                Ok(())
            }
            Err(kind) => {
                self.cached = None;
                Err(kind)
            }
        }
    }

    /// Applies the cached value to the record.
    ///
    /// Callers invoke this only after a successful [`Setting::validate`];
    /// without a cached value the call does nothing.
    pub fn apply(&self, config: &mut DeviceConfig) {
        if let Some(value) = &self.cached {
            (self.applier)(value, config);
        }
    }

    /// The dense identifier of this setting.
    #[inline]
    pub fn id(&self) -> SettingId {
        self.id
    }

    /// The tag name expected at `depth`, empty past the end of the path.
    #[inline]
    pub fn tag(&self, depth: usize) -> &'static str {
        self.tags.tag(depth)
    }

    /// The full tag path.
    #[inline]
    pub fn tags(&self) -> &TagPath {
        &self.tags
    }

    /// The message frame location, [`BitSpan::NONE`] for text-only settings.
    #[inline]
    pub fn bits(&self) -> BitSpan {
        self.bits
    }

    /// Whether a payload must assign this setting a value.
    #[inline]
    pub fn necessity(&self) -> Necessity {
        self.necessity
    }

    /// The buffered raw value of the current payload.
    #[inline]
    pub fn raw_value(&self) -> &[u8] {
        &self.buffer
    }

    /// The cached conversion of the last successful validation.
    #[inline]
    pub fn cached(&self) -> Option<&SettingValue> {
        self.cached.as_ref()
    }
}

/// Settings are identified by id alone.
impl PartialEq for Setting {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Setting {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::StatusIndicator;

    fn flag_setting() -> Setting {
        Setting::new(
            SettingId::TimeTriggerEnabled,
            TagPath::root("aether").join("trigger").join("time").join("enabled"),
            BitSpan::flag(26),
            Validator::Flag,
            |value, config| {
                if let Some(flag) = value.as_flag() {
                    config.trigger.time.enabled = flag;
                }
            },
        )
    }

    #[test]
    fn test_set_value_truncates_to_buffer_capacity() {
        let mut setting = flag_setting();
        let oversized = [b'7'; MAX_VALUE_LEN + 5];
        setting.set_value(&oversized);
        assert_eq!(setting.raw_value().len(), MAX_VALUE_LEN);
    }

    #[test]
    fn test_unset_reports_setting_unset() {
        let mut setting = flag_setting();
        assert!(!setting.is_set());
        assert_eq!(
            setting.validate(ValidationMode::File),
            Err(ValidationKind::SettingUnset)
        );
        assert!(setting.cached().is_none());
    }

    #[test]
    fn test_validate_caches_value_only_on_success() {
        let mut setting = flag_setting();
        setting.set_value(b"1");
        assert_eq!(setting.validate(ValidationMode::File), Ok(()));
        assert_eq!(setting.cached(), Some(&SettingValue::Flag(true)));

        setting.set_value(b"9");
        assert!(setting.validate(ValidationMode::File).is_err());
        assert!(setting.cached().is_none());
    }

    #[test]
    fn test_apply_writes_through_the_applier() {
        let mut setting = flag_setting();
        let mut config = DeviceConfig::default();
        config.trigger.time.enabled = false;

        setting.set_value(b"1");
        setting.validate(ValidationMode::File).unwrap();
        setting.apply(&mut config);
        assert!(config.trigger.time.enabled);
        assert_eq!(config.status, StatusIndicator::Operational);
    }

    #[test]
    fn test_apply_without_validation_is_inert() {
        let setting = flag_setting();
        let mut config = DeviceConfig::default();
        let before = config.clone();
        setting.apply(&mut config);
        assert_eq!(config, before);
    }

    #[test]
    fn test_frame_value_is_little_endian() {
        let mut setting = flag_setting();
        setting.set_frame_value(0x0102_0304);
        assert_eq!(setting.raw_value()[..4], [0x04, 0x03, 0x02, 0x01]);
        assert_eq!(setting.raw_value().len(), 8);
    }

    #[test]
    fn test_clear_resets_buffer_and_cache() {
        let mut setting = flag_setting();
        setting.set_value(b"1");
        setting.validate(ValidationMode::File).unwrap();
        setting.clear();
        assert!(!setting.is_set());
        assert!(setting.cached().is_none());
    }

    #[test]
    fn test_equality_is_by_id() {
        let mut modified = flag_setting();
        modified.set_value(b"0");
        assert_eq!(modified, flag_setting());
    }
}
