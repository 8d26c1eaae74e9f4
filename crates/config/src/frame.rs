//! The bit-packed config message parser.
//!
//! Config messages arrive over the radio as a single bit-packed frame. The
//! parser validates the frame envelope, then walks the schema and extracts
//! each setting's bit span into its value buffer as a little-endian integer.
//! Settings without a frame mapping (text-only settings such as the device
//! name) are left untouched.

use aether_protocol::{ErrorCode, MIN_FRAME_LEN, ParsingKind, extract};

use crate::errors::ErrorRing;
use crate::setting::Setting;

/// A received config message: a byte buffer that may be absent when the
/// radio handed over a null payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameMessage<'a> {
    data: Option<&'a [u8]>,
}

impl<'a> FrameMessage<'a> {
    /// Wraps a received byte buffer.
    pub const fn new(bytes: &'a [u8]) -> Self {
        FrameMessage { data: Some(bytes) }
    }

    /// A message without a payload buffer.
    pub const fn missing() -> Self {
        FrameMessage { data: None }
    }

    /// The payload buffer, when present.
    #[inline]
    pub const fn data(&self) -> Option<&'a [u8]> {
        self.data
    }

    /// Payload length in bytes; zero when the buffer is absent.
    #[inline]
    pub const fn len(&self) -> usize {
        match self.data {
            Some(bytes) => bytes.len(),
            None => 0,
        }
    }

    /// Whether the message carries no usable payload.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Frame envelope errors are at most a missing pointer plus a short size.
const MAX_FRAME_ERRORS: usize = 2;

/// Validates a frame and assigns extracted spans to the schema.
#[derive(Debug, Default)]
pub struct FrameParser {
    errors: ErrorRing<MAX_FRAME_ERRORS>,
}

impl FrameParser {
    /// Creates a parser with no recorded state.
    pub fn new() -> Self {
        FrameParser { errors: ErrorRing::new() }
    }

    /// Parses `message` against `settings`.
    ///
    /// An invalid envelope (absent buffer, or fewer than [`MIN_FRAME_LEN`]
    /// bytes) is recorded and no setting is touched.
    pub fn parse(&mut self, message: FrameMessage<'_>, settings: &mut [Setting]) {
        self.errors.clear();

        if message.data().is_none() {
            self.errors
                .push(ErrorCode::parsing(ParsingKind::InvalidMessagePointer));
        }
        if message.len() < MIN_FRAME_LEN {
            self.errors.push(
                ErrorCode::parsing(ParsingKind::InsufficientMessageSize)
                    .with_data(message.len() as u32),
            );
        }
        if self.errors.any() {
            return;
        }

        let Some(bytes) = message.data() else { return };
        for setting in settings {
            let bits = setting.bits();
            if !bits.is_none() {
                setting.set_frame_value(extract(bytes, bits));
            }
        }
    }

    /// Whether the last parse recorded an envelope error.
    pub fn has_errors(&self) -> bool {
        self.errors.any()
    }

    /// The recorded envelope errors.
    pub fn errors(&self) -> &ErrorRing<MAX_FRAME_ERRORS> {
        &self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SettingId, default_settings};

    fn find<'a>(settings: &'a [Setting], id: SettingId) -> &'a Setting {
        settings.iter().find(|setting| setting.id() == id).unwrap()
    }

    #[test]
    fn test_short_frame_is_rejected_without_touching_settings() {
        let mut settings = default_settings();
        let mut parser = FrameParser::new();
        parser.parse(FrameMessage::new(&[0u8; 32]), &mut settings);

        let codes = parser.errors().as_slice();
        assert_eq!(codes.len(), 1);
        assert_eq!(
            codes[0],
            ErrorCode::parsing(ParsingKind::InsufficientMessageSize).with_data(32)
        );
        assert!(settings.iter().all(|setting| !setting.is_set()));
    }

    #[test]
    fn test_missing_buffer_is_rejected() {
        let mut settings = default_settings();
        let mut parser = FrameParser::new();
        parser.parse(FrameMessage::missing(), &mut settings);

        let codes = parser.errors().as_slice();
        assert_eq!(codes.len(), 2);
        assert_eq!(
            codes[0],
            ErrorCode::parsing(ParsingKind::InvalidMessagePointer)
        );
        assert_eq!(
            codes[1],
            ErrorCode::parsing(ParsingKind::InsufficientMessageSize).with_data(0)
        );
    }

    #[test]
    fn test_valid_frame_fills_mapped_settings() {
        let mut frame = [0u8; MIN_FRAME_LEN];
        frame[3] = 0b0010_0000; // bit 26: time trigger enabled
        frame[8..12].copy_from_slice(&5000u32.to_be_bytes()); // bits 64..96

        let mut settings = default_settings();
        let mut parser = FrameParser::new();
        parser.parse(FrameMessage::new(&frame), &mut settings);

        assert!(!parser.has_errors());
        assert_eq!(
            find(&settings, SettingId::TimeTriggerEnabled).raw_value(),
            1u64.to_le_bytes()
        );
        assert_eq!(
            find(&settings, SettingId::TimeTriggerInterval).raw_value(),
            5000u64.to_le_bytes()
        );
    }

    #[test]
    fn test_text_only_settings_are_skipped() {
        let mut settings = default_settings();
        let mut parser = FrameParser::new();
        parser.parse(FrameMessage::new(&[0u8; MIN_FRAME_LEN]), &mut settings);

        assert!(!find(&settings, SettingId::DeviceName).is_set());
        // Everything with a frame mapping received a value, even all-zero.
        for setting in settings.iter().filter(|setting| !setting.bits().is_none()) {
            assert!(setting.is_set());
        }
    }

    #[test]
    fn test_oversized_frame_is_accepted() {
        let mut settings = default_settings();
        let mut parser = FrameParser::new();
        parser.parse(FrameMessage::new(&[0u8; 80]), &mut settings);
        assert!(!parser.has_errors());
    }
}
