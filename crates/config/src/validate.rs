//! Setting validators.
//!
//! A validator turns the raw bytes buffered for one setting into a typed
//! [`SettingValue`] or a validation error kind. The same validator handles
//! both payload forms, selected by [`ValidationMode`]: document values are
//! ASCII decimal text, message frame values are little-endian integers
//! produced by bit extraction.

use std::num::{IntErrorKind, ParseIntError};
use std::str::{self, FromStr};

use aether_protocol::ValidationKind;

use crate::record::UsbDetection;
use crate::value::{MAX_VALUE_LEN, SettingValue};

/// Which interpretation strategy a validator applies to the raw buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// The buffer holds document text (ASCII decimal / labels).
    File,
    /// The buffer holds the little-endian bytes of an extracted frame value.
    Message,
}

/// The validation shape bound to one schema entry.
///
/// Numeric shapes check an inclusive range after conversion; `Flag` accepts
/// exactly 0 or 1; `Name` accepts `[A-Za-z0-9()_-]+`; `UsbMode` accepts the
/// detection labels in document form and the discriminant in message form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    Flag,
    RangeI8 { min: i8, max: i8 },
    RangeU8 { min: u8, max: u8 },
    RangeI16 { min: i16, max: i16 },
    RangeU16 { min: u16, max: u16 },
    RangeI32 { min: i32, max: i32 },
    RangeU32 { min: u32, max: u32 },
    Name,
    UsbMode,
}

macro_rules! numeric_arm {
    ($raw:expr, $mode:expr, $min:expr, $max:expr, $ty:ty, $signed:literal, $variant:ident) => {{
        let value: $ty = match $mode {
            ValidationMode::File => parse_text::<$ty>($raw, $signed)?,
            ValidationMode::Message => <$ty>::from_le_bytes(le_slice($raw)),
        };
        check_range(value, $min, $max)?;
        Ok(SettingValue::$variant(value))
    }};
}

impl Validator {
    /// Validates `raw` under `mode`, producing the typed value on success.
    pub fn check(&self, raw: &[u8], mode: ValidationMode) -> Result<SettingValue, ValidationKind> {
        match *self {
            Validator::Flag => check_flag(raw, mode),
            Validator::RangeI8 { min, max } => numeric_arm!(raw, mode, min, max, i8, true, I8),
            Validator::RangeU8 { min, max } => numeric_arm!(raw, mode, min, max, u8, false, U8),
            Validator::RangeI16 { min, max } => numeric_arm!(raw, mode, min, max, i16, true, I16),
            Validator::RangeU16 { min, max } => numeric_arm!(raw, mode, min, max, u16, false, U16),
            Validator::RangeI32 { min, max } => numeric_arm!(raw, mode, min, max, i32, true, I32),
            Validator::RangeU32 { min, max } => numeric_arm!(raw, mode, min, max, u32, false, U32),
            Validator::Name => check_name(raw),
            Validator::UsbMode => check_usb(raw, mode),
        }
    }
}

/// Characters allowed in a name besides ASCII alphanumerics.
const NAME_EXCEPTIONS: &[u8] = b"()-_";

fn check_flag(raw: &[u8], mode: ValidationMode) -> Result<SettingValue, ValidationKind> {
    let value = match mode {
        ValidationMode::File => parse_text::<u8>(raw, false)?,
        ValidationMode::Message => raw.first().copied().unwrap_or(0),
    };
    if value > 1 {
        return Err(ValidationKind::OutOfTypeRange);
    }
    Ok(SettingValue::Flag(value == 1))
}

fn check_name(raw: &[u8]) -> Result<SettingValue, ValidationKind> {
    if raw.is_empty() {
        return Err(ValidationKind::MissingValue);
    }
    let text = str::from_utf8(raw).map_err(|_| ValidationKind::ContainsInvalidCharacter)?;
    if !text
        .bytes()
        .all(|byte| byte.is_ascii_alphanumeric() || NAME_EXCEPTIONS.contains(&byte))
    {
        return Err(ValidationKind::ContainsInvalidCharacter);
    }

    let mut name = heapless::String::<MAX_VALUE_LEN>::new();
    // The buffer is already capped at MAX_VALUE_LEN, so this cannot fail.
    let _ = name.push_str(text);
    Ok(SettingValue::Text(name))
}

fn check_usb(raw: &[u8], mode: ValidationMode) -> Result<SettingValue, ValidationKind> {
    match mode {
        ValidationMode::File => {
            if raw.is_empty() {
                Err(ValidationKind::MissingValue)
            } else if raw == b"off" {
                Ok(SettingValue::I32(UsbDetection::Off as i32))
            } else if raw == b"on" {
                Ok(SettingValue::I32(UsbDetection::On as i32))
            } else if raw == b"interval" {
                Ok(SettingValue::I32(UsbDetection::Interval as i32))
            } else {
                Err(ValidationKind::InvalidOption)
            }
        }
        ValidationMode::Message => {
            let value = i32::from_le_bytes(le_slice(raw));
            match value {
                0..=2 => Ok(SettingValue::I32(value)),
                _ => Err(ValidationKind::InvalidOption),
            }
        }
    }
}

/// Parses ASCII decimal text into an integer, mapping parse failures onto
/// validation error kinds.
fn parse_text<T>(raw: &[u8], signed: bool) -> Result<T, ValidationKind>
where
    T: FromStr<Err = ParseIntError>,
{
    if raw.is_empty() {
        return Err(ValidationKind::MissingValue);
    }
    let text = str::from_utf8(raw).map_err(|_| ValidationKind::ContainsInvalidCharacter)?;
    text.parse::<T>().map_err(|error| match error.kind() {
        IntErrorKind::Empty => ValidationKind::MissingValue,
        IntErrorKind::InvalidDigit if !signed && text.starts_with('-') => {
            ValidationKind::NegativeValue
        }
        IntErrorKind::InvalidDigit => ValidationKind::ContainsInvalidCharacter,
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => ValidationKind::OutOfTypeRange,
        _ => ValidationKind::ContainsInvalidCharacter,
    })
}

fn check_range<T: PartialOrd>(value: T, min: T, max: T) -> Result<(), ValidationKind> {
    if value < min {
        return Err(ValidationKind::BelowMinThreshold);
    }
    if value > max {
        return Err(ValidationKind::AboveMaxThreshold);
    }
    Ok(())
}

/// Zero-extends the first `N` buffer bytes into a little-endian byte array.
fn le_slice<const N: usize>(raw: &[u8]) -> [u8; N] {
    let mut bytes = [0u8; N];
    let take = raw.len().min(N);
    bytes[..take].copy_from_slice(&raw[..take]);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(validator: Validator, raw: &[u8]) -> Result<SettingValue, ValidationKind> {
        validator.check(raw, ValidationMode::File)
    }

    fn message(validator: Validator, value: u64) -> Result<SettingValue, ValidationKind> {
        validator.check(&value.to_le_bytes(), ValidationMode::Message)
    }

    #[test]
    fn test_flag_accepts_zero_and_one() {
        assert_eq!(file(Validator::Flag, b"0"), Ok(SettingValue::Flag(false)));
        assert_eq!(file(Validator::Flag, b"1"), Ok(SettingValue::Flag(true)));
        assert_eq!(message(Validator::Flag, 1), Ok(SettingValue::Flag(true)));
    }

    #[test]
    fn test_flag_rejects_other_numbers() {
        assert_eq!(file(Validator::Flag, b"2"), Err(ValidationKind::OutOfTypeRange));
        assert_eq!(message(Validator::Flag, 2), Err(ValidationKind::OutOfTypeRange));
    }

    #[test]
    fn test_numeric_file_parsing() {
        let validator = Validator::RangeU32 { min: 0, max: u32::MAX };
        assert_eq!(file(validator, b"5000"), Ok(SettingValue::U32(5000)));
        assert_eq!(file(validator, b""), Err(ValidationKind::MissingValue));
        assert_eq!(file(validator, b"12x4"), Err(ValidationKind::ContainsInvalidCharacter));
    }

    #[test]
    fn test_numeric_overflow_is_type_range() {
        let validator = Validator::RangeU16 { min: 0, max: u16::MAX };
        assert_eq!(file(validator, b"70000"), Err(ValidationKind::OutOfTypeRange));
        let validator = Validator::RangeI8 { min: i8::MIN, max: i8::MAX };
        assert_eq!(file(validator, b"-500"), Err(ValidationKind::OutOfTypeRange));
    }

    #[test]
    fn test_negative_for_unsigned() {
        let validator = Validator::RangeU32 { min: 0, max: u32::MAX };
        assert_eq!(file(validator, b"-5"), Err(ValidationKind::NegativeValue));
    }

    #[test]
    fn test_threshold_errors() {
        let validator = Validator::RangeI8 { min: 0, max: 3 };
        assert_eq!(file(validator, b"7"), Err(ValidationKind::AboveMaxThreshold));
        assert_eq!(file(validator, b"-1"), Err(ValidationKind::BelowMinThreshold));
        assert_eq!(file(validator, b"3"), Ok(SettingValue::I8(3)));
    }

    #[test]
    fn test_message_mode_reads_little_endian() {
        let validator = Validator::RangeU32 { min: 0, max: u32::MAX };
        assert_eq!(message(validator, 5000), Ok(SettingValue::U32(5000)));
        let validator = Validator::RangeU16 { min: 0, max: u16::MAX };
        assert_eq!(message(validator, 0xABCD), Ok(SettingValue::U16(0xABCD)));
    }

    #[test]
    fn test_message_mode_range_check() {
        let validator = Validator::RangeI8 { min: 0, max: 3 };
        assert_eq!(message(validator, 2), Ok(SettingValue::I8(2)));
        assert_eq!(message(validator, 7), Err(ValidationKind::AboveMaxThreshold));
    }

    #[test]
    fn test_name_accepts_plain_identifiers() {
        assert_eq!(
            file(Validator::Name, b"field-unit_03(a)").unwrap().as_text(),
            Some("field-unit_03(a)")
        );
    }

    #[test]
    fn test_name_rejects_special_characters() {
        assert_eq!(file(Validator::Name, b""), Err(ValidationKind::MissingValue));
        assert_eq!(
            file(Validator::Name, b"bad name"),
            Err(ValidationKind::ContainsInvalidCharacter)
        );
        assert_eq!(
            file(Validator::Name, b"semi;colon"),
            Err(ValidationKind::ContainsInvalidCharacter)
        );
    }

    #[test]
    fn test_usb_labels() {
        assert_eq!(file(Validator::UsbMode, b"off"), Ok(SettingValue::I32(0)));
        assert_eq!(file(Validator::UsbMode, b"on"), Ok(SettingValue::I32(1)));
        assert_eq!(file(Validator::UsbMode, b"interval"), Ok(SettingValue::I32(2)));
        assert_eq!(file(Validator::UsbMode, b"auto"), Err(ValidationKind::InvalidOption));
        assert_eq!(file(Validator::UsbMode, b""), Err(ValidationKind::MissingValue));
    }

    #[test]
    fn test_usb_discriminants() {
        assert_eq!(message(Validator::UsbMode, 2), Ok(SettingValue::I32(2)));
        assert_eq!(message(Validator::UsbMode, 3), Err(ValidationKind::InvalidOption));
    }

    #[test]
    fn test_i16_signed_text() {
        let validator = Validator::RangeI16 { min: i16::MIN, max: i16::MAX };
        assert_eq!(file(validator, b"-300"), Ok(SettingValue::I16(-300)));
    }

    #[test]
    fn test_u8_range() {
        let validator = Validator::RangeU8 { min: 1, max: 9 };
        assert_eq!(file(validator, b"9"), Ok(SettingValue::U8(9)));
        assert_eq!(file(validator, b"0"), Err(ValidationKind::BelowMinThreshold));
    }

    #[test]
    fn test_i32_full_range() {
        let validator = Validator::RangeI32 { min: i32::MIN, max: i32::MAX };
        assert_eq!(file(validator, b"-99999"), Ok(SettingValue::I32(-99_999)));
        assert_eq!(message(validator, 0xFFFF_FFFF), Ok(SettingValue::I32(-1)));
    }
}
