//! Human-readable decoding of packed error codes.
//!
//! The device only ever logs the hex word; this module is for the tooling
//! on the other side of the log (and for test assertions) that needs to
//! turn `0x4A00000A` back into something a person can read. Decoding is
//! lossless: the payload interpretation depends on the kind, so every
//! rendering keeps the raw data segment available.

use std::fmt;

use crate::code::{Category, ErrorCode, ParsingKind, ValidationKind, VerificationKind};

/// The kind segment of a decoded code, resolved per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedKind {
    /// Category 0 carries no kind enum.
    Unspecified(u8),
    Parsing(ParsingKind),
    Validation(ValidationKind),
    Verification(VerificationKind),
}

impl DecodedKind {
    /// Short lowercase name of the kind, e.g. `missing_closing_tag`.
    pub const fn as_str(self) -> &'static str {
        match self {
            DecodedKind::Unspecified(_) => "unspecified",
            DecodedKind::Parsing(kind) => parsing_kind_name(kind),
            DecodedKind::Validation(kind) => validation_kind_name(kind),
            DecodedKind::Verification(kind) => verification_kind_name(kind),
        }
    }
}

/// A fully decoded error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedCode {
    /// The raw code as logged.
    pub raw: u32,
    /// The decoded category segment.
    pub category: Category,
    /// The decoded kind segment.
    pub kind: DecodedKind,
    /// The raw 24-bit data segment.
    pub data: u32,
}

impl DecodedCode {
    /// Decodes a packed code.
    pub const fn from_code(code: ErrorCode) -> Self {
        let category = code.category();
        let kind = match category {
            Category::Unspecified => DecodedKind::Unspecified(code.kind()),
            Category::Parsing => DecodedKind::Parsing(ParsingKind::from_u8(code.kind())),
            Category::Validation => DecodedKind::Validation(ValidationKind::from_u8(code.kind())),
            Category::Verification => {
                DecodedKind::Verification(VerificationKind::from_u8(code.kind()))
            }
        };
        DecodedCode {
            raw: code.value(),
            category,
            kind,
            data: code.data(),
        }
    }

    /// Decodes a raw logged word.
    pub const fn from_raw(raw: u32) -> Self {
        Self::from_code(ErrorCode::from_raw(raw))
    }

    /// Whether the data segment of this kind is a document position.
    pub const fn carries_position(&self) -> bool {
        matches!(
            self.kind,
            DecodedKind::Parsing(
                ParsingKind::ExceedsMaxValueLength
                    | ParsingKind::EmptyConfig
                    | ParsingKind::NoTagsFound
            )
        )
    }

    /// Whether the data segment of this kind is a dense identifier.
    pub const fn carries_id(&self) -> bool {
        matches!(
            self.kind,
            DecodedKind::Validation(_) | DecodedKind::Verification(_)
        )
    }
}

impl fmt::Display for DecodedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category.as_str(), self.kind.as_str())?;
        if self.carries_position() {
            let column = (self.data >> 12) & 0xFFF;
            let line = self.data & 0xFFF;
            write!(f, " at {line}:{column}")
        } else if self.carries_id() {
            write!(f, " (id {})", self.data)
        } else {
            write!(f, " ({})", self.data)
        }
    }
}

const fn parsing_kind_name(kind: ParsingKind) -> &'static str {
    match kind {
        ParsingKind::Unspecified => "unspecified",
        ParsingKind::MissingOpeningTag => "missing_opening_tag",
        ParsingKind::MissingClosingTag => "missing_closing_tag",
        ParsingKind::ExceedsMaxValueLength => "exceeds_max_value_length",
        ParsingKind::EmptyConfig => "empty_config",
        ParsingKind::NoTagsFound => "no_tags_found",
        ParsingKind::InvalidMessagePointer => "invalid_message_pointer",
        ParsingKind::InsufficientMessageSize => "insufficient_message_size",
    }
}

const fn validation_kind_name(kind: ValidationKind) -> &'static str {
    match kind {
        ValidationKind::Unspecified => "unspecified",
        ValidationKind::SettingUnset => "setting_unset",
        ValidationKind::ContainsInvalidCharacter => "contains_invalid_character",
        ValidationKind::MissingValue => "missing_value",
        ValidationKind::NegativeValue => "negative_value",
        ValidationKind::ExceedsMaxLength => "exceeds_max_length",
        ValidationKind::OutOfTypeRange => "out_of_type_range",
        ValidationKind::BelowTypeRange => "below_type_range",
        ValidationKind::AboveTypeRange => "above_type_range",
        ValidationKind::BelowMinThreshold => "below_min_threshold",
        ValidationKind::AboveMaxThreshold => "above_max_threshold",
        ValidationKind::InvalidOption => "invalid_option",
    }
}

const fn verification_kind_name(kind: VerificationKind) -> &'static str {
    match kind {
        VerificationKind::Unspecified => "unspecified",
        VerificationKind::NoTriggerEnabled => "no_trigger_enabled",
        VerificationKind::NoDataDestinationEnabled => "no_data_destination_enabled",
    }
}
