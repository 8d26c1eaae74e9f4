//! AEther wire contracts
//!
//! This crate pins down the two externally visible binary layouts of the
//! config core:
//! - `BitSpan` + `extract` - addressing and extraction of bit ranges inside
//!   a config message frame (MSB-first bit numbering, 64-byte boundary)
//! - `ErrorCode` - the packed 32-bit error word written to the device log
//!   (3-bit category, 5-bit kind, 24-bit data payload)
//!
//! Both layouts are consumed by external tooling that decodes device logs
//! and builds config messages, so they must not drift. The property tests in
//! `tests/` pin the round-trip behavior of each.

mod bits;
mod code;
mod decode;

pub use bits::{BitSpan, extract};
pub use code::{Category, ErrorCode, ParsingKind, ValidationKind, VerificationKind};
pub use decode::{DecodedCode, DecodedKind};

/// Minimum config message frame length in bytes.
///
/// Every bit span of a bound schema must land inside a frame of this size;
/// shorter frames are rejected before any extraction happens.
pub const MIN_FRAME_LEN: usize = BitSpan::BYTE_BOUNDARY;
