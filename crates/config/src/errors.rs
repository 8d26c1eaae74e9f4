//! Bounded error storage.
//!
//! Error codes accumulate in fixed-capacity rings sized by the schema (one
//! slot per setting or rule), so the failure path allocates nothing. On
//! overflow the newest code replaces the last slot: when the ring is
//! saturated the most recent error survives and everything before it is
//! preserved.

use aether_protocol::ErrorCode;

use crate::report::ReportSink;

/// A bounded, append-only collection of error codes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorRing<const N: usize> {
    codes: heapless::Vec<ErrorCode, N>,
}

impl<const N: usize> ErrorRing<N> {
    /// Creates an empty ring.
    pub fn new() -> Self {
        ErrorRing { codes: heapless::Vec::new() }
    }

    /// Appends a code; when the ring is full the last slot is overwritten.
    pub fn push(&mut self, code: ErrorCode) {
        if self.codes.push(code).is_err()
            && let Some(last) = self.codes.last_mut()
        {
            *last = code;
        }
    }

    /// Drops every stored code.
    pub fn clear(&mut self) {
        self.codes.clear();
    }

    /// Whether at least one code is stored.
    #[inline]
    pub fn any(&self) -> bool {
        !self.codes.is_empty()
    }

    /// Number of stored codes.
    #[inline]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether the ring is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Maximum number of codes the ring can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        N
    }

    /// The stored codes, oldest first.
    #[inline]
    pub fn as_slice(&self) -> &[ErrorCode] {
        &self.codes
    }

    /// Emits the stored codes to `sink` in hex, preceded by `prefix`.
    ///
    /// An empty ring emits nothing.
    pub fn report(&self, prefix: &str, sink: &mut dyn ReportSink) {
        if self.is_empty() {
            return;
        }
        sink.emit(prefix);
        for code in &self.codes {
            sink.emit(&format!("  {code}"));
        }
    }
}
