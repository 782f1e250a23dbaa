//! Invoice number value object and sequencing.
//!
//! Invoice numbers are a fixed textual prefix followed by a zero-padded
//! (minimum 3-digit) decimal counter, e.g. `GHW#007`. The next number is
//! derived from the maximum parseable suffix across *all* existing invoices,
//! so deletions and out-of-order inserts can never cause a collision.

use serde::{Deserialize, Serialize};

/// Fixed prefix carried by every generated invoice number.
pub const PREFIX: &str = "GHW#";

/// Human-readable invoice number, e.g. `GHW#007`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceNumber(String);

impl InvoiceNumber {
    /// Wrap a stored number verbatim. Malformed values are representable;
    /// they sort as suffix 0 and are skipped by the sequencer.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Render a number from its numeric suffix, zero-padded to 3 digits.
    pub fn from_suffix(suffix: u64) -> Self {
        Self(format!("{PREFIX}{suffix:03}"))
    }

    /// The numeric suffix, or `None` when the value is malformed (wrong
    /// prefix or non-numeric remainder).
    pub fn suffix(&self) -> Option<u64> {
        self.0.strip_prefix(PREFIX)?.parse().ok()
    }

    /// Descending list order compares suffixes numerically, with malformed
    /// numbers substituting 0.
    pub fn sort_key(&self) -> u64 {
        self.suffix().unwrap_or(0)
    }

    /// Next number after the given set: max parseable suffix + 1, or
    /// `GHW#001` when nothing parseable exists.
    pub fn next_after<'a>(existing: impl IntoIterator<Item = &'a InvoiceNumber>) -> Self {
        let max = existing
            .into_iter()
            .filter_map(InvoiceNumber::suffix)
            .max()
            .unwrap_or(0);
        Self::from_suffix(max + 1)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for InvoiceNumber {
    fn from(value: String) -> Self {
        Self(value)
    }
}
