//! Totals aggregation and amount formatting.
//!
//! Amounts are carried as `f64` per line and collapsed to whole currency units exactly
//! once, when the document totals are computed.

use crate::line_item::LineItem;
use serde::{Deserialize, Serialize};

/// Value added tax applied when tax is enabled on a document.
pub const TAX_RATE: f64 = 0.07;

/// Whole-unit totals printed in the summary block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTotals {
    pub subtotal: i64,
    pub tax: i64,
    pub grand_total: i64,
}

impl DocumentTotals {
    /// Aggregates the effective (non-empty) items.
    ///
    /// The subtotal is the rounded sum of line totals, never a sum of rounded lines.
    pub fn compute(items: &[LineItem], tax_enabled: bool) -> Self {
        let raw: f64 = items
            .iter()
            .filter(|item| !item.is_empty())
            .map(LineItem::line_total)
            .sum();
        let subtotal = round_half_even(raw);
        let tax = if tax_enabled {
            round_half_even(subtotal as f64 * TAX_RATE)
        } else {
            0
        };
        Self::from_parts(subtotal, tax)
    }

    /// Builds totals from precomputed parts, deriving the grand total so the sum always holds.
    pub fn from_parts(subtotal: i64, tax: i64) -> Self {
        Self {
            subtotal,
            tax,
            grand_total: subtotal + tax,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.grand_total == self.subtotal + self.tax
    }
}

/// Rounds to the nearest whole unit, ties to even (`2.5 -> 2`, `3.5 -> 4`).
pub fn round_half_even(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    value.round_ties_even() as i64
}

/// Formats an amount with `,` thousands separators and no decimal places.
pub fn format_amount(value: f64) -> String {
    format_units(round_half_even(value))
}

/// Formats whole currency units with `,` thousands separators.
pub fn format_units(units: i64) -> String {
    let mut buffer = itoa::Buffer::new();
    let digits = buffer.format(units.unsigned_abs());

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if units < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
