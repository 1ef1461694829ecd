//! Human-readable invoice numbers.

use rebill_core::BillingMonth;

/// Format the invoice number for `month` and an allocated sequence:
/// `INV-<YYYYMM>-<seq>`, sequence zero-padded to three digits.
///
/// Uniqueness comes from the repository's sequence allocation; this only
/// formats.
pub fn invoice_number(month: BillingMonth, sequence: u32) -> String {
    format!("INV-{:04}{:02}-{:03}", month.year(), month.month(), sequence)
}
