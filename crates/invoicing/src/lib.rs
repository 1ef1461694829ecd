//! Invoicing domain module.
//!
//! This crate contains business rules for invoice records and their payment
//! lifecycle, implemented purely as deterministic domain logic (no IO, no
//! HTTP, no storage).

pub mod invoice;
pub mod status;

pub use invoice::{Invoice, NewInvoice, PaymentReceipt, PaymentReconciliation};
pub use status::InvoiceStatus;
