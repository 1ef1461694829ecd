//! `rebill-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod month;
pub mod period;

pub use error::{DomainError, DomainResult};
pub use id::{ClientId, InvoiceId};
pub use month::BillingMonth;
pub use period::BillingPeriod;
