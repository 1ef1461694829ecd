//! `rebill-clients` — client contracts and their billing ledgers.

pub mod client;
pub mod fees;
pub mod ledger;

pub use client::{BillingFrequency, Client, ClientStatus};
pub use fees::{FeeEntry, FeeSchedule};
pub use ledger::BillingLedger;
