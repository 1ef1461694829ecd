//! `rebill-engine` — the recurring billing and invoice-generation engine.
//!
//! Given a roster of client contracts and a target billing month, the engine
//! decides which clients must be billed, computes the billed amount under
//! proration and carry-over rules, allocates invoice numbers, and later
//! reconciles paid invoices back into each client's ledger. All IO goes
//! through the repository ports in [`ports`]; the per-client computation in
//! [`compute`] is pure.

pub mod adjustment;
pub mod batch;
pub mod compute;
pub mod eligibility;
pub mod error;
pub mod lifecycle;
pub mod numbering;
pub mod ports;
pub mod proration;
pub mod schedule;

pub use adjustment::{Adjustment, LedgerIntent};
pub use batch::{BatchError, BatchGenerator, BatchOutcome, CustomDates};
pub use compute::{ChargeComputation, ChargeDecision};
pub use eligibility::SkipReason;
pub use error::BillingError;
pub use lifecycle::LifecycleManager;
pub use ports::{
    ClientRepository, InvoiceRepository, LedgerUpdate, RepositoryError, SettingsProvider,
};
pub use schedule::{CompanySettings, DueDateRule, IssueDateRule};
