//! Repository ports consumed by the engine.
//!
//! Client records and company settings are owned elsewhere; the engine only
//! sees these contracts. Implementations are free to back them with anything
//! that can satisfy the blocking call semantics.

use std::sync::Arc;

use rebill_clients::{BillingLedger, Client};
use rebill_core::{BillingMonth, ClientId, DomainError, DomainResult, InvoiceId};
use rebill_invoicing::Invoice;

use crate::schedule::CompanySettings;

/// Mutation applied to a stored ledger inside the store's critical section.
pub type LedgerUpdate<'a> = &'a mut dyn FnMut(&mut BillingLedger) -> DomainResult<()>;

/// Repository failure.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("duplicate record: {0}")]
    Duplicate(String),
    #[error("storage error: {0}")]
    Storage(String),
    /// Domain failure surfaced from a [`LedgerUpdate`] closure.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Client store abstraction.
pub trait ClientRepository: Send + Sync {
    /// All active clients, in a stable order.
    fn list_active(&self) -> Result<Vec<Client>, RepositoryError>;

    /// Get a client by ID.
    fn get(&self, id: ClientId) -> Result<Option<Client>, RepositoryError>;

    /// Mutate a client's billing ledger in place.
    ///
    /// The closure runs against the freshest stored ledger, inside whatever
    /// critical section the store uses for writes, so the update never starts
    /// from a stale snapshot. The engine mutates nothing else on the client
    /// record.
    fn update_ledger(&self, id: ClientId, apply: LedgerUpdate<'_>)
    -> Result<(), RepositoryError>;
}

/// Invoice store abstraction.
pub trait InvoiceRepository: Send + Sync {
    /// Persist a newly issued invoice.
    fn append(&self, invoice: Invoice) -> Result<(), RepositoryError>;

    /// Get an invoice by ID.
    fn get(&self, id: InvoiceId) -> Result<Option<Invoice>, RepositoryError>;

    /// All invoices issued for a billing month, in number order.
    fn list_for_month(&self, month: BillingMonth) -> Result<Vec<Invoice>, RepositoryError>;

    /// The invoice already issued to `client_id` for `month`, if any.
    fn find_for_client_month(
        &self,
        client_id: ClientId,
        month: BillingMonth,
    ) -> Result<Option<Invoice>, RepositoryError>;

    /// Persist status/payment changes to an existing invoice.
    fn update(&self, invoice: &Invoice) -> Result<(), RepositoryError>;

    /// Allocate the next invoice sequence for `month` across all clients.
    ///
    /// Atomic: concurrent callers never receive the same sequence, and the
    /// result is never lower than the number of invoices already stored for
    /// the month.
    fn next_sequence(&self, month: BillingMonth) -> Result<u32, RepositoryError>;

    /// The sequence `next_sequence` would return, without allocating it.
    fn peek_sequence(&self, month: BillingMonth) -> Result<u32, RepositoryError>;
}

/// Company billing settings abstraction.
pub trait SettingsProvider: Send + Sync {
    fn get(&self) -> Result<CompanySettings, RepositoryError>;
}

macro_rules! forward_to_arc {
    ($trait_:ident { $(fn $method:ident(&self $(, $arg:ident: $ty:ty)*) -> $ret:ty;)* }) => {
        impl<T: $trait_ + ?Sized> $trait_ for Arc<T> {
            $(fn $method(&self $(, $arg: $ty)*) -> $ret {
                (**self).$method($($arg),*)
            })*
        }
    };
}

forward_to_arc!(ClientRepository {
    fn list_active(&self) -> Result<Vec<Client>, RepositoryError>;
    fn get(&self, id: ClientId) -> Result<Option<Client>, RepositoryError>;
    fn update_ledger(&self, id: ClientId, apply: LedgerUpdate<'_>) -> Result<(), RepositoryError>;
});

forward_to_arc!(InvoiceRepository {
    fn append(&self, invoice: Invoice) -> Result<(), RepositoryError>;
    fn get(&self, id: InvoiceId) -> Result<Option<Invoice>, RepositoryError>;
    fn list_for_month(&self, month: BillingMonth) -> Result<Vec<Invoice>, RepositoryError>;
    fn find_for_client_month(&self, client_id: ClientId, month: BillingMonth) -> Result<Option<Invoice>, RepositoryError>;
    fn update(&self, invoice: &Invoice) -> Result<(), RepositoryError>;
    fn next_sequence(&self, month: BillingMonth) -> Result<u32, RepositoryError>;
    fn peek_sequence(&self, month: BillingMonth) -> Result<u32, RepositoryError>;
});

forward_to_arc!(SettingsProvider {
    fn get(&self) -> Result<CompanySettings, RepositoryError>;
});
