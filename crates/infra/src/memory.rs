//! In-memory repository implementations for tests, benches, and dev runs.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use rebill_clients::Client;
use rebill_core::{BillingMonth, ClientId, InvoiceId};
use rebill_engine::ports::{
    ClientRepository, InvoiceRepository, LedgerUpdate, RepositoryError, SettingsProvider,
};
use rebill_engine::schedule::CompanySettings;
use rebill_invoicing::Invoice;

/// In-memory client store.
#[derive(Debug)]
pub struct InMemoryClientRepository {
    clients: RwLock<HashMap<ClientId, Client>>,
}

impl InMemoryClientRepository {
    pub fn new() -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
        }
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Seed a client record, replacing any existing one with the same id.
    pub fn insert(&self, client: Client) {
        self.clients.write().unwrap().insert(client.id, client);
    }
}

impl Default for InMemoryClientRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientRepository for InMemoryClientRepository {
    fn list_active(&self) -> Result<Vec<Client>, RepositoryError> {
        let clients = self.clients.read().unwrap();
        let mut result: Vec<_> = clients
            .values()
            .filter(|c| c.is_active())
            .cloned()
            .collect();

        // Name alone is not unique, so the id breaks ties.
        result.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        Ok(result)
    }

    fn get(&self, id: ClientId) -> Result<Option<Client>, RepositoryError> {
        Ok(self.clients.read().unwrap().get(&id).cloned())
    }

    fn update_ledger(&self, id: ClientId, apply: LedgerUpdate<'_>) -> Result<(), RepositoryError> {
        // The closure runs under the write lock, against the stored ledger.
        let mut clients = self.clients.write().unwrap();
        let client = clients
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        apply(&mut client.ledger)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct InvoiceState {
    invoices: HashMap<InvoiceId, Invoice>,
    sequences: HashMap<BillingMonth, u32>,
}

/// In-memory invoice store.
///
/// Invoices and the per-month sequence counters live behind one lock, so a
/// sequence allocation and the insert it numbers can never interleave with
/// another writer.
#[derive(Debug)]
pub struct InMemoryInvoiceRepository {
    state: RwLock<InvoiceState>,
}

impl InMemoryInvoiceRepository {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(InvoiceState::default()),
        }
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn sequence_for(state: &InvoiceState, month: BillingMonth) -> u32 {
        let counter = state.sequences.get(&month).copied().unwrap_or(0);
        let stored = state
            .invoices
            .values()
            .filter(|i| i.billing_month() == month)
            .count() as u32;
        counter.max(stored) + 1
    }
}

impl Default for InMemoryInvoiceRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceRepository for InMemoryInvoiceRepository {
    fn append(&self, invoice: Invoice) -> Result<(), RepositoryError> {
        let mut state = self.state.write().unwrap();
        if state.invoices.contains_key(&invoice.id()) {
            return Err(RepositoryError::Duplicate(format!(
                "invoice {}",
                invoice.id()
            )));
        }
        if state.invoices.values().any(|i| i.number() == invoice.number()) {
            return Err(RepositoryError::Duplicate(format!(
                "invoice number {}",
                invoice.number()
            )));
        }
        state.invoices.insert(invoice.id(), invoice);
        Ok(())
    }

    fn get(&self, id: InvoiceId) -> Result<Option<Invoice>, RepositoryError> {
        Ok(self.state.read().unwrap().invoices.get(&id).cloned())
    }

    fn list_for_month(&self, month: BillingMonth) -> Result<Vec<Invoice>, RepositoryError> {
        let state = self.state.read().unwrap();
        let mut result: Vec<_> = state
            .invoices
            .values()
            .filter(|i| i.billing_month() == month)
            .cloned()
            .collect();

        result.sort_by(|a, b| a.number().cmp(b.number()));
        Ok(result)
    }

    fn find_for_client_month(
        &self,
        client_id: ClientId,
        month: BillingMonth,
    ) -> Result<Option<Invoice>, RepositoryError> {
        let state = self.state.read().unwrap();
        Ok(state
            .invoices
            .values()
            .find(|i| i.client_id() == client_id && i.billing_month() == month)
            .cloned())
    }

    fn update(&self, invoice: &Invoice) -> Result<(), RepositoryError> {
        let mut state = self.state.write().unwrap();
        if !state.invoices.contains_key(&invoice.id()) {
            return Err(RepositoryError::NotFound(invoice.id().to_string()));
        }
        state.invoices.insert(invoice.id(), invoice.clone());
        Ok(())
    }

    fn next_sequence(&self, month: BillingMonth) -> Result<u32, RepositoryError> {
        let mut state = self.state.write().unwrap();
        let next = Self::sequence_for(&state, month);
        state.sequences.insert(month, next);
        Ok(next)
    }

    fn peek_sequence(&self, month: BillingMonth) -> Result<u32, RepositoryError> {
        let state = self.state.read().unwrap();
        Ok(Self::sequence_for(&state, month))
    }
}

/// Settings provider backed by a fixed value.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSettingsProvider {
    settings: CompanySettings,
}

impl StaticSettingsProvider {
    pub fn new(settings: CompanySettings) -> Self {
        Self { settings }
    }

    pub fn arc(settings: CompanySettings) -> Arc<Self> {
        Arc::new(Self::new(settings))
    }
}

impl SettingsProvider for StaticSettingsProvider {
    fn get(&self) -> Result<CompanySettings, RepositoryError> {
        Ok(self.settings)
    }
}
