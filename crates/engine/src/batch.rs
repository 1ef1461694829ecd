//! Batch invoice generation: non-mutating preview and committing generate.

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

use rebill_clients::Client;
use rebill_core::{BillingMonth, ClientId, DomainError, InvoiceId};
use rebill_invoicing::{Invoice, NewInvoice};

use crate::adjustment::LedgerIntent;
use crate::compute::{ChargeDecision, compute_charge};
use crate::error::BillingError;
use crate::numbering::invoice_number;
use crate::ports::{ClientRepository, InvoiceRepository, SettingsProvider};

/// Manual issue/due date override for a commit run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomDates {
    pub issued_on: NaiveDate,
    pub due_on: NaiveDate,
}

/// One client's failure within a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchError {
    pub client_id: ClientId,
    pub client_name: String,
    pub error: BillingError,
}

/// Result of a batch run.
///
/// Per-client failures land in `errors` while the rest of the batch
/// proceeds; an outcome with no invoices and no errors means no client was
/// eligible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub success_count: usize,
    pub error_count: usize,
    pub errors: Vec<BatchError>,
    pub invoices: Vec<Invoice>,
}

/// Orchestrates billing runs over the repository ports.
pub struct BatchGenerator<C, I, S> {
    clients: C,
    invoices: I,
    settings: S,
}

impl<C, I, S> BatchGenerator<C, I, S>
where
    C: ClientRepository,
    I: InvoiceRepository,
    S: SettingsProvider,
{
    pub fn new(clients: C, invoices: I, settings: S) -> Self {
        Self {
            clients,
            invoices,
            settings,
        }
    }

    /// Compute the invoices a run would produce, persisting nothing and
    /// mutating nothing. Repeated previews return identical outcomes.
    pub fn preview(
        &self,
        target: BillingMonth,
        selection: Option<&[ClientId]>,
    ) -> Result<BatchOutcome, BillingError> {
        self.run(target, selection, None, false)
    }

    /// Compute, persist, and apply ledger updates for a run.
    ///
    /// Failures are isolated per client: one client's error never rolls back
    /// another client's committed invoice. `custom_dates` override the
    /// settings-derived issue/due dates verbatim.
    pub fn generate(
        &self,
        target: BillingMonth,
        selection: Option<&[ClientId]>,
        custom_dates: Option<CustomDates>,
    ) -> Result<BatchOutcome, BillingError> {
        self.run(target, selection, custom_dates, true)
    }

    /// Shared driver for both run kinds. Only the commit path allocates
    /// sequences, persists invoices, and applies ledger intents; a preview
    /// numbers its candidates from a peeked sequence and nil ids.
    fn run(
        &self,
        target: BillingMonth,
        selection: Option<&[ClientId]>,
        custom_dates: Option<CustomDates>,
        commit: bool,
    ) -> Result<BatchOutcome, BillingError> {
        let (issued_on, due_on) = match custom_dates {
            Some(dates) => (dates.issued_on, dates.due_on),
            None => {
                let settings = self.settings.get()?;
                let issued_on = settings.issue_date(target);
                (issued_on, settings.due_date(issued_on)?)
            }
        };

        let (clients, mut errors) = self.roster(selection)?;
        let peeked = if commit {
            0
        } else {
            self.invoices.peek_sequence(target)?
        };

        let mut invoices: Vec<Invoice> = Vec::new();
        for client in &clients {
            let preview_sequence = peeked + invoices.len() as u32;
            match self.produce_one(client, target, issued_on, due_on, commit, preview_sequence) {
                Ok(None) => {}
                Ok(Some(invoice)) => invoices.push(invoice),
                Err(error) => {
                    warn!(client = %client.id, error = %error, "client failed in billing run");
                    errors.push(BatchError {
                        client_id: client.id,
                        client_name: client.name.clone(),
                        error,
                    });
                }
            }
        }

        info!(
            target = %target,
            commit,
            produced = invoices.len(),
            errors = errors.len(),
            "billing run finished"
        );
        Ok(BatchOutcome {
            success_count: invoices.len(),
            error_count: errors.len(),
            errors,
            invoices,
        })
    }

    /// Clients a run operates on. Unknown ids become per-client errors
    /// rather than aborting the run.
    fn roster(
        &self,
        selection: Option<&[ClientId]>,
    ) -> Result<(Vec<Client>, Vec<BatchError>), BillingError> {
        let Some(ids) = selection else {
            return Ok((self.clients.list_active()?, Vec::new()));
        };

        let mut clients = Vec::with_capacity(ids.len());
        let mut errors = Vec::new();
        for &id in ids {
            match self.clients.get(id) {
                Ok(Some(client)) => clients.push(client),
                Ok(None) => errors.push(unknown_client(id, DomainError::not_found().into())),
                Err(error) => errors.push(unknown_client(id, error.into())),
            }
        }
        Ok((clients, errors))
    }

    /// One client's share of a run: compute, guard against a duplicate
    /// invoice, and either persist (commit) or number a candidate (preview).
    /// `None` is a reasoned skip.
    fn produce_one(
        &self,
        client: &Client,
        target: BillingMonth,
        issued_on: NaiveDate,
        due_on: NaiveDate,
        commit: bool,
        preview_sequence: u32,
    ) -> Result<Option<Invoice>, BillingError> {
        let charge = match compute_charge(client, target)? {
            ChargeDecision::Skip(reason) => {
                debug!(client = %client.id, reason = ?reason, "client skipped");
                return Ok(None);
            }
            ChargeDecision::Charge(charge) => charge,
        };
        if self
            .invoices
            .find_for_client_month(client.id, target)?
            .is_some()
        {
            return Err(DomainError::state(format!("client already invoiced for {target}")).into());
        }

        // Candidates stay unsaved under a nil id; a real id and an allocated
        // sequence exist only on the commit path.
        let (id, sequence) = if commit {
            (InvoiceId::new(), self.invoices.next_sequence(target)?)
        } else {
            (InvoiceId::from_uuid(Uuid::nil()), preview_sequence)
        };
        let intents = charge.intents.clone();
        let invoice = Invoice::issue(NewInvoice {
            id,
            client_id: client.id,
            number: invoice_number(target, sequence),
            billing_month: target,
            issued_on,
            due_on,
            period: charge.period,
            management_fee: charge.management_fee,
            adjustment: charge.adjustment,
            notes: charge.notes.join("; "),
        })?;

        if commit {
            // Invoice first, ledger second: a failure between the two leaves
            // a persisted invoice and an unapplied ledger update, never the
            // reverse.
            self.invoices.append(invoice.clone())?;
            self.apply_intents(client.id, &intents)?;
            info!(
                client = %client.id,
                number = %invoice.number(),
                total = invoice.total(),
                "invoice generated"
            );
        }
        Ok(Some(invoice))
    }

    fn apply_intents(&self, id: ClientId, intents: &[LedgerIntent]) -> Result<(), BillingError> {
        if intents.is_empty() {
            return Ok(());
        }
        self.clients.update_ledger(id, &mut |ledger| {
            for intent in intents {
                match intent {
                    LedgerIntent::MarkProductionInvoiced => ledger.mark_production_invoiced()?,
                    LedgerIntent::ClearAccumulatedDifference => {
                        ledger.take_accumulated_difference();
                    }
                }
            }
            Ok(())
        })?;
        Ok(())
    }
}

fn unknown_client(id: ClientId, error: BillingError) -> BatchError {
    BatchError {
        client_id: id,
        client_name: "unknown".to_string(),
        error,
    }
}
