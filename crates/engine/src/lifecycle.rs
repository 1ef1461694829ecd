//! Invoice status transitions and the ledger reconciliation a payment
//! triggers.

use tracing::info;

use rebill_core::{DomainError, InvoiceId};
use rebill_invoicing::{Invoice, InvoiceStatus, PaymentReceipt};

use crate::error::BillingError;
use crate::ports::{ClientRepository, InvoiceRepository};

/// Applies status changes to persisted invoices.
pub struct LifecycleManager<C, I> {
    clients: C,
    invoices: I,
}

impl<C, I> LifecycleManager<C, I>
where
    C: ClientRepository,
    I: InvoiceRepository,
{
    pub fn new(clients: C, invoices: I) -> Self {
        Self { clients, invoices }
    }

    /// Move an invoice to `status` and persist the result.
    ///
    /// A transition to paid requires a receipt and reconciles the owning
    /// client's ledger: the difference between total and paid amount is
    /// carried forward, then the paid-through month advances (a no-op when a
    /// newer invoice was already settled). The receipt is ignored for every
    /// other transition.
    pub fn update_status(
        &self,
        invoice_id: InvoiceId,
        status: InvoiceStatus,
        receipt: Option<PaymentReceipt>,
    ) -> Result<Invoice, BillingError> {
        let mut invoice = self
            .invoices
            .get(invoice_id)?
            .ok_or(DomainError::NotFound)?;

        match status {
            InvoiceStatus::Issued => {
                return Err(DomainError::state("invoice cannot return to issued").into());
            }
            InvoiceStatus::Overdue => {
                invoice.mark_overdue()?;
                self.invoices.update(&invoice)?;
            }
            InvoiceStatus::Cancelled => {
                invoice.cancel()?;
                self.invoices.update(&invoice)?;
            }
            InvoiceStatus::Paid => {
                let receipt =
                    receipt.ok_or_else(|| DomainError::validation("paid amount is required"))?;
                let reconciliation = invoice.mark_paid(receipt)?;
                // The invoice is saved before the ledger is touched so a
                // reconciliation failure never loses a recorded payment.
                self.invoices.update(&invoice)?;

                self.clients
                    .update_ledger(invoice.client_id(), &mut |ledger| {
                        ledger.apply_payment_difference(reconciliation.difference)?;
                        ledger.advance_last_paid_period(reconciliation.paid_through);
                        Ok(())
                    })?;

                info!(
                    invoice = %invoice.number(),
                    client = %invoice.client_id(),
                    difference = reconciliation.difference,
                    paid_through = %reconciliation.paid_through,
                    "payment reconciled"
                );
            }
        }

        Ok(invoice)
    }
}
