//! Invoice records and payment application.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use rebill_core::{BillingMonth, BillingPeriod, ClientId, DomainError, DomainResult, InvoiceId};

use crate::status::InvoiceStatus;

/// Payment details supplied when an invoice is marked paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    /// Amount actually received, in smallest currency unit.
    pub amount: i64,
    pub received_on: NaiveDate,
}

/// Ledger updates owed to the owning client after a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentReconciliation {
    /// Newest month the payment settles (end month of the billed period).
    pub paid_through: BillingMonth,
    /// `total - paid_amount`, carried into the client's next invoice.
    pub difference: i64,
}

/// Inputs for issuing a new invoice. These become the invoice's immutable
/// terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInvoice {
    pub id: InvoiceId,
    pub client_id: ClientId,
    pub number: String,
    pub billing_month: BillingMonth,
    pub issued_on: NaiveDate,
    pub due_on: NaiveDate,
    pub period: BillingPeriod,
    /// Base recurring fee times the billed-period multiplier.
    pub management_fee: i64,
    /// Signed one-off delta (production cost, carried payment difference).
    pub adjustment: i64,
    pub notes: String,
}

macro_rules! copy_getters {
    ($($field:ident: $ty:ty => $($path:ident).+),* $(,)?) => {
        $(pub fn $field(&self) -> $ty {
            self.$($path).+
        })*
    };
}

/// A persisted invoice.
///
/// The issue terms are immutable; only `status` and the payment fields ever
/// change, and only through the lifecycle methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(flatten)]
    terms: NewInvoice,
    subtotal: i64,
    /// Always zero: the billed service is tax-exempt.
    tax: i64,
    total: i64,
    status: InvoiceStatus,
    paid_amount: Option<i64>,
    payment_difference: Option<i64>,
    paid_on: Option<NaiveDate>,
}

impl Invoice {
    /// Issue a new invoice in the `issued` state.
    ///
    /// Totals are derived here and nowhere else: `subtotal = management_fee +
    /// adjustment`, `total = subtotal` (zero tax).
    pub fn issue(terms: NewInvoice) -> DomainResult<Self> {
        let subtotal = terms
            .management_fee
            .checked_add(terms.adjustment)
            .ok_or_else(|| DomainError::state("invoice subtotal overflow"))?;

        Ok(Self {
            terms,
            subtotal,
            tax: 0,
            total: subtotal,
            status: InvoiceStatus::Issued,
            paid_amount: None,
            payment_difference: None,
            paid_on: None,
        })
    }

    copy_getters! {
        id: InvoiceId => terms.id,
        client_id: ClientId => terms.client_id,
        billing_month: BillingMonth => terms.billing_month,
        issued_on: NaiveDate => terms.issued_on,
        due_on: NaiveDate => terms.due_on,
        period: BillingPeriod => terms.period,
        management_fee: i64 => terms.management_fee,
        adjustment: i64 => terms.adjustment,
        subtotal: i64 => subtotal,
        tax: i64 => tax,
        total: i64 => total,
        status: InvoiceStatus => status,
        paid_amount: Option<i64> => paid_amount,
        payment_difference: Option<i64> => payment_difference,
        paid_on: Option<NaiveDate> => paid_on,
    }

    pub fn number(&self) -> &str {
        &self.terms.number
    }

    pub fn notes(&self) -> &str {
        &self.terms.notes
    }

    /// Apply a payment and move to `paid`.
    ///
    /// Returns the reconciliation the caller must fold into the owning
    /// client's ledger; the invoice itself records the same difference, so a
    /// crashed ledger update can be retried from the persisted invoice.
    pub fn mark_paid(&mut self, receipt: PaymentReceipt) -> DomainResult<PaymentReconciliation> {
        self.ensure_transition(InvoiceStatus::Paid)?;
        if receipt.amount < 0 {
            return Err(DomainError::validation("paid amount must be non-negative"));
        }

        let difference = self
            .total
            .checked_sub(receipt.amount)
            .ok_or_else(|| DomainError::validation("paid amount out of range"))?;

        self.status = InvoiceStatus::Paid;
        self.paid_amount = Some(receipt.amount);
        self.payment_difference = Some(difference);
        self.paid_on = Some(receipt.received_on);

        Ok(PaymentReconciliation {
            paid_through: self.terms.period.end_month(),
            difference,
        })
    }

    pub fn mark_overdue(&mut self) -> DomainResult<()> {
        self.ensure_transition(InvoiceStatus::Overdue)?;
        self.status = InvoiceStatus::Overdue;
        Ok(())
    }

    pub fn cancel(&mut self) -> DomainResult<()> {
        self.ensure_transition(InvoiceStatus::Cancelled)?;
        self.status = InvoiceStatus::Cancelled;
        Ok(())
    }

    fn ensure_transition(&self, next: InvoiceStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::state(format!(
                "cannot transition invoice from {} to {}",
                self.status, next
            )));
        }
        Ok(())
    }
}
