//! Per-client billing ledger.

use serde::{Deserialize, Serialize};

use rebill_core::{BillingMonth, DomainError, DomainResult};

/// Billing state carried between invoices for one client.
///
/// All mutation goes through the named operations; callers never write fields
/// directly, so the monotonicity invariants stay auditable in one place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingLedger {
    has_invoiced_production: bool,
    last_paid_period: Option<BillingMonth>,
    /// Running signed total of reconciled `total - paid` differences, in
    /// smallest currency unit. Reset to zero when folded into a new invoice.
    accumulated_difference: i64,
}

impl BillingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_invoiced_production(&self) -> bool {
        self.has_invoiced_production
    }

    pub fn last_paid_period(&self) -> Option<BillingMonth> {
        self.last_paid_period
    }

    pub fn accumulated_difference(&self) -> i64 {
        self.accumulated_difference
    }

    /// Record that the one-time production cost has been put on an invoice.
    ///
    /// The flag flips `false -> true` exactly once and never back.
    pub fn mark_production_invoiced(&mut self) -> DomainResult<()> {
        if self.has_invoiced_production {
            return Err(DomainError::state("production cost already invoiced"));
        }
        self.has_invoiced_production = true;
        Ok(())
    }

    /// Advance the newest month whose service is confirmed paid.
    ///
    /// Never regresses: a month at or before the current one is an idempotent
    /// no-op, so payments reconciled out of order cannot move it back.
    pub fn advance_last_paid_period(&mut self, month: BillingMonth) {
        self.last_paid_period = Some(match self.last_paid_period {
            Some(current) => current.max(month),
            None => month,
        });
    }

    /// Fold one reconciled payment difference into the carried balance.
    pub fn apply_payment_difference(&mut self, difference: i64) -> DomainResult<()> {
        self.accumulated_difference = self
            .accumulated_difference
            .checked_add(difference)
            .ok_or_else(|| DomainError::state("accumulated difference overflow"))?;
        Ok(())
    }

    /// Consume the carried balance, resetting it to zero.
    pub fn take_accumulated_difference(&mut self) -> i64 {
        std::mem::take(&mut self.accumulated_difference)
    }
}
