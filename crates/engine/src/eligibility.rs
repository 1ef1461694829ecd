//! Per-client eligibility for a billing run.

use rebill_clients::{BillingFrequency, Client};
use rebill_core::BillingMonth;

/// Why a client produces no invoice this run. Skips are not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Client is archived and no longer billed.
    Archived,
    /// Site has no publish date yet, or the target month precedes it.
    NotPublished,
    /// Target month is past the contract end.
    ContractEnded,
    /// Yearly client outside its anniversary month.
    OffAnniversary,
    /// Every accrued service month is already confirmed paid.
    NothingOwed,
}

/// First rule that excludes `client` from a run targeting `target`, or
/// `None` when an invoice should be produced.
///
/// `NothingOwed` is decided later, once proration has counted unpaid months.
pub fn skip_reason(client: &Client, target: BillingMonth) -> Option<SkipReason> {
    if !client.is_active() {
        return Some(SkipReason::Archived);
    }

    let Some(published_on) = client.site_published_on else {
        return Some(SkipReason::NotPublished);
    };
    let published = BillingMonth::from_date(published_on);
    if target < published {
        return Some(SkipReason::NotPublished);
    }

    if let Some(ends_on) = client.contract_ends_on {
        if target > BillingMonth::from_date(ends_on) {
            return Some(SkipReason::ContractEnded);
        }
    }

    if client.billing == BillingFrequency::Yearly && target.month() != published.month() {
        return Some(SkipReason::OffAnniversary);
    }

    None
}
