//! Unpaid-month counting and billed-period widening.

use rebill_clients::{BillingFrequency, Client};
use rebill_core::{BillingMonth, BillingPeriod, DomainResult};

/// Months charged on a yearly invoice. The contract model treats the twelfth
/// month as free.
pub const YEARLY_BILLED_MONTHS: u32 = 11;

/// Consecutive service months accrued without a confirmed payment, counting
/// back from `service` (the month currently being billed).
///
/// Yearly clients always owe exactly one annual invoice. Monthly clients with
/// no payment history owe their first month. Zero means nothing has accrued
/// since the last paid period, and the run skips the client.
pub fn unpaid_months(client: &Client, service: BillingMonth) -> u32 {
    match client.billing {
        BillingFrequency::Yearly => 1,
        BillingFrequency::Monthly => match client.ledger.last_paid_period() {
            None => 1,
            Some(last_paid) => service.months_since(last_paid).max(0) as u32,
        },
    }
}

/// Billed span ending with `service`, widened backward so that `unpaid`
/// calendar months are covered.
pub fn billed_period(service: BillingMonth, unpaid: u32) -> DomainResult<BillingPeriod> {
    let months_back = unpaid.saturating_sub(1);
    BillingPeriod::spanning(service.minus_months(months_back), service)
}

/// Multiplier applied to the base monthly fee.
pub fn fee_multiplier(billing: BillingFrequency, unpaid: u32) -> u32 {
    match billing {
        BillingFrequency::Monthly => unpaid,
        BillingFrequency::Yearly => YEARLY_BILLED_MONTHS,
    }
}
