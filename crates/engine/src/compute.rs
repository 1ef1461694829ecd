//! Pure per-client charge computation shared by preview and generate.

use rebill_clients::{BillingFrequency, Client};
use rebill_core::{BillingMonth, BillingPeriod, DomainError, DomainResult};

use crate::adjustment::{LedgerIntent, adjustment};
use crate::eligibility::{SkipReason, skip_reason};
use crate::proration;
use crate::schedule;

/// A computed charge: everything an invoice needs beyond its identity,
/// number, and dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeComputation {
    pub period: BillingPeriod,
    pub multiplier: u32,
    /// Monthly fee in force at the period start.
    pub base_fee: i64,
    /// `base_fee * multiplier`.
    pub management_fee: i64,
    pub adjustment: i64,
    pub notes: Vec<String>,
    pub intents: Vec<LedgerIntent>,
}

/// Outcome of the pure computation: a charge, or a reasoned skip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChargeDecision {
    Charge(ChargeComputation),
    Skip(SkipReason),
}

/// Decide whether and what to bill `client` in a run targeting `target`.
///
/// Pure: reads the client record, mutates nothing, performs no IO. Preview
/// and generate share this function; only the commit path applies the
/// returned intents.
pub fn compute_charge(client: &Client, target: BillingMonth) -> DomainResult<ChargeDecision> {
    if let Some(reason) = skip_reason(client, target) {
        return Ok(ChargeDecision::Skip(reason));
    }

    let service = schedule::service_month(target);
    let unpaid = proration::unpaid_months(client, service);
    if unpaid == 0 {
        return Ok(ChargeDecision::Skip(SkipReason::NothingOwed));
    }

    let period = proration::billed_period(service, unpaid)?;
    let multiplier = proration::fee_multiplier(client.billing, unpaid);

    // Resolved at the period start so a mid-period fee revision does not
    // retroactively alter an already-started billing span.
    let base_fee = client.fees.fee_at(period.start()).ok_or_else(|| {
        DomainError::configuration(format!(
            "client {} has no fee effective on {}",
            client.name,
            period.start()
        ))
    })?;

    let management_fee = base_fee
        .checked_mul(multiplier as i64)
        .ok_or_else(|| DomainError::state("management fee overflow"))?;

    let mut notes = Vec::new();
    match client.billing {
        BillingFrequency::Monthly if unpaid > 1 => {
            notes.push(format!(
                "covers {unpaid} unpaid months ({} to {})",
                period.start(),
                period.end()
            ));
        }
        BillingFrequency::Yearly => {
            notes.push(format!(
                "annual billing: {multiplier} months charged, 1 month free"
            ));
        }
        _ => {}
    }

    let adjustment = adjustment(client)?;
    notes.extend(adjustment.notes);

    Ok(ChargeDecision::Charge(ChargeComputation {
        period,
        multiplier,
        base_fee,
        management_fee,
        adjustment: adjustment.amount,
        notes,
        intents: adjustment.intents,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rebill_clients::{BillingLedger, ClientStatus, FeeSchedule};
    use rebill_core::ClientId;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn month(y: i32, m: u32) -> BillingMonth {
        BillingMonth::new(y, m).unwrap()
    }

    fn base_client() -> Client {
        Client {
            id: ClientId::new(),
            name: "Acme Web".to_string(),
            status: ClientStatus::Active,
            billing: BillingFrequency::Monthly,
            site_published_on: Some(date(2024, 1, 10)),
            contract_ends_on: None,
            initial_production_cost: None,
            fees: FeeSchedule::fixed(date(2024, 1, 1), 10_000),
            ledger: BillingLedger::new(),
        }
    }

    fn charge(decision: ChargeDecision) -> ChargeComputation {
        match decision {
            ChargeDecision::Charge(c) => c,
            ChargeDecision::Skip(reason) => panic!("expected charge, got skip: {reason:?}"),
        }
    }

    #[test]
    fn prorated_charge_multiplies_the_fee() {
        let mut client = base_client();
        client
            .ledger
            .advance_last_paid_period(month(2024, 10));

        let c = charge(compute_charge(&client, month(2025, 2)).unwrap());
        assert_eq!(c.multiplier, 3);
        assert_eq!(c.base_fee, 10_000);
        assert_eq!(c.management_fee, 30_000);
        assert_eq!(c.period.start(), date(2024, 11, 1));
        assert_eq!(c.period.end(), date(2025, 1, 31));
        assert_eq!(c.adjustment, 0);
        assert!(c.intents.is_empty());
        assert!(c.notes[0].contains("3 unpaid months"));
    }

    #[test]
    fn fee_is_resolved_at_the_widened_period_start() {
        let mut client = base_client();
        client
            .ledger
            .advance_last_paid_period(month(2024, 10));
        // Revision effective mid-span must not apply: the span started at
        // 2024-11-01 under the old fee.
        client.fees.push(rebill_clients::FeeEntry {
            effective_from: date(2024, 12, 1),
            monthly_fee: 99_000,
        });

        let c = charge(compute_charge(&client, month(2025, 2)).unwrap());
        assert_eq!(c.base_fee, 10_000);
    }

    #[test]
    fn missing_fee_history_is_a_configuration_error() {
        let mut client = base_client();
        client.fees = FeeSchedule::new();

        let err = compute_charge(&client, month(2025, 2)).unwrap_err();
        assert!(matches!(err, DomainError::Configuration(_)));
    }

    #[test]
    fn fully_paid_client_is_skipped_not_billed() {
        let mut client = base_client();
        client
            .ledger
            .advance_last_paid_period(month(2025, 1));

        let decision = compute_charge(&client, month(2025, 2)).unwrap();
        assert_eq!(decision, ChargeDecision::Skip(SkipReason::NothingOwed));
    }

    #[test]
    fn yearly_charge_bills_eleven_months() {
        let mut client = base_client();
        client.billing = BillingFrequency::Yearly;

        let c = charge(compute_charge(&client, month(2025, 1)).unwrap());
        assert_eq!(c.multiplier, 11);
        assert_eq!(c.management_fee, 110_000);
        assert_eq!(c.period.start(), date(2024, 12, 1));
        assert_eq!(c.period.end(), date(2024, 12, 31));
        assert!(c.notes[0].contains("1 month free"));
    }

    #[test]
    fn production_cost_and_carried_balance_reach_the_charge() {
        let mut client = base_client();
        client.initial_production_cost = Some(80_000);
        client.ledger.apply_payment_difference(5_000).unwrap();

        let c = charge(compute_charge(&client, month(2025, 2)).unwrap());
        assert_eq!(c.management_fee, 10_000);
        assert_eq!(c.adjustment, 75_000);
        assert_eq!(
            c.intents,
            vec![
                LedgerIntent::MarkProductionInvoiced,
                LedgerIntent::ClearAccumulatedDifference,
            ]
        );
        assert_eq!(c.notes.len(), 2);
    }
}
