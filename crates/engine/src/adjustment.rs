//! One-off invoice adjustments and the ledger writes they imply.

use rebill_clients::Client;
use rebill_core::{DomainError, DomainResult};

/// Ledger mutation a computed charge requires at commit time.
///
/// Preview discards these; only the generate path applies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerIntent {
    /// Flip the one-time production flag after the cost is billed.
    MarkProductionInvoiced,
    /// Zero the carried payment difference after it is folded in.
    ClearAccumulatedDifference,
}

/// Signed one-off delta for an invoice, with its audit notes and the ledger
/// writes owed at commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Adjustment {
    pub amount: i64,
    pub notes: Vec<String>,
    pub intents: Vec<LedgerIntent>,
}

/// Compute the one-off adjustment for `client`.
///
/// Adds the initial production cost if it has never been billed, then
/// subtracts the carried payment difference (a positive carried balance
/// reduces this invoice, a negative one increases it).
pub fn adjustment(client: &Client) -> DomainResult<Adjustment> {
    let mut result = Adjustment::default();

    if !client.ledger.has_invoiced_production() {
        if let Some(cost) = client.initial_production_cost {
            result.amount = result
                .amount
                .checked_add(cost)
                .ok_or_else(|| DomainError::state("adjustment overflow"))?;
            result
                .notes
                .push(format!("includes initial production cost of {cost}"));
            result.intents.push(LedgerIntent::MarkProductionInvoiced);
        }
    }

    let carried = client.ledger.accumulated_difference();
    if carried != 0 {
        result.amount = result
            .amount
            .checked_sub(carried)
            .ok_or_else(|| DomainError::state("adjustment overflow"))?;
        let direction = if carried > 0 { "deducted" } else { "added" };
        result.notes.push(format!(
            "carried payment difference of {} {direction}",
            carried.abs()
        ));
        result.intents.push(LedgerIntent::ClearAccumulatedDifference);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rebill_clients::{BillingFrequency, BillingLedger, ClientStatus, FeeSchedule};
    use rebill_core::ClientId;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn client(production_cost: Option<i64>, ledger: BillingLedger) -> Client {
        Client {
            id: ClientId::new(),
            name: "Acme Web".to_string(),
            status: ClientStatus::Active,
            billing: BillingFrequency::Monthly,
            site_published_on: Some(date(2024, 1, 1)),
            contract_ends_on: None,
            initial_production_cost: production_cost,
            fees: FeeSchedule::fixed(date(2024, 1, 1), 10_000),
            ledger,
        }
    }

    #[test]
    fn production_cost_is_added_until_marked_invoiced() {
        let fresh = client(Some(80_000), BillingLedger::new());
        let adj = adjustment(&fresh).unwrap();
        assert_eq!(adj.amount, 80_000);
        assert_eq!(adj.intents, vec![LedgerIntent::MarkProductionInvoiced]);
        assert_eq!(adj.notes.len(), 1);
        assert!(adj.notes[0].contains("production cost"));

        let mut billed_ledger = BillingLedger::new();
        billed_ledger.mark_production_invoiced().unwrap();
        let billed = client(Some(80_000), billed_ledger);
        let adj = adjustment(&billed).unwrap();
        assert_eq!(adj.amount, 0);
        assert!(adj.intents.is_empty());
        assert!(adj.notes.is_empty());
    }

    #[test]
    fn no_production_cost_configured_means_no_adjustment() {
        let adj = adjustment(&client(None, BillingLedger::new())).unwrap();
        assert_eq!(adj, Adjustment::default());
    }

    #[test]
    fn positive_carried_balance_reduces_the_invoice() {
        let mut ledger = BillingLedger::new();
        ledger.apply_payment_difference(1_000).unwrap();

        let adj = adjustment(&client(None, ledger)).unwrap();
        assert_eq!(adj.amount, -1_000);
        assert_eq!(adj.intents, vec![LedgerIntent::ClearAccumulatedDifference]);
        assert!(adj.notes[0].contains("1000 deducted"));
    }

    #[test]
    fn negative_carried_balance_increases_the_invoice() {
        let mut ledger = BillingLedger::new();
        ledger.apply_payment_difference(-1_000).unwrap();

        let adj = adjustment(&client(None, ledger)).unwrap();
        assert_eq!(adj.amount, 1_000);
        assert!(adj.notes[0].contains("1000 added"));
    }

    #[test]
    fn production_cost_and_carried_balance_combine() {
        let mut ledger = BillingLedger::new();
        ledger.apply_payment_difference(5_000).unwrap();

        let adj = adjustment(&client(Some(80_000), ledger)).unwrap();
        assert_eq!(adj.amount, 75_000);
        assert_eq!(
            adj.intents,
            vec![
                LedgerIntent::MarkProductionInvoiced,
                LedgerIntent::ClearAccumulatedDifference,
            ]
        );
        assert_eq!(adj.notes.len(), 2);
    }
}
