//! Client contract records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use rebill_core::ClientId;

use crate::fees::FeeSchedule;
use crate::ledger::BillingLedger;

/// How often a client is invoiced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingFrequency {
    Monthly,
    Yearly,
}

/// Whether a client participates in billing runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    Active,
    Archived,
}

/// A billed client contract.
///
/// Owned by the client repository. The billing engine reads the contract
/// fields and mutates only `ledger`, through its named operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub status: ClientStatus,
    pub billing: BillingFrequency,
    /// Date the client's site went live. Unpublished sites are never billed.
    pub site_published_on: Option<NaiveDate>,
    pub contract_ends_on: Option<NaiveDate>,
    /// One-time setup/build charge in smallest currency unit, billed at most
    /// once per client lifetime.
    pub initial_production_cost: Option<i64>,
    pub fees: FeeSchedule,
    pub ledger: BillingLedger,
}

impl Client {
    pub fn is_active(&self) -> bool {
        self.status == ClientStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_and_frequency_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&BillingFrequency::Monthly).unwrap(),
            "\"monthly\""
        );
        assert_eq!(
            serde_json::to_string(&BillingFrequency::Yearly).unwrap(),
            "\"yearly\""
        );
        assert_eq!(
            serde_json::to_string(&ClientStatus::Archived).unwrap(),
            "\"archived\""
        );
    }
}
