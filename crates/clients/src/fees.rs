//! Effective-dated management fee history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One fee revision: the monthly fee that applies from `effective_from` on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeEntry {
    pub effective_from: NaiveDate,
    /// Monthly management fee in smallest currency unit (e.g., cents).
    pub monthly_fee: i64,
}

/// Ordered fee history for one client.
///
/// Entries are kept sorted by `effective_from`; the fee in force on a date is
/// the latest revision not after it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    entries: Vec<FeeEntry>,
}

impl FeeSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-revision schedule effective from `from`.
    pub fn fixed(from: NaiveDate, monthly_fee: i64) -> Self {
        let mut schedule = Self::new();
        schedule.push(FeeEntry {
            effective_from: from,
            monthly_fee,
        });
        schedule
    }

    /// Insert a revision, keeping the history sorted by effective date.
    pub fn push(&mut self, entry: FeeEntry) {
        let at = self
            .entries
            .partition_point(|e| e.effective_from <= entry.effective_from);
        self.entries.insert(at, entry);
    }

    /// Fee in force on `date`.
    ///
    /// Returns `None` when the history is empty or starts after `date`; the
    /// caller decides whether that is a configuration error.
    pub fn fee_at(&self, date: NaiveDate) -> Option<i64> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.effective_from <= date)
            .map(|e| e.monthly_fee)
    }

    pub fn entries(&self) -> &[FeeEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn resolves_latest_revision_not_after_date() {
        let mut fees = FeeSchedule::fixed(date(2024, 1, 1), 10_000);
        fees.push(FeeEntry {
            effective_from: date(2024, 6, 1),
            monthly_fee: 12_000,
        });

        assert_eq!(fees.fee_at(date(2024, 5, 31)), Some(10_000));
        assert_eq!(fees.fee_at(date(2024, 6, 1)), Some(12_000));
        assert_eq!(fees.fee_at(date(2025, 1, 1)), Some(12_000));
    }

    #[test]
    fn returns_none_before_first_revision() {
        let fees = FeeSchedule::fixed(date(2024, 3, 1), 10_000);
        assert_eq!(fees.fee_at(date(2024, 2, 29)), None);
    }

    #[test]
    fn returns_none_on_empty_history() {
        assert_eq!(FeeSchedule::new().fee_at(date(2024, 1, 1)), None);
    }

    #[test]
    fn push_keeps_entries_sorted() {
        let mut fees = FeeSchedule::new();
        fees.push(FeeEntry {
            effective_from: date(2024, 6, 1),
            monthly_fee: 12_000,
        });
        fees.push(FeeEntry {
            effective_from: date(2024, 1, 1),
            monthly_fee: 10_000,
        });

        let starts: Vec<_> = fees.entries().iter().map(|e| e.effective_from).collect();
        assert_eq!(starts, vec![date(2024, 1, 1), date(2024, 6, 1)]);
        assert_eq!(fees.fee_at(date(2024, 3, 1)), Some(10_000));
    }
}
