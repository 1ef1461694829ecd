//! Billed service period.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::month::BillingMonth;

/// Span of service covered by a single invoice.
///
/// Normally one calendar month; wider when proration folds unpaid months in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl BillingPeriod {
    /// Invariant: `start <= end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> DomainResult<Self> {
        if start > end {
            return Err(DomainError::validation(format!(
                "period start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Full calendar month span.
    pub fn for_month(month: BillingMonth) -> Self {
        Self {
            start: month.first_day(),
            end: month.last_day(),
        }
    }

    /// First day of `from` through last day of `to`.
    pub fn spanning(from: BillingMonth, to: BillingMonth) -> DomainResult<Self> {
        Self::new(from.first_day(), to.last_day())
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Month containing the period's last day.
    pub fn end_month(&self) -> BillingMonth {
        BillingMonth::from_date(self.end)
    }
}
