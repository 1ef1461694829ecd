//! Billing calendar: service periods and issue/due date rules.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use rebill_core::{BillingMonth, DomainError, DomainResult};

/// The month whose service a run for `target` bills: the prior calendar
/// month. Invoices are issued in `target` itself.
pub fn service_month(target: BillingMonth) -> BillingMonth {
    target.prev()
}

/// When invoices are issued within the target month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueDateRule {
    /// Fixed day, clamped to the month's length.
    DayOfMonth(u32),
    LastDay,
}

/// How the payment due date derives from the issue date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueDateRule {
    EndOfMonth,
    EndOfFollowingMonth,
    NetDays(u32),
}

/// Company-wide billing rules, provided through the settings port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySettings {
    pub issue_rule: IssueDateRule,
    pub due_rule: DueDateRule,
}

impl Default for CompanySettings {
    fn default() -> Self {
        Self {
            issue_rule: IssueDateRule::DayOfMonth(1),
            due_rule: DueDateRule::EndOfMonth,
        }
    }
}

impl CompanySettings {
    /// Issue date for a run targeting `target`.
    pub fn issue_date(&self, target: BillingMonth) -> NaiveDate {
        match self.issue_rule {
            IssueDateRule::DayOfMonth(day) => {
                let day = day.clamp(1, target.last_day().day());
                // Clamped to the month's length above.
                NaiveDate::from_ymd_opt(target.year(), target.month(), day)
                    .expect("day clamped to month length")
            }
            IssueDateRule::LastDay => target.last_day(),
        }
    }

    /// Due date for an invoice issued on `issued_on`.
    pub fn due_date(&self, issued_on: NaiveDate) -> DomainResult<NaiveDate> {
        match self.due_rule {
            DueDateRule::EndOfMonth => Ok(BillingMonth::from_date(issued_on).last_day()),
            DueDateRule::EndOfFollowingMonth => {
                Ok(BillingMonth::from_date(issued_on).next().last_day())
            }
            DueDateRule::NetDays(days) => issued_on
                .checked_add_days(Days::new(days as u64))
                .ok_or_else(|| DomainError::validation("due date out of calendar range")),
        }
    }
}
