//! Calendar billing month value object.

use core::fmt;
use core::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A calendar month, the unit billing runs and ledgers are keyed by.
///
/// Serialized as `"YYYY-MM"`. Supported years are 0001 through 9999; month
/// arithmetic saturates at those bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BillingMonth {
    year: i32,
    month: u32,
}

const MIN_LINEAR: i64 = 12; // 0001-01
const MAX_LINEAR: i64 = 9999 * 12 + 11; // 9999-12

impl BillingMonth {
    pub fn new(year: i32, month: u32) -> DomainResult<Self> {
        if !(1..=9999).contains(&year) {
            return Err(DomainError::validation(format!(
                "year {year} outside supported range 1..=9999"
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(DomainError::validation(format!(
                "month {month} outside 1..=12"
            )));
        }
        Ok(Self { year, month })
    }

    /// Month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year().clamp(1, 9999),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn prev(self) -> Self {
        self.minus_months(1)
    }

    pub fn next(self) -> Self {
        self.plus_months(1)
    }

    pub fn plus_months(self, months: u32) -> Self {
        self.offset(months as i64)
    }

    pub fn minus_months(self, months: u32) -> Self {
        self.offset(-(months as i64))
    }

    fn offset(self, delta: i64) -> Self {
        let linear = (self.year as i64 * 12 + (self.month as i64 - 1) + delta)
            .clamp(MIN_LINEAR, MAX_LINEAR);
        Self {
            year: linear.div_euclid(12) as i32,
            month: (linear.rem_euclid(12) + 1) as u32,
        }
    }

    /// Signed number of months from `earlier` to `self` (positive when `self`
    /// is later).
    pub fn months_since(self, earlier: Self) -> i32 {
        (self.year - earlier.year) * 12 + (self.month as i32 - earlier.month as i32)
    }

    pub fn first_day(self) -> NaiveDate {
        // Year and month are validated on construction.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("validated billing month")
    }

    pub fn last_day(self) -> NaiveDate {
        self.first_day()
            .checked_add_months(Months::new(1))
            .and_then(|d| d.pred_opt())
            .expect("validated billing month")
    }
}

impl fmt::Display for BillingMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for BillingMonth {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || DomainError::validation(format!("expected YYYY-MM, got {s:?}"));
        let (year, month) = s.split_once('-').ok_or_else(malformed)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(malformed());
        }
        let year: i32 = year.parse().map_err(|_| malformed())?;
        let month: u32 = month.parse().map_err(|_| malformed())?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for BillingMonth {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BillingMonth> for String {
    fn from(value: BillingMonth) -> Self {
        value.to_string()
    }
}
