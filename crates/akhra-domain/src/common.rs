//! Shared identifiers, record traits, and date/amount helpers.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identity value allocated by a [`Table`](crate::table::Table) sequence.
pub type RecordId = u64;

/// Number of fractional digits stored for every amount column.
pub const AMOUNT_SCALE: u32 = 2;

/// Total significant digits available to an amount column (`decimal(10,2)`).
pub const AMOUNT_PRECISION: u32 = 10;

/// Exposes a stable identifier for entities stored in the books.
pub trait Identifiable {
    fn id(&self) -> RecordId;
}

/// A row that can live in a [`Table`](crate::table::Table).
///
/// The default hooks describe a hard-deleted record. Types that keep their rows
/// after deletion override both methods.
pub trait Record: Identifiable + Clone {
    fn is_deleted(&self) -> bool {
        false
    }

    /// Flags the record as deleted. Returns `false` when the type has no soft-delete flag.
    fn mark_deleted(&mut self) -> bool {
        false
    }
}

/// Identity of the person responsible for a write.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct UserId(pub RecordId);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user:{}", self.0)
    }
}

/// Returns `true` when `amount` fits a `decimal(10,2)` column.
pub fn fits_amount_column(amount: Decimal) -> bool {
    if amount.normalize().scale() > AMOUNT_SCALE {
        return false;
    }
    let limit = Decimal::from(10_i64.pow(AMOUNT_PRECISION - AMOUNT_SCALE));
    amount.abs() < limit
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
/// Inclusive reporting window over entry dates.
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if end < start {
            return Err(DateRangeError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    /// Range from the first day of `today`'s month through `today`.
    pub fn month_to_date(today: NaiveDate) -> Self {
        let start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);
        Self { start, end: today }
    }

    /// Range covering the calendar year.
    pub fn calendar_year(year: i32) -> Option<Self> {
        Some(Self {
            start: NaiveDate::from_ymd_opt(year, 1, 1)?,
            end: NaiveDate::from_ymd_opt(year, 12, 31)?,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Errors that can occur when constructing [`DateRange`] values.
pub enum DateRangeError {
    InvalidRange,
}

impl fmt::Display for DateRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateRangeError::InvalidRange => f.write_str("date range end must not precede start"),
        }
    }
}

impl std::error::Error for DateRangeError {}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Raised when text does not name a known enum variant.
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} `{}`", self.kind, self.value)
    }
}

impl std::error::Error for ParseEnumError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn amount_column_accepts_two_decimals() {
        assert!(fits_amount_column(dec!(99999999.99)));
        assert!(fits_amount_column(dec!(10.500)));
        assert!(!fits_amount_column(dec!(0.001)));
        assert!(!fits_amount_column(dec!(100000000)));
    }

    #[test]
    fn date_range_is_inclusive() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let range = DateRange::new(start, end).expect("valid range");
        assert!(range.contains(start));
        assert!(range.contains(end));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));
        assert_eq!(
            DateRange::new(end, start),
            Err(DateRangeError::InvalidRange)
        );
    }

    #[test]
    fn month_to_date_starts_on_the_first() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();
        let range = DateRange::month_to_date(today);
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(range.end, today);
    }

    #[test]
    fn calendar_year_spans_january_to_december() {
        let range = DateRange::calendar_year(2024).expect("valid year");
        assert!(range.contains(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()));
        assert!(DateRange::calendar_year(i32::MAX).is_none());
    }
}
