//! Cash book rows with their denormalized running balance.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::{Identifiable, Record, RecordId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CashBookEntry {
    pub id: RecordId,
    pub entry_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub debit: Option<Decimal>,
    #[serde(default)]
    pub credit: Option<Decimal>,
    /// Running balance computed when the row was appended.
    pub balance: Decimal,
}

impl CashBookEntry {
    pub fn movement(&self) -> Decimal {
        self.debit.unwrap_or(Decimal::ZERO) - self.credit.unwrap_or(Decimal::ZERO)
    }
}

impl Identifiable for CashBookEntry {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Record for CashBookEntry {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCashBookEntry {
    pub entry_date: NaiveDate,
    pub description: Option<String>,
    pub debit: Option<Decimal>,
    pub credit: Option<Decimal>,
}

impl NewCashBookEntry {
    pub fn new(entry_date: NaiveDate, debit: Option<Decimal>, credit: Option<Decimal>) -> Self {
        Self {
            entry_date,
            description: None,
            debit,
            credit,
        }
    }

    /// Cash coming in.
    pub fn receipt(entry_date: NaiveDate, amount: Decimal) -> Self {
        Self::new(entry_date, Some(amount), None)
    }

    /// Cash going out.
    pub fn payment(entry_date: NaiveDate, amount: Decimal) -> Self {
        Self::new(entry_date, None, Some(amount))
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn movement(&self) -> Decimal {
        self.debit.unwrap_or(Decimal::ZERO) - self.credit.unwrap_or(Decimal::ZERO)
    }
}
