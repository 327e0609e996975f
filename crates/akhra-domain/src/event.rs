//! Association events and their budgets.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::{Identifiable, Record, RecordId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    pub id: RecordId,
    pub name: String,
    pub event_date: NaiveDate,
    #[serde(default)]
    pub budget_amount: Option<Decimal>,
    #[serde(default)]
    pub actual_expense: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Event {
    /// Budget minus actual expense, when both are known.
    pub fn budget_variance(&self) -> Option<Decimal> {
        Some(self.budget_amount? - self.actual_expense?)
    }

    pub fn is_over_budget(&self) -> bool {
        matches!(
            (self.budget_amount, self.actual_expense),
            (Some(budget), Some(actual)) if actual > budget
        )
    }
}

impl Identifiable for Event {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Record for Event {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub name: String,
    pub event_date: NaiveDate,
    pub budget_amount: Option<Decimal>,
    pub actual_expense: Option<Decimal>,
    pub description: Option<String>,
}

impl NewEvent {
    pub fn new(name: impl Into<String>, event_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            event_date,
            budget_amount: None,
            actual_expense: None,
            description: None,
        }
    }

    pub fn with_budget(mut self, amount: Decimal) -> Self {
        self.budget_amount = Some(amount);
        self
    }

    pub fn with_actual_expense(mut self, amount: Decimal) -> Self {
        self.actual_expense = Some(amount);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn event(budget: Option<Decimal>, actual: Option<Decimal>) -> Event {
        Event {
            id: 1,
            name: "Picnic".into(),
            event_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            budget_amount: budget,
            actual_expense: actual,
            description: None,
        }
    }

    #[test]
    fn variance_requires_both_amounts() {
        assert_eq!(
            event(Some(dec!(500)), Some(dec!(650))).budget_variance(),
            Some(dec!(-150))
        );
        assert_eq!(event(Some(dec!(500)), None).budget_variance(), None);
    }

    #[test]
    fn over_budget_only_when_actual_exceeds_budget() {
        assert!(event(Some(dec!(500)), Some(dec!(500.01))).is_over_budget());
        assert!(!event(Some(dec!(500)), Some(dec!(500))).is_over_budget());
        assert!(!event(None, Some(dec!(10))).is_over_budget());
    }
}
