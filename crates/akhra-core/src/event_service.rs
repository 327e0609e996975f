//! Event scheduling and budget-variance reporting.

use akhra_domain::{Books, DateRange, Event, NewEvent, RecordId};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tracing::info;

use crate::{validation, CoreError};

/// Budget and expense totals for one calendar year of events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventBudgetReport {
    pub year: i32,
    pub total_budget: Decimal,
    pub total_expenses: Decimal,
    pub over_budget: Vec<Event>,
}

impl EventBudgetReport {
    pub fn variance(&self) -> Decimal {
        self.total_budget - self.total_expenses
    }
}

pub struct EventService;

impl EventService {
    pub fn add(books: &mut Books, event: NewEvent) -> Result<Event, CoreError> {
        if event.name.trim().is_empty() {
            return Err(CoreError::Validation("event name is required".into()));
        }
        if let Some(budget) = event.budget_amount {
            validation::check_amount("budget", budget)?;
        }
        if let Some(actual) = event.actual_expense {
            validation::check_amount("expense", actual)?;
        }
        let stored = books
            .events
            .insert_with(|id| Event {
                id,
                name: event.name.trim().to_string(),
                event_date: event.event_date,
                budget_amount: event.budget_amount,
                actual_expense: event.actual_expense,
                description: event.description,
            })
            .clone();
        books.touch();
        info!(event_id = stored.id, name = %stored.name, "event added");
        Ok(stored)
    }

    /// Records the actual expense of an event, replacing any earlier figure.
    pub fn record_expense(
        books: &mut Books,
        event_id: RecordId,
        amount: Decimal,
    ) -> Result<(), CoreError> {
        validation::check_amount("expense", amount)?;
        let event = books
            .events
            .get_mut(event_id)
            .ok_or(CoreError::EventNotFound(event_id))?;
        event.actual_expense = Some(amount);
        books.touch();
        Ok(())
    }

    pub fn get(books: &Books, event_id: RecordId) -> Result<&Event, CoreError> {
        books
            .events
            .get(event_id)
            .ok_or(CoreError::EventNotFound(event_id))
    }

    /// Events dated within `range`, earliest first.
    pub fn in_range(books: &Books, range: DateRange) -> Vec<&Event> {
        let mut events = books.events.find(|event| range.contains(event.event_date));
        events.sort_by_key(|event| (event.event_date, event.id));
        events
    }

    /// Events on or after `today`, earliest first.
    pub fn upcoming(books: &Books, today: NaiveDate) -> Vec<&Event> {
        let mut events = books.events.find(|event| event.event_date >= today);
        events.sort_by_key(|event| (event.event_date, event.id));
        events
    }

    /// Events before `today`, most recent first.
    pub fn past(books: &Books, today: NaiveDate) -> Vec<&Event> {
        let mut events = books.events.find(|event| event.event_date < today);
        events.sort_by(|a, b| (b.event_date, b.id).cmp(&(a.event_date, a.id)));
        events
    }

    pub fn total_budget(books: &Books, year: i32) -> Decimal {
        books
            .events
            .iter()
            .filter(|event| event.event_date.year() == year)
            .filter_map(|event| event.budget_amount)
            .sum()
    }

    pub fn total_expenses(books: &Books, year: i32) -> Decimal {
        books
            .events
            .iter()
            .filter(|event| event.event_date.year() == year)
            .filter_map(|event| event.actual_expense)
            .sum()
    }

    /// Events whose actual expense exceeds their budget, most recent first.
    pub fn over_budget(books: &Books) -> Vec<&Event> {
        let mut events = books.events.find(|event| event.is_over_budget());
        events.sort_by(|a, b| (b.event_date, b.id).cmp(&(a.event_date, a.id)));
        events
    }

    pub fn budget_report(books: &Books, year: i32) -> EventBudgetReport {
        EventBudgetReport {
            year,
            total_budget: Self::total_budget(books, year),
            total_expenses: Self::total_expenses(books, year),
            over_budget: Self::over_budget(books)
                .into_iter()
                .filter(|event| event.event_date.year() == year)
                .cloned()
                .collect(),
        }
    }
}
