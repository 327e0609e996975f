//! Dashboard figures gathered across every service.

use akhra_domain::Books;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::{
    balance_service::BalanceService, event_service::EventService, fee_service::FeeService,
    medicaid_service::MedicaidService, report_service::ReportService, time::Clock,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub as_of: NaiveDate,
    pub total_members: usize,
    pub active_members: usize,
    pub fees_collected_this_year: Decimal,
    pub pending_fees: usize,
    pub upcoming_events: usize,
    pub event_budget_this_year: Decimal,
    pub pending_medicaid_requests: usize,
    pub total_medicaid_approved: Decimal,
    pub cash_balance: Decimal,
    pub month_income: Decimal,
    pub month_expense: Decimal,
    pub month_net: Decimal,
}

pub struct SummaryService;

impl SummaryService {
    pub fn dashboard(books: &Books, clock: &dyn Clock) -> DashboardSummary {
        let today = clock.today();
        let year = today.year();
        let month = ReportService::month_to_date(books, today);
        DashboardSummary {
            as_of: today,
            total_members: books.members.count(),
            active_members: books.members.count_where(|member| member.is_active),
            fees_collected_this_year: FeeService::total_collected(books, year),
            pending_fees: FeeService::pending(books).len(),
            upcoming_events: EventService::upcoming(books, today).len(),
            event_budget_this_year: EventService::total_budget(books, year),
            pending_medicaid_requests: MedicaidService::pending(books).len(),
            total_medicaid_approved: MedicaidService::total_approved(books),
            cash_balance: BalanceService::cash_balance(books),
            month_income: month.statement.total_income,
            month_expense: month.statement.total_expense,
            month_net: month.statement.net_income(),
        }
    }
}
