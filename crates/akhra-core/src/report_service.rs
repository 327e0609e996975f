//! Trial balance and income statement views over posted lines.

use akhra_domain::{AccountType, Books, DateRange, RecordId};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::balance_service::BalanceService;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialBalanceRow {
    pub account_id: RecordId,
    pub account_name: String,
    pub account_type: AccountType,
    pub debits: Decimal,
    pub credits: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialBalance {
    pub rows: Vec<TrialBalanceRow>,
    pub total_debits: Decimal,
    pub total_credits: Decimal,
}

impl TrialBalance {
    pub fn is_balanced(&self) -> bool {
        self.total_debits == self.total_credits
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncomeStatement {
    pub range: DateRange,
    pub total_income: Decimal,
    pub total_expense: Decimal,
}

impl IncomeStatement {
    pub fn net_income(&self) -> Decimal {
        self.total_income - self.total_expense
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthToDate {
    pub statement: IncomeStatement,
    pub cash_balance: Decimal,
}

pub struct ReportService;

impl ReportService {
    /// One row per account, ordered by account id, active or not.
    pub fn trial_balance(books: &Books) -> TrialBalance {
        let mut accounts: Vec<_> = books.accounts.iter().collect();
        accounts.sort_by_key(|account| account.id);
        let rows: Vec<TrialBalanceRow> = accounts
            .into_iter()
            .map(|account| {
                let totals = BalanceService::account_totals(books, account.id);
                TrialBalanceRow {
                    account_id: account.id,
                    account_name: account.name.clone(),
                    account_type: account.account_type,
                    debits: totals.debits,
                    credits: totals.credits,
                    balance: totals.balance(),
                }
            })
            .collect();
        let total_debits = rows.iter().map(|row| row.debits).sum();
        let total_credits = rows.iter().map(|row| row.credits).sum();
        TrialBalance {
            rows,
            total_debits,
            total_credits,
        }
    }

    /// Credits on Income accounts dated within `range`.
    pub fn total_income(books: &Books, range: DateRange) -> Decimal {
        Self::sum_for_type(books, range, AccountType::Income, |_, credit| credit)
    }

    /// Debits on Expense accounts dated within `range`.
    pub fn total_expense(books: &Books, range: DateRange) -> Decimal {
        Self::sum_for_type(books, range, AccountType::Expense, |debit, _| debit)
    }

    pub fn net_income(books: &Books, range: DateRange) -> Decimal {
        Self::income_statement(books, range).net_income()
    }

    pub fn income_statement(books: &Books, range: DateRange) -> IncomeStatement {
        IncomeStatement {
            range,
            total_income: Self::total_income(books, range),
            total_expense: Self::total_expense(books, range),
        }
    }

    pub fn month_to_date(books: &Books, today: NaiveDate) -> MonthToDate {
        MonthToDate {
            statement: Self::income_statement(books, DateRange::month_to_date(today)),
            cash_balance: BalanceService::cash_balance(books),
        }
    }

    fn sum_for_type<F>(books: &Books, range: DateRange, account_type: AccountType, pick: F) -> Decimal
    where
        F: Fn(Decimal, Decimal) -> Decimal,
    {
        books
            .transactions
            .iter()
            .filter(|line| {
                books
                    .account(line.account_id)
                    .is_some_and(|account| account.account_type == account_type)
            })
            .filter(|line| {
                books
                    .journal_entries
                    .get(line.journal_id)
                    .is_some_and(|header| range.contains(header.entry_date))
            })
            .map(|line| pick(line.debit_amount, line.credit_amount))
            .sum()
    }
}
