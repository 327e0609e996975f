//! Chart of accounts.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::common::{Identifiable, ParseEnumError, Record, RecordId};

pub const CASH_ACCOUNT_ID: RecordId = 1;
pub const BANK_ACCOUNT_ID: RecordId = 2;
pub const MEMBER_FEES_ACCOUNT_ID: RecordId = 3;
pub const EVENT_EXPENSES_ACCOUNT_ID: RecordId = 4;
pub const MEDICAID_FUND_ACCOUNT_ID: RecordId = 5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Classifies a ledger account.
pub enum AccountType {
    Assets,
    Liabilities,
    Income,
    Expense,
}

impl AccountType {
    pub const ALL: [AccountType; 4] = [
        AccountType::Assets,
        AccountType::Liabilities,
        AccountType::Income,
        AccountType::Expense,
    ];
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AccountType::Assets => "Assets",
            AccountType::Liabilities => "Liabilities",
            AccountType::Income => "Income",
            AccountType::Expense => "Expense",
        };
        f.write_str(label)
    }
}

impl FromStr for AccountType {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "assets" | "asset" => Ok(AccountType::Assets),
            "liabilities" | "liability" => Ok(AccountType::Liabilities),
            "income" => Ok(AccountType::Income),
            "expense" | "expenses" => Ok(AccountType::Expense),
            _ => Err(ParseEnumError::new("account type", value)),
        }
    }
}

/// A named, typed bucket that transaction lines post against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerAccount {
    pub id: RecordId,
    pub name: String,
    pub account_type: AccountType,
    #[serde(default)]
    pub is_cash_account: bool,
}

impl LedgerAccount {
    pub fn new(
        id: RecordId,
        name: impl Into<String>,
        account_type: AccountType,
        is_cash_account: bool,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            account_type,
            is_cash_account,
        }
    }
}

impl Identifiable for LedgerAccount {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Record for LedgerAccount {}

/// Accounts every new set of books starts with.
pub fn seeded_chart() -> Vec<LedgerAccount> {
    vec![
        LedgerAccount::new(CASH_ACCOUNT_ID, "Cash", AccountType::Assets, true),
        LedgerAccount::new(BANK_ACCOUNT_ID, "Bank", AccountType::Assets, true),
        LedgerAccount::new(
            MEMBER_FEES_ACCOUNT_ID,
            "Member Fees",
            AccountType::Income,
            false,
        ),
        LedgerAccount::new(
            EVENT_EXPENSES_ACCOUNT_ID,
            "Event Expenses",
            AccountType::Expense,
            false,
        ),
        LedgerAccount::new(
            MEDICAID_FUND_ACCOUNT_ID,
            "Medicaid Fund",
            AccountType::Liabilities,
            false,
        ),
    ]
}
