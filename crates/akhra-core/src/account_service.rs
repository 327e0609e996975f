use akhra_domain::{AccountType, Books, LedgerAccount, RecordId};

use crate::CoreError;

/// Read access to the chart of accounts.
pub struct AccountService;

impl AccountService {
    /// Chart of accounts ordered by type, then name.
    pub fn chart(books: &Books) -> Vec<&LedgerAccount> {
        let mut accounts: Vec<_> = books.accounts.iter().collect();
        accounts.sort_by(|a, b| {
            a.account_type
                .cmp(&b.account_type)
                .then_with(|| a.name.cmp(&b.name))
        });
        accounts
    }

    /// Accounts flagged as cash, ordered by name.
    pub fn cash_accounts(books: &Books) -> Vec<&LedgerAccount> {
        let mut accounts = books.accounts.find(|account| account.is_cash_account);
        accounts.sort_by(|a, b| a.name.cmp(&b.name));
        accounts
    }

    pub fn of_type(books: &Books, account_type: AccountType) -> Vec<&LedgerAccount> {
        books
            .accounts
            .find(|account| account.account_type == account_type)
    }

    pub fn get(books: &Books, id: RecordId) -> Result<&LedgerAccount, CoreError> {
        books.account(id).ok_or(CoreError::AccountNotFound(id))
    }

    /// Resolves an account by numeric id or case-insensitive name.
    pub fn resolve<'a>(books: &'a Books, reference: &str) -> Result<&'a LedgerAccount, CoreError> {
        if let Ok(id) = reference.trim().parse::<RecordId>() {
            return Self::get(books, id);
        }
        books
            .account_by_name(reference)
            .ok_or_else(|| CoreError::Validation(format!("unknown account `{}`", reference.trim())))
    }
}
