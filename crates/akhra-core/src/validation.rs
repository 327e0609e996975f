//! Posting-boundary checks shared by the journal, cash book and voucher services.

use akhra_domain::{
    fits_amount_column, Books, NewJournalEntry, NewTransactionLine, UserId, NARRATION_MAX_LEN,
};
use rust_decimal::Decimal;

use crate::CoreError;

/// Rejects negative amounts and amounts that do not fit a `decimal(10,2)` column.
pub fn check_amount(field: &'static str, amount: Decimal) -> Result<(), CoreError> {
    let negative = amount.is_sign_negative() && !amount.is_zero();
    if negative || !fits_amount_column(amount) {
        return Err(CoreError::InvalidAmount { field, amount });
    }
    Ok(())
}

/// Like [`check_amount`] but also refuses zero.
pub fn check_positive_amount(field: &'static str, amount: Decimal) -> Result<(), CoreError> {
    if amount.is_zero() {
        return Err(CoreError::InvalidAmount { field, amount });
    }
    check_amount(field, amount)
}

pub fn check_narration(narration: Option<&str>) -> Result<(), CoreError> {
    match narration {
        Some(text) if text.chars().count() > NARRATION_MAX_LEN => Err(CoreError::Validation(
            format!("narration exceeds {NARRATION_MAX_LEN} characters"),
        )),
        _ => Ok(()),
    }
}

/// The creator must be an existing, active operator.
pub fn check_creator(books: &Books, created_by: UserId) -> Result<(), CoreError> {
    match books.user(created_by) {
        Some(user) if user.is_active => Ok(()),
        _ => Err(CoreError::UserNotFound(created_by)),
    }
}

/// Checks one line in isolation. `index` is 1-based.
pub fn check_line(index: usize, line: &NewTransactionLine) -> Result<(), CoreError> {
    let invalid = |reason: &str| CoreError::InvalidLine {
        index,
        reason: reason.to_string(),
    };
    for amount in [line.debit_amount, line.credit_amount] {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(invalid("amounts must not be negative"));
        }
        if !fits_amount_column(amount) {
            return Err(invalid("amount exceeds decimal(10,2)"));
        }
    }
    match (line.debit_amount.is_zero(), line.credit_amount.is_zero()) {
        (true, true) => Err(invalid("debit or credit is required")),
        (false, false) => Err(invalid("a line cannot carry both debit and credit")),
        _ => Ok(()),
    }
}

/// Validates an entry and its lines, returning the (equal) debit and credit totals.
pub fn check_entry(
    books: &Books,
    created_by: UserId,
    entry: &NewJournalEntry,
    lines: &[NewTransactionLine],
) -> Result<(Decimal, Decimal), CoreError> {
    if lines.is_empty() {
        return Err(CoreError::EmptyEntry);
    }
    check_narration(entry.narration.as_deref())?;
    check_creator(books, created_by)?;
    for (offset, line) in lines.iter().enumerate() {
        check_line(offset + 1, line)?;
    }
    let debits: Decimal = lines.iter().map(|line| line.debit_amount).sum();
    let credits: Decimal = lines.iter().map(|line| line.credit_amount).sum();
    if debits != credits {
        return Err(CoreError::Unbalanced { debits, credits });
    }
    Ok((debits, credits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use akhra_domain::{ADMIN_USER_ID, CASH_ACCOUNT_ID, MEMBER_FEES_ACCOUNT_ID};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn header() -> NewJournalEntry {
        NewJournalEntry::new(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap())
    }

    #[test]
    fn unbalanced_entry_reports_both_totals() {
        let books = Books::new("Validation");
        let lines = [
            NewTransactionLine::debit(CASH_ACCOUNT_ID, dec!(100)),
            NewTransactionLine::credit(MEMBER_FEES_ACCOUNT_ID, dec!(50)),
        ];
        match check_entry(&books, ADMIN_USER_ID, &header(), &lines) {
            Err(CoreError::Unbalanced { debits, credits }) => {
                assert_eq!(debits, dec!(100));
                assert_eq!(credits, dec!(50));
            }
            other => panic!("expected unbalanced error, got {other:?}"),
        }
    }

    #[test]
    fn line_with_both_sides_is_rejected_with_its_index() {
        let books = Books::new("Validation");
        let lines = [
            NewTransactionLine::debit(CASH_ACCOUNT_ID, dec!(10)),
            NewTransactionLine::new(MEMBER_FEES_ACCOUNT_ID, dec!(5), dec!(15)),
        ];
        let err = check_entry(&books, ADMIN_USER_ID, &header(), &lines).unwrap_err();
        assert!(matches!(err, CoreError::InvalidLine { index: 2, .. }));
    }

    #[test]
    fn zero_and_negative_lines_are_rejected() {
        assert!(check_line(1, &NewTransactionLine::debit(1, Decimal::ZERO)).is_err());
        assert!(check_line(1, &NewTransactionLine::debit(1, dec!(-1))).is_err());
        assert!(check_line(1, &NewTransactionLine::credit(1, dec!(0.001))).is_err());
        assert!(check_line(1, &NewTransactionLine::credit(1, dec!(12.50))).is_ok());
    }

    #[test]
    fn unknown_creator_is_rejected() {
        let books = Books::new("Validation");
        let lines = [
            NewTransactionLine::debit(CASH_ACCOUNT_ID, dec!(1)),
            NewTransactionLine::credit(MEMBER_FEES_ACCOUNT_ID, dec!(1)),
        ];
        let err = check_entry(&books, UserId(42), &header(), &lines).unwrap_err();
        assert!(matches!(err, CoreError::UserNotFound(UserId(42))));
    }

    #[test]
    fn long_narration_is_rejected() {
        let text = "x".repeat(NARRATION_MAX_LEN + 1);
        assert!(check_narration(Some(&text)).is_err());
        assert!(check_narration(Some("Monthly fees")).is_ok());
    }
}
