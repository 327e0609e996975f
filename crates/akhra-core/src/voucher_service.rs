//! Receipt and payment vouchers, each backed by a two-line journal entry.

use akhra_domain::{
    Books, NewJournalEntry, NewTransactionLine, NewVoucher, PostedEntry, UserId, Voucher,
    VoucherType,
};
use tracing::info;

use crate::{journal_service::JournalService, validation, CoreError, UnitOfWork};

/// A stored voucher with the journal entry carrying its financial effect.
#[derive(Debug, Clone)]
pub struct IssuedVoucher {
    pub voucher: Voucher,
    pub journal: PostedEntry,
}

pub struct VoucherService;

impl VoucherService {
    pub fn issue(
        books: &mut Books,
        created_by: UserId,
        voucher: NewVoucher,
    ) -> Result<IssuedVoucher, CoreError> {
        let mut uow = UnitOfWork::begin(books);
        let issued = Self::issue_in(&mut uow, created_by, voucher)?;
        uow.commit();
        Ok(issued)
    }

    /// Receipts debit the cash account and credit the voucher account; payments do
    /// the reverse.
    pub fn issue_in(
        uow: &mut UnitOfWork<'_>,
        created_by: UserId,
        voucher: NewVoucher,
    ) -> Result<IssuedVoucher, CoreError> {
        validation::check_positive_amount("voucher", voucher.amount)?;
        let cash = uow
            .books()
            .account(voucher.cash_account_id)
            .ok_or(CoreError::AccountNotFound(voucher.cash_account_id))?;
        if !cash.is_cash_account {
            return Err(CoreError::Validation(format!(
                "account {} is not a cash account",
                cash.name
            )));
        }
        if voucher.cash_account_id == voucher.account_id {
            return Err(CoreError::Validation(
                "voucher account must differ from the cash account".into(),
            ));
        }
        if let Some(member_id) = voucher.member_id {
            if !uow.books().members.exists(member_id) {
                return Err(CoreError::MemberNotFound(member_id));
            }
        }

        let lines = match voucher.voucher_type {
            VoucherType::Receipt => [
                NewTransactionLine::debit(voucher.cash_account_id, voucher.amount),
                NewTransactionLine::credit(voucher.account_id, voucher.amount),
            ],
            VoucherType::Payment => [
                NewTransactionLine::debit(voucher.account_id, voucher.amount),
                NewTransactionLine::credit(voucher.cash_account_id, voucher.amount),
            ],
        };
        let mut header = NewJournalEntry::new(voucher.voucher_date);
        header.narration = Some(
            voucher
                .remarks
                .clone()
                .unwrap_or_else(|| format!("{} voucher", voucher.voucher_type)),
        );
        let journal = JournalService::post_in(uow, created_by, header, &lines)?;
        let stored = uow.insert_voucher(
            voucher.voucher_type,
            voucher.voucher_date,
            voucher.member_id,
            voucher.amount,
            voucher.account_id,
            journal.entry.id,
            voucher.remarks,
        )?;
        info!(
            voucher_id = stored.id,
            kind = %stored.voucher_type,
            journal_id = journal.entry.id,
            "voucher issued"
        );
        Ok(IssuedVoucher {
            voucher: stored,
            journal,
        })
    }

    /// Every voucher, most recent first.
    pub fn list(books: &Books) -> Vec<&Voucher> {
        let mut vouchers: Vec<_> = books.vouchers.iter().collect();
        vouchers.sort_by(|a, b| (b.voucher_date, b.id).cmp(&(a.voucher_date, a.id)));
        vouchers
    }

    pub fn by_type(books: &Books, voucher_type: VoucherType) -> Vec<&Voucher> {
        Self::list(books)
            .into_iter()
            .filter(|voucher| voucher.voucher_type == voucher_type)
            .collect()
    }
}
