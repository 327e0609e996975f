//! Monthly membership fees.

use akhra_domain::{Books, Fee, NewFee, RecordId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;

use crate::{validation, CoreError};

pub struct FeeService;

impl FeeService {
    pub fn record(books: &mut Books, fee: NewFee) -> Result<Fee, CoreError> {
        if !books.members.exists(fee.member_id) {
            return Err(CoreError::MemberNotFound(fee.member_id));
        }
        if let Some(month) = fee.fee_month {
            if !(1..=12).contains(&month) {
                return Err(CoreError::Validation(format!(
                    "fee month must be between 1 and 12, got {month}"
                )));
            }
        }
        if let Some(amount) = fee.amount {
            validation::check_amount("fee", amount)?;
        }
        let stored = books
            .fees
            .insert_with(|id| Fee {
                id,
                member_id: fee.member_id,
                fee_month: fee.fee_month,
                fee_year: fee.fee_year,
                amount: fee.amount,
                paid_date: None,
                receipt_number: None,
                notes: fee.notes,
            })
            .clone();
        books.touch();
        Ok(stored)
    }

    pub fn mark_paid(
        books: &mut Books,
        fee_id: RecordId,
        paid_date: NaiveDate,
        receipt_number: Option<String>,
    ) -> Result<(), CoreError> {
        let fee = books
            .fees
            .get_mut(fee_id)
            .ok_or(CoreError::FeeNotFound(fee_id))?;
        fee.paid_date = Some(paid_date);
        fee.receipt_number = receipt_number;
        books.touch();
        info!(fee_id, date = %paid_date, "fee marked paid");
        Ok(())
    }

    /// A member's fees, latest period first.
    pub fn by_member(books: &Books, member_id: RecordId) -> Vec<&Fee> {
        let mut fees = books.fees.find(|fee| fee.member_id == member_id);
        fees.sort_by(|a, b| (b.fee_year, b.fee_month).cmp(&(a.fee_year, a.fee_month)));
        fees
    }

    pub fn by_year(books: &Books, year: i32) -> Vec<&Fee> {
        let mut fees = books.fees.find(|fee| fee.fee_year == Some(year));
        fees.sort_by_key(|fee| (fee.fee_month, Self::member_name(books, fee.member_id)));
        fees
    }

    /// Unpaid fees ordered by year, month, then member name.
    pub fn pending(books: &Books) -> Vec<&Fee> {
        let mut fees = books.fees.find(|fee| !fee.is_paid());
        fees.sort_by_key(|fee| {
            (
                fee.fee_year,
                fee.fee_month,
                Self::member_name(books, fee.member_id),
            )
        });
        fees
    }

    pub fn total_collected(books: &Books, year: i32) -> Decimal {
        books
            .fees
            .iter()
            .filter(|fee| fee.fee_year == Some(year) && fee.is_paid())
            .filter_map(|fee| fee.amount)
            .sum()
    }

    pub fn total_collected_in_month(books: &Books, month: u32, year: i32) -> Decimal {
        books
            .fees
            .iter()
            .filter(|fee| fee.is_for(month, year) && fee.is_paid())
            .filter_map(|fee| fee.amount)
            .sum()
    }

    pub fn has_member_paid(books: &Books, member_id: RecordId, month: u32, year: i32) -> bool {
        books
            .fees
            .iter()
            .any(|fee| fee.member_id == member_id && fee.is_for(month, year) && fee.is_paid())
    }

    fn member_name(books: &Books, member_id: RecordId) -> String {
        books
            .members
            .get(member_id)
            .map(|member| member.full_name.clone())
            .unwrap_or_default()
    }
}
