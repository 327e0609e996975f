//! Receipt and payment vouchers.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::account::CASH_ACCOUNT_ID;
use crate::common::{Identifiable, ParseEnumError, Record, RecordId};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum VoucherType {
    Receipt,
    Payment,
}

impl fmt::Display for VoucherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VoucherType::Receipt => "Receipt",
            VoucherType::Payment => "Payment",
        };
        f.write_str(label)
    }
}

impl FromStr for VoucherType {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "receipt" => Ok(VoucherType::Receipt),
            "payment" => Ok(VoucherType::Payment),
            _ => Err(ParseEnumError::new("voucher type", value)),
        }
    }
}

/// Receipt or payment record backed by exactly one journal entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Voucher {
    pub id: RecordId,
    pub voucher_type: VoucherType,
    pub voucher_date: NaiveDate,
    #[serde(default)]
    pub member_id: Option<RecordId>,
    pub amount: Decimal,
    pub account_id: RecordId,
    pub journal_id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl Identifiable for Voucher {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Record for Voucher {}

/// Voucher request. `cash_account_id` names the cash side of the generated entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVoucher {
    pub voucher_type: VoucherType,
    pub voucher_date: NaiveDate,
    pub member_id: Option<RecordId>,
    pub amount: Decimal,
    pub account_id: RecordId,
    pub cash_account_id: RecordId,
    pub remarks: Option<String>,
}

impl NewVoucher {
    pub fn new(
        voucher_type: VoucherType,
        voucher_date: NaiveDate,
        account_id: RecordId,
        amount: Decimal,
    ) -> Self {
        Self {
            voucher_type,
            voucher_date,
            member_id: None,
            amount,
            account_id,
            cash_account_id: CASH_ACCOUNT_ID,
            remarks: None,
        }
    }

    pub fn receipt(voucher_date: NaiveDate, account_id: RecordId, amount: Decimal) -> Self {
        Self::new(VoucherType::Receipt, voucher_date, account_id, amount)
    }

    pub fn payment(voucher_date: NaiveDate, account_id: RecordId, amount: Decimal) -> Self {
        Self::new(VoucherType::Payment, voucher_date, account_id, amount)
    }

    pub fn for_member(mut self, member_id: RecordId) -> Self {
        self.member_id = Some(member_id);
        self
    }

    pub fn via_cash_account(mut self, cash_account_id: RecordId) -> Self {
        self.cash_account_id = cash_account_id;
        self
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }
}
