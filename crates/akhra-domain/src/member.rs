//! Association members and their monthly fees.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::{Identifiable, Record, RecordId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Member {
    pub id: RecordId,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub join_date: NaiveDate,
    #[serde(default = "Member::default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub is_deleted: bool,
}

impl Member {
    pub fn default_active() -> bool {
        true
    }
}

impl Identifiable for Member {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Record for Member {
    fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn mark_deleted(&mut self) -> bool {
        self.is_deleted = true;
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMember {
    pub full_name: String,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub join_date: NaiveDate,
}

impl NewMember {
    pub fn new(full_name: impl Into<String>, join_date: NaiveDate) -> Self {
        Self {
            full_name: full_name.into(),
            mobile: None,
            email: None,
            address: None,
            join_date,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_mobile(mut self, mobile: impl Into<String>) -> Self {
        self.mobile = Some(mobile.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Fee {
    pub id: RecordId,
    pub member_id: RecordId,
    #[serde(default)]
    pub fee_month: Option<u32>,
    #[serde(default)]
    pub fee_year: Option<i32>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub paid_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Fee {
    pub fn is_paid(&self) -> bool {
        self.paid_date.is_some()
    }

    pub fn is_for(&self, month: u32, year: i32) -> bool {
        self.fee_month == Some(month) && self.fee_year == Some(year)
    }
}

impl Identifiable for Fee {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Record for Fee {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFee {
    pub member_id: RecordId,
    pub fee_month: Option<u32>,
    pub fee_year: Option<i32>,
    pub amount: Option<Decimal>,
    pub notes: Option<String>,
}

impl NewFee {
    pub fn monthly(member_id: RecordId, month: u32, year: i32, amount: Decimal) -> Self {
        Self {
            member_id,
            fee_month: Some(month),
            fee_year: Some(year),
            amount: Some(amount),
            notes: None,
        }
    }
}
