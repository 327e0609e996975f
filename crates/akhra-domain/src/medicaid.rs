//! Medicaid assistance requests and their approval lifecycle.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::{Identifiable, ParseEnumError, Record, RecordId};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum MedicaidStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl MedicaidStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, MedicaidStatus::Pending)
    }
}

impl fmt::Display for MedicaidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MedicaidStatus::Pending => "Pending",
            MedicaidStatus::Approved => "Approved",
            MedicaidStatus::Rejected => "Rejected",
        };
        f.write_str(label)
    }
}

impl FromStr for MedicaidStatus {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(MedicaidStatus::Pending),
            "approved" => Ok(MedicaidStatus::Approved),
            "rejected" => Ok(MedicaidStatus::Rejected),
            _ => Err(ParseEnumError::new("request status", value)),
        }
    }
}

/// Raised when a request is asked to leave a terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransitionError {
    pub from: MedicaidStatus,
    pub to: MedicaidStatus,
}

impl fmt::Display for StatusTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot move request from {} to {}",
            self.from, self.to
        )
    }
}

impl std::error::Error for StatusTransitionError {}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MedicaidRequest {
    pub id: RecordId,
    pub member_id: RecordId,
    pub request_date: NaiveDate,
    #[serde(default)]
    pub amount_requested: Option<Decimal>,
    #[serde(default)]
    pub approved_amount: Option<Decimal>,
    #[serde(default)]
    pub status: MedicaidStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl MedicaidRequest {
    pub fn approve(&mut self, approved_amount: Decimal) -> Result<(), StatusTransitionError> {
        self.leave_pending(MedicaidStatus::Approved)?;
        self.approved_amount = Some(approved_amount);
        Ok(())
    }

    pub fn reject(&mut self) -> Result<(), StatusTransitionError> {
        self.leave_pending(MedicaidStatus::Rejected)
    }

    fn leave_pending(&mut self, to: MedicaidStatus) -> Result<(), StatusTransitionError> {
        if self.status.is_terminal() {
            return Err(StatusTransitionError {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

impl Identifiable for MedicaidRequest {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Record for MedicaidRequest {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn pending() -> MedicaidRequest {
        MedicaidRequest {
            id: 1,
            member_id: 1,
            request_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            amount_requested: Some(dec!(300)),
            approved_amount: None,
            status: MedicaidStatus::Pending,
            description: None,
        }
    }

    #[test]
    fn approval_is_terminal() {
        let mut request = pending();
        request.approve(dec!(250)).expect("pending can be approved");
        assert_eq!(request.status, MedicaidStatus::Approved);
        assert_eq!(request.approved_amount, Some(dec!(250)));

        let err = request.reject().expect_err("approved is terminal");
        assert_eq!(err.from, MedicaidStatus::Approved);
        assert_eq!(err.to, MedicaidStatus::Rejected);
    }

    #[test]
    fn rejection_keeps_amount_empty() {
        let mut request = pending();
        request.reject().expect("pending can be rejected");
        assert_eq!(request.status, MedicaidStatus::Rejected);
        assert!(request.approved_amount.is_none());
        assert!(request.approve(dec!(1)).is_err());
    }
}
