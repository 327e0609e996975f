//! Medicaid request intake and the Pending -> Approved/Rejected lifecycle.

use akhra_domain::{Books, MedicaidRequest, MedicaidStatus, RecordId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;

use crate::{validation, CoreError};

pub struct MedicaidService;

impl MedicaidService {
    pub fn submit(
        books: &mut Books,
        member_id: RecordId,
        request_date: NaiveDate,
        amount_requested: Option<Decimal>,
        description: Option<String>,
    ) -> Result<MedicaidRequest, CoreError> {
        if !books.members.exists(member_id) {
            return Err(CoreError::MemberNotFound(member_id));
        }
        if let Some(amount) = amount_requested {
            validation::check_amount("requested", amount)?;
        }
        let stored = books
            .medicaid_requests
            .insert_with(|id| MedicaidRequest {
                id,
                member_id,
                request_date,
                amount_requested,
                approved_amount: None,
                status: MedicaidStatus::Pending,
                description,
            })
            .clone();
        books.touch();
        info!(request_id = stored.id, member_id, "medicaid request submitted");
        Ok(stored)
    }

    /// Approves a pending request. Returns `Ok(false)` when no such request exists.
    pub fn approve(
        books: &mut Books,
        request_id: RecordId,
        approved_amount: Decimal,
    ) -> Result<bool, CoreError> {
        let Some(request) = books.medicaid_requests.get_mut(request_id) else {
            return Ok(false);
        };
        validation::check_amount("approved", approved_amount)?;
        request.approve(approved_amount)?;
        books.touch();
        info!(request_id, amount = %approved_amount, "medicaid request approved");
        Ok(true)
    }

    /// Rejects a pending request. Returns `Ok(false)` when no such request exists.
    pub fn reject(books: &mut Books, request_id: RecordId) -> Result<bool, CoreError> {
        let Some(request) = books.medicaid_requests.get_mut(request_id) else {
            return Ok(false);
        };
        request.reject()?;
        books.touch();
        info!(request_id, "medicaid request rejected");
        Ok(true)
    }

    /// Requests in `status`, most recent first.
    pub fn by_status(books: &Books, status: MedicaidStatus) -> Vec<&MedicaidRequest> {
        let mut requests = books
            .medicaid_requests
            .find(|request| request.status == status);
        requests.sort_by(|a, b| (b.request_date, b.id).cmp(&(a.request_date, a.id)));
        requests
    }

    pub fn pending(books: &Books) -> Vec<&MedicaidRequest> {
        Self::by_status(books, MedicaidStatus::Pending)
    }

    /// A member's requests, most recent first.
    pub fn by_member(books: &Books, member_id: RecordId) -> Vec<&MedicaidRequest> {
        let mut requests = books
            .medicaid_requests
            .find(|request| request.member_id == member_id);
        requests.sort_by(|a, b| (b.request_date, b.id).cmp(&(a.request_date, a.id)));
        requests
    }

    pub fn total_approved(books: &Books) -> Decimal {
        books
            .medicaid_requests
            .iter()
            .filter(|request| request.status == MedicaidStatus::Approved)
            .filter_map(|request| request.approved_amount)
            .sum()
    }

    pub fn total_requested(books: &Books) -> Decimal {
        books
            .medicaid_requests
            .iter()
            .filter_map(|request| request.amount_requested)
            .sum()
    }
}
