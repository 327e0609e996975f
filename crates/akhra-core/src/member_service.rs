use akhra_domain::{Books, Fee, MedicaidRequest, Member, NewMember, RecordId, Voucher};
use tracing::info;

use crate::CoreError;

/// A member together with the records that reference them.
#[derive(Debug, Clone)]
pub struct MemberDetails {
    pub member: Member,
    pub fees: Vec<Fee>,
    pub medicaid_requests: Vec<MedicaidRequest>,
    pub vouchers: Vec<Voucher>,
}

pub struct MemberService;

impl MemberService {
    pub fn add(books: &mut Books, member: NewMember) -> Result<Member, CoreError> {
        let full_name = member.full_name.trim();
        if full_name.is_empty() {
            return Err(CoreError::Validation("member name is required".into()));
        }
        let stored = books
            .members
            .insert_with(|id| Member {
                id,
                full_name: full_name.to_string(),
                mobile: member.mobile,
                email: member.email,
                address: member.address,
                join_date: member.join_date,
                is_active: true,
                is_deleted: false,
            })
            .clone();
        books.touch();
        info!(member_id = stored.id, "member added");
        Ok(stored)
    }

    pub fn get(books: &Books, member_id: RecordId) -> Result<&Member, CoreError> {
        books
            .members
            .get(member_id)
            .ok_or(CoreError::MemberNotFound(member_id))
    }

    pub fn details(books: &Books, member_id: RecordId) -> Result<MemberDetails, CoreError> {
        let member = Self::get(books, member_id)?.clone();
        Ok(MemberDetails {
            member,
            fees: books
                .fees
                .find(|fee| fee.member_id == member_id)
                .into_iter()
                .cloned()
                .collect(),
            medicaid_requests: books
                .medicaid_requests
                .find(|request| request.member_id == member_id)
                .into_iter()
                .cloned()
                .collect(),
            vouchers: books
                .vouchers
                .find(|voucher| voucher.member_id == Some(member_id))
                .into_iter()
                .cloned()
                .collect(),
        })
    }

    /// Soft-deletes a member. Their fees and requests stay in place.
    pub fn remove(books: &mut Books, member_id: RecordId) -> Result<(), CoreError> {
        if !books.members.delete(member_id) {
            return Err(CoreError::MemberNotFound(member_id));
        }
        books.touch();
        info!(member_id, "member removed");
        Ok(())
    }

    pub fn set_active(books: &mut Books, member_id: RecordId, active: bool) -> Result<(), CoreError> {
        let member = books
            .members
            .get_mut(member_id)
            .ok_or(CoreError::MemberNotFound(member_id))?;
        member.is_active = active;
        books.touch();
        Ok(())
    }

    pub fn is_active(books: &Books, member_id: RecordId) -> bool {
        books
            .members
            .get(member_id)
            .is_some_and(|member| member.is_active)
    }

    /// Active members ordered by name.
    pub fn active(books: &Books) -> Vec<&Member> {
        let mut members = books.members.find(|member| member.is_active);
        members.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        members
    }

    /// Members whose name, email or mobile contains `term`, ignoring case.
    /// An empty term returns every member.
    pub fn search<'a>(books: &'a Books, term: &str) -> Vec<&'a Member> {
        let needle = term.trim().to_lowercase();
        let contains = |field: &Option<String>| {
            field
                .as_deref()
                .is_some_and(|value| value.to_lowercase().contains(&needle))
        };
        let mut members = books.members.find(|member| {
            needle.is_empty()
                || member.full_name.to_lowercase().contains(&needle)
                || contains(&member.email)
                || contains(&member.mobile)
        });
        members.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        members
    }
}
