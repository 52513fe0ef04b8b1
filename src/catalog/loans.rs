//! Loan operations: issuing, returning and joined views

use chrono::NaiveDate;

use super::Catalog;
use crate::domain::{Loan, Member, Title, today};
use crate::error::{LibrisError, Result};
use crate::storage::Storage;

/// A loan joined with the member and title it references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanEntry<'a> {
    pub loan: &'a Loan,
    pub member: &'a Member,
    pub title: &'a Title,
}

impl<S: Storage> Catalog<S> {
    /// Lend title `title_id` to member `member_id`.
    ///
    /// Checks, in order, that the member exists, the title exists and the
    /// title is available. A rejected loan changes nothing.
    pub fn issue_loan(&mut self, member_id: u64, title_id: u64, loan_date: Option<NaiveDate>) -> Result<Loan> {
        if self.get_member(member_id).is_none() {
            return Err(LibrisError::MemberNotFound(member_id));
        }
        let title_pos = self
            .titles
            .iter()
            .position(|t| t.id == title_id)
            .ok_or(LibrisError::TitleNotFound(title_id))?;
        if !self.titles[title_pos].available {
            return Err(LibrisError::TitleUnavailable(title_id));
        }

        let mut loan = Loan::new(member_id, title_id, loan_date);
        self.ids.claim(&mut loan);
        self.loans.push(loan.clone());
        self.titles[title_pos].available = false;
        self.persist()?;

        log::info!("Issued loan {}: title {} to member {}", loan.id, title_id, member_id);
        Ok(loan)
    }

    /// Return outstanding loan `loan_id` today.
    pub fn return_loan(&mut self, loan_id: u64) -> Result<bool> {
        self.return_loan_on(loan_id, today())
    }

    /// Return outstanding loan `loan_id`, stamping `on` as the return date.
    ///
    /// Returns false if there is no outstanding loan with that id.
    pub fn return_loan_on(&mut self, loan_id: u64, on: NaiveDate) -> Result<bool> {
        let Some(loan) = self.loans.iter_mut().find(|l| l.id == loan_id && l.is_outstanding()) else {
            log::debug!("Return skipped, no outstanding loan {}", loan_id);
            return Ok(false);
        };
        loan.mark_returned(on);
        self.recompute_availability();
        self.persist()?;

        log::info!("Returned loan {} on {}", loan_id, on);
        Ok(true)
    }

    pub fn get_loan(&self, id: u64) -> Option<&Loan> {
        self.loans.iter().find(|l| l.id == id)
    }

    /// All loans, returned ones included, in issue order.
    pub fn list_loans(&self) -> &[Loan] {
        &self.loans
    }

    /// Loans whose member name, title or id contains `query`, ignoring case.
    ///
    /// Orphaned loans are skipped.
    pub fn find_loans(&self, query: &str) -> Vec<LoanEntry<'_>> {
        let needle = query.to_lowercase();
        self.joined()
            .filter(|entry| {
                entry.member.name.to_lowercase().contains(&needle)
                    || entry.title.title.to_lowercase().contains(&needle)
                    || entry.loan.id.to_string().contains(&needle)
            })
            .collect()
    }

    /// Outstanding loans whose member and title both still exist.
    pub fn list_active_loans(&self) -> Vec<LoanEntry<'_>> {
        self.joined().filter(|entry| entry.loan.is_outstanding()).collect()
    }

    /// Every loan that resolves to an existing member and title.
    fn joined(&self) -> impl Iterator<Item = LoanEntry<'_>> {
        self.loans.iter().filter_map(move |loan| {
            let member = self.get_member(loan.member_id)?;
            let title = self.get_title(loan.title_id)?;
            Some(LoanEntry { loan, member, title })
        })
    }
}
