//! Loan record and its one-way lifecycle
//!
//! A loan starts outstanding and moves to returned exactly once. After that
//! it is never modified again, and loans are never deleted.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{EntityKind, Record, UNASSIGNED};

/// Today's date in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// One member borrowing one title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    #[serde(default)]
    pub id: u64,

    #[serde(default)]
    pub member_id: u64,

    #[serde(default)]
    pub title_id: u64,

    /// Defaults to the day the loan is created (or imported without one)
    #[serde(default = "today")]
    pub loan_date: NaiveDate,

    /// Absent while outstanding
    #[serde(default)]
    pub return_date: Option<NaiveDate>,

    #[serde(default)]
    pub returned: bool,
}

/// Lifecycle state of a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanStatus {
    Outstanding,
    Returned,
}

impl Loan {
    /// Create an outstanding loan without an identifier.
    pub fn new(member_id: u64, title_id: u64, loan_date: Option<NaiveDate>) -> Self {
        Self {
            id: UNASSIGNED,
            member_id,
            title_id,
            loan_date: loan_date.unwrap_or_else(today),
            return_date: None,
            returned: false,
        }
    }

    pub fn status(&self) -> LoanStatus {
        if self.returned {
            LoanStatus::Returned
        } else {
            LoanStatus::Outstanding
        }
    }

    pub fn is_outstanding(&self) -> bool {
        self.status() == LoanStatus::Outstanding
    }

    /// Move to returned, stamping `on` as the return date.
    ///
    /// Returns false and leaves the loan untouched if it was already returned.
    pub fn mark_returned(&mut self, on: NaiveDate) -> bool {
        if self.returned {
            return false;
        }
        self.returned = true;
        self.return_date = Some(on);
        true
    }
}

impl Record for Loan {
    const KIND: EntityKind = EntityKind::Loan;

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

impl fmt::Display for Loan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.status() {
            LoanStatus::Outstanding => "Outstanding",
            LoanStatus::Returned => "Returned",
        };
        let returned_on = self
            .return_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "pending".to_string());
        write!(
            f,
            "ID: {} | Member ID: {} | Title ID: {} | Loaned: {} | Returned: {} | Status: {}",
            self.id, self.member_id, self.title_id, self.loan_date, returned_on, state
        )
    }
}
