//! Catalog service: the in-memory collections and every operation on them.
//!
//! The catalog owns its identifier allocator and its storage. Each mutating
//! operation updates memory first and then writes all four units; a write
//! failure is returned to the caller. Lookups that find nothing return
//! `None` or `false` rather than an error.

mod loans;
mod members;
mod titles;

use crate::domain::{Loan, Member, Record, Title, UNASSIGNED};
use crate::error::{LibrisError, Result};
use crate::id::IdAllocator;
use crate::storage::{CatalogSnapshot, JsonStorage, Storage};

pub use loans::LoanEntry;
pub use members::MemberPatch;
pub use titles::TitlePatch;

/// In-memory library catalog backed by a `Storage`.
#[derive(Debug)]
pub struct Catalog<S: Storage = JsonStorage> {
    storage: S,
    ids: IdAllocator,
    members: Vec<Member>,
    titles: Vec<Title>,
    loans: Vec<Loan>,
}

impl<S: Storage> Catalog<S> {
    /// Load every collection and the identifier counters from `storage`.
    ///
    /// Unreadable units are logged and replaced with empty collections.
    /// Missing or unreadable counters are recovered from the loaded records.
    pub fn open(storage: S) -> Self {
        let mut members: Vec<Member> = load_or_empty(&storage);
        let mut titles: Vec<Title> = load_or_empty(&storage);
        let mut loans: Vec<Loan> = load_or_empty(&storage);

        let mut ids = match storage.load_counters() {
            Ok(Some(snapshot)) => {
                let mut ids = IdAllocator::new();
                ids.restore(snapshot);
                // A stale snapshot must still cover every stored id
                ids.observe_all(&members);
                ids.observe_all(&titles);
                ids.observe_all(&loans);
                ids
            }
            Ok(None) => {
                log::info!("No counter snapshot found, recovering from records");
                IdAllocator::recover(&members, &titles, &loans)
            }
            Err(e) => {
                log::warn!("{}; recovering counters from records", e);
                IdAllocator::recover(&members, &titles, &loans)
            }
        };

        let assigned = claim_unassigned(&mut ids, &mut members)
            + claim_unassigned(&mut ids, &mut titles)
            + claim_unassigned(&mut ids, &mut loans);
        if assigned > 0 {
            log::warn!("Assigned identifiers to {} stored record(s) without one", assigned);
        }

        let mut catalog = Self {
            storage,
            ids,
            members,
            titles,
            loans,
        };

        let corrected = catalog.recompute_availability();
        if corrected > 0 {
            log::warn!("Corrected availability of {} title(s) on load", corrected);
        }

        log::info!(
            "Opened catalog: {} member(s), {} title(s), {} loan(s)",
            catalog.members.len(),
            catalog.titles.len(),
            catalog.loans.len()
        );
        catalog
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    /// Write all collections and the counters.
    fn persist(&self) -> Result<()> {
        self.storage.save_all(&CatalogSnapshot {
            members: &self.members,
            titles: &self.titles,
            loans: &self.loans,
            counters: self.ids.snapshot(),
        })
    }

    /// Rebuild every title's availability from the outstanding loans.
    ///
    /// Returns how many titles changed.
    fn recompute_availability(&mut self) -> usize {
        let before: Vec<bool> = self.titles.iter().map(|t| t.available).collect();

        for title in &mut self.titles {
            title.available = true;
        }
        for loan in self.loans.iter().filter(|l| l.is_outstanding()) {
            for title in self.titles.iter_mut().filter(|t| t.id == loan.title_id) {
                title.available = false;
            }
        }

        self.titles
            .iter()
            .zip(before)
            .filter(|(title, was)| title.available != *was)
            .count()
    }
}

impl Catalog<JsonStorage> {
    /// Open a catalog stored as JSON files under `data_dir`.
    pub fn open_dir(data_dir: impl AsRef<std::path::Path>) -> Result<Self> {
        Ok(Self::open(JsonStorage::new(data_dir)?))
    }
}

fn load_or_empty<S: Storage, R: Record>(storage: &S) -> Vec<R> {
    match storage.load() {
        Ok(records) => records,
        Err(e) => {
            log::warn!("{}; starting with an empty {} collection", e, R::KIND);
            Vec::new()
        }
    }
}

/// Allocate identifiers for records stored without one, after every explicit
/// id has been observed. Returns how many were assigned.
fn claim_unassigned<R: Record>(ids: &mut IdAllocator, records: &mut [R]) -> usize {
    let mut assigned = 0;
    for record in records.iter_mut().filter(|r| r.id() == UNASSIGNED) {
        ids.claim(record);
        assigned += 1;
    }
    assigned
}

/// Reject a blank required field.
fn require(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LibrisError::Validation(format!("{} is required", field)));
    }
    Ok(())
}
