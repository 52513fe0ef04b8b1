//! Storage trait definitions and persisted unit names.

use std::fmt;

use crate::domain::{EntityKind, Loan, Member, Record, Title};
use crate::error::Result;
use crate::id::IdSnapshot;

/// One independently stored unit: a collection per record kind plus the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Members,
    Titles,
    Loans,
    Counters,
}

impl Unit {
    /// Unit holding the collection for `kind`
    pub fn of(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Member => Unit::Members,
            EntityKind::Title => Unit::Titles,
            EntityKind::Loan => Unit::Loans,
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Unit::Members => "members.json",
            Unit::Titles => "titles.json",
            Unit::Loans => "loans.json",
            Unit::Counters => "counters.json",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Borrowed view of everything the catalog persists, written as one step.
#[derive(Debug, Clone, Copy)]
pub struct CatalogSnapshot<'a> {
    pub members: &'a [Member],
    pub titles: &'a [Title],
    pub loans: &'a [Loan],
    pub counters: IdSnapshot,
}

/// Storage trait for whole-collection load and overwrite.
pub trait Storage {
    /// Load the collection for `R`, in stored order.
    ///
    /// A unit that was never written loads as empty. A unit that exists but
    /// cannot be decoded is reported as `PersistenceRead`.
    fn load<R: Record>(&self) -> Result<Vec<R>>;

    /// Load the counter snapshot, `None` if it was never written.
    fn load_counters(&self) -> Result<Option<IdSnapshot>>;

    /// Overwrite the collection for `R` with `records`.
    fn save<R: Record>(&self, records: &[R]) -> Result<()>;

    /// Overwrite the counter snapshot.
    fn save_counters(&self, counters: &IdSnapshot) -> Result<()>;

    /// Overwrite all four units as one logical step.
    fn save_all(&self, snapshot: &CatalogSnapshot<'_>) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_of_kind() {
        assert_eq!(Unit::of(EntityKind::Member), Unit::Members);
        assert_eq!(Unit::of(EntityKind::Title), Unit::Titles);
        assert_eq!(Unit::of(EntityKind::Loan), Unit::Loans);
    }

    #[test]
    fn test_unit_display_is_file_name() {
        assert_eq!(Unit::Counters.to_string(), "counters.json");
        assert_eq!(Unit::Loans.to_string(), "loans.json");
    }
}
