//! Identifier allocation for Libris
//!
//! Each record kind has its own monotonically increasing counter. Counters
//! only ever move up, so an identifier is never handed out twice even after
//! the record that held it is deleted.

use serde::{Deserialize, Serialize};

use crate::domain::{EntityKind, Record, UNASSIGNED};

/// Persisted form of the three counters.
///
/// Each value is the last identifier issued for that kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdSnapshot {
    pub member_id: u64,
    pub title_id: u64,
    pub loan_id: u64,
}

/// Per-kind identifier counters, owned by a single catalog instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdAllocator {
    counters: IdSnapshot,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild counters from loaded records when no snapshot was persisted.
    ///
    /// Each counter becomes the largest identifier present, or 0 when empty.
    pub fn recover<M, T, L>(members: &[M], titles: &[T], loans: &[L]) -> Self
    where
        M: Record,
        T: Record,
        L: Record,
    {
        let mut allocator = Self::new();
        allocator.observe_all(members);
        allocator.observe_all(titles);
        allocator.observe_all(loans);
        allocator
    }

    fn counter_mut(&mut self, kind: EntityKind) -> &mut u64 {
        match kind {
            EntityKind::Member => &mut self.counters.member_id,
            EntityKind::Title => &mut self.counters.title_id,
            EntityKind::Loan => &mut self.counters.loan_id,
        }
    }

    /// Last identifier issued (or observed) for `kind`
    pub fn current(&self, kind: EntityKind) -> u64 {
        match kind {
            EntityKind::Member => self.counters.member_id,
            EntityKind::Title => self.counters.title_id,
            EntityKind::Loan => self.counters.loan_id,
        }
    }

    /// Increment and return the counter for `kind`.
    pub fn next(&mut self, kind: EntityKind) -> u64 {
        let counter = self.counter_mut(kind);
        *counter += 1;
        *counter
    }

    /// Raise the counter for `kind` to at least `id`. Never lowers it.
    pub fn observe(&mut self, kind: EntityKind, id: u64) {
        let counter = self.counter_mut(kind);
        *counter = (*counter).max(id);
    }

    /// Observe every record's identifier.
    pub fn observe_all<R: Record>(&mut self, records: &[R]) {
        for record in records {
            self.observe(R::KIND, record.id());
        }
    }

    /// Give `record` an identifier: allocate one if it has none, otherwise
    /// keep its explicit id and observe it.
    pub fn claim<R: Record>(&mut self, record: &mut R) -> u64 {
        if record.id() == UNASSIGNED {
            let id = self.next(R::KIND);
            record.set_id(id);
            id
        } else {
            self.observe(R::KIND, record.id());
            record.id()
        }
    }

    pub fn snapshot(&self) -> IdSnapshot {
        self.counters
    }

    pub fn restore(&mut self, snapshot: IdSnapshot) {
        self.counters = snapshot;
    }
}
